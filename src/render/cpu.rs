use kurbo::Shape as _;

use crate::{
    foundation::{
        core::{Point, Rgba8},
        error::{SceneError, SceneResult},
    },
    render::surface::{DrawSurface, FrameRGBA, SurfaceFactory},
};

// Surfaces larger than this in either dimension are refused; vello_cpu addresses u16.
const MAX_DIM: u32 = u16::MAX as u32;

/// CPU raster surface backed by a vello_cpu pixmap.
pub struct PixmapSurface {
    width: u16,
    height: u16,
    pixel_ratio: f64,
    pixmap: vello_cpu::Pixmap,
    ctx: vello_cpu::RenderContext,
    dirty: bool,
}

impl PixmapSurface {
    pub fn new(width: u32, height: u32) -> SceneResult<Self> {
        let (w, h) = surface_dims_u16(width, height)?;
        Ok(Self {
            width: w,
            height: h,
            pixel_ratio: 1.0,
            pixmap: vello_cpu::Pixmap::new(w, h),
            ctx: vello_cpu::RenderContext::new(w, h),
            dirty: false,
        })
    }

    fn prepare_draw(&mut self, color: Rgba8) {
        self.ctx.set_transform(vello_cpu::kurbo::Affine::scale(self.pixel_ratio));
        self.ctx.set_paint(vello_cpu::peniko::Color::from_rgba8(
            color.r, color.g, color.b, color.a,
        ));
        self.dirty = true;
    }
}

fn surface_dims_u16(width: u32, height: u32) -> SceneResult<(u16, u16)> {
    if width == 0 || height == 0 || width > MAX_DIM || height > MAX_DIM {
        return Err(SceneError::surface(format!(
            "surface size {width}x{height} out of range"
        )));
    }
    let w: u16 = width
        .try_into()
        .map_err(|_| SceneError::surface("surface width exceeds u16"))?;
    let h: u16 = height
        .try_into()
        .map_err(|_| SceneError::surface("surface height exceeds u16"))?;
    Ok((w, h))
}

impl DrawSurface for PixmapSurface {
    fn resize(&mut self, width: u32, height: u32) -> SceneResult<()> {
        let (w, h) = surface_dims_u16(width, height)?;
        if w != self.width || h != self.height {
            self.width = w;
            self.height = h;
            self.pixmap = vello_cpu::Pixmap::new(w, h);
            self.ctx = vello_cpu::RenderContext::new(w, h);
            self.dirty = false;
        }
        Ok(())
    }

    fn size(&self) -> (u32, u32) {
        (u32::from(self.width), u32::from(self.height))
    }

    fn set_pixel_ratio(&mut self, ratio: f64) {
        self.pixel_ratio = crate::foundation::core::sanitize_pixel_ratio(ratio);
    }

    fn clear(&mut self, color: Rgba8) {
        self.ctx = vello_cpu::RenderContext::new(self.width, self.height);
        self.dirty = true;
        if color.a == 0 {
            return;
        }
        self.ctx.set_transform(vello_cpu::kurbo::Affine::IDENTITY);
        self.ctx.set_paint(vello_cpu::peniko::Color::from_rgba8(
            color.r, color.g, color.b, color.a,
        ));
        self.ctx.fill_rect(&vello_cpu::kurbo::Rect::new(
            0.0,
            0.0,
            f64::from(self.width),
            f64::from(self.height),
        ));
    }

    fn fill_circle(&mut self, center: Point, radius: f64, color: Rgba8) {
        if !(radius.is_finite() && radius > 0.0) || color.a == 0 {
            return;
        }
        self.prepare_draw(color);
        let path = kurbo::Circle::new(center, radius).to_path(0.1);
        self.ctx.fill_path(&bezpath_to_cpu(&path));
    }

    fn stroke_line(&mut self, from: Point, to: Point, width: f64, color: Rgba8) {
        if !(width.is_finite() && width > 0.0) || color.a == 0 {
            return;
        }
        let dir = to - from;
        let len = dir.hypot();
        if !len.is_finite() || len <= f64::EPSILON {
            return;
        }
        // Lines are filled as thin quads so only the fill pipeline is needed.
        let normal = kurbo::Vec2::new(-dir.y, dir.x) * (width * 0.5 / len);
        let mut quad = kurbo::BezPath::new();
        quad.move_to(from + normal);
        quad.line_to(to + normal);
        quad.line_to(to - normal);
        quad.line_to(from - normal);
        quad.close_path();

        self.prepare_draw(color);
        self.ctx.fill_path(&bezpath_to_cpu(&quad));
    }

    fn present(&mut self) -> SceneResult<()> {
        if !self.dirty {
            return Ok(());
        }
        clear_pixmap(&mut self.pixmap, [0, 0, 0, 0]);
        self.ctx.flush();
        self.ctx.render_to_pixmap(&mut self.pixmap);
        self.dirty = false;
        Ok(())
    }

    fn readback(&self) -> Option<FrameRGBA> {
        Some(FrameRGBA {
            width: u32::from(self.width),
            height: u32::from(self.height),
            data: self.pixmap.data_as_u8_slice().to_vec(),
            premultiplied: true,
        })
    }
}

/// Allocates [`PixmapSurface`]s; refuses sizes vello_cpu cannot address.
#[derive(Clone, Copy, Debug, Default)]
pub struct PixmapSurfaceFactory;

impl SurfaceFactory for PixmapSurfaceFactory {
    fn acquire_2d(&self, width: u32, height: u32) -> Option<Box<dyn DrawSurface>> {
        match PixmapSurface::new(width, height) {
            Ok(surface) => Some(Box::new(surface)),
            Err(err) => {
                tracing::warn!(%err, "pixmap surface unavailable");
                None
            }
        }
    }
}

fn clear_pixmap(pixmap: &mut vello_cpu::Pixmap, rgba: [u8; 4]) {
    let data = pixmap.data_as_u8_slice_mut();
    for px in data.chunks_exact_mut(4) {
        px.copy_from_slice(&rgba);
    }
}

fn point_to_cpu(p: Point) -> vello_cpu::kurbo::Point {
    vello_cpu::kurbo::Point::new(p.x, p.y)
}

fn bezpath_to_cpu(path: &kurbo::BezPath) -> vello_cpu::kurbo::BezPath {
    use kurbo::PathEl;

    let mut out = vello_cpu::kurbo::BezPath::new();
    for &el in path.elements() {
        match el {
            PathEl::MoveTo(p) => out.move_to(point_to_cpu(p)),
            PathEl::LineTo(p) => out.line_to(point_to_cpu(p)),
            PathEl::QuadTo(p1, p2) => out.quad_to(point_to_cpu(p1), point_to_cpu(p2)),
            PathEl::CurveTo(p1, p2, p3) => {
                out.curve_to(point_to_cpu(p1), point_to_cpu(p2), point_to_cpu(p3));
            }
            PathEl::ClosePath => out.close_path(),
        }
    }
    out
}

#[cfg(test)]
#[path = "../../tests/unit/render/cpu.rs"]
mod tests;
