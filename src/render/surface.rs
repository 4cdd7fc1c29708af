use crate::foundation::{
    core::{Point, Rgba8},
    error::SceneResult,
};

/// Read-back of a surface's backing store.
#[derive(Clone, Debug)]
pub struct FrameRGBA {
    pub width: u32,
    pub height: u32,
    pub data: Vec<u8>,
    pub premultiplied: bool,
}

/// A 2D drawing surface owned by exactly one renderer.
///
/// Drawing coordinates are CSS pixels; the surface applies its pixel ratio.
pub trait DrawSurface {
    /// Resize the backing store (device pixels). Contents are discarded.
    fn resize(&mut self, width: u32, height: u32) -> SceneResult<()>;

    /// Backing-store size in device pixels.
    fn size(&self) -> (u32, u32);

    fn set_pixel_ratio(&mut self, ratio: f64);

    /// Discard everything drawn so far and fill with `color`.
    fn clear(&mut self, color: Rgba8);

    fn fill_circle(&mut self, center: Point, radius: f64, color: Rgba8);

    fn stroke_line(&mut self, from: Point, to: Point, width: f64, color: Rgba8);

    /// Flush pending draws into the backing store.
    fn present(&mut self) -> SceneResult<()>;

    /// Copy of the backing store; `None` for surfaces without pixels.
    fn readback(&self) -> Option<FrameRGBA>;
}

/// Acquires drawing surfaces; `None` means no 2D context is available.
pub trait SurfaceFactory {
    fn acquire_2d(&self, width: u32, height: u32) -> Option<Box<dyn DrawSurface>>;
}

/// Host without any 2D drawing context.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoSurfaceFactory;

impl SurfaceFactory for NoSurfaceFactory {
    fn acquire_2d(&self, _width: u32, _height: u32) -> Option<Box<dyn DrawSurface>> {
        None
    }
}
