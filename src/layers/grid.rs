use crate::{
    capability::PerformanceTier,
    foundation::{
        core::{Point, Rng64, Viewport},
        error::SceneResult,
    },
    layers::{FrameTime, HARD_ENTITY_CAP, Layer, LayerKind, LayerStyle, sanitize_density},
    render::DrawSurface,
};

/// Line spacing at unit density, CSS pixels.
pub const GRID_SPACING: f64 = 48.0;

const HORIZON: f64 = 0.55;
const SCROLL_ROWS_PER_SEC: f64 = 0.4;
const LINE_WIDTH: f64 = 1.0;
const MIN_DENSITY: f64 = 0.25;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GridMode {
    /// Receding floor converging on a vanishing point, scrolling towards the viewer.
    Perspective,
    /// Static orthogonal lattice.
    Flat,
}

impl GridMode {
    /// Reduced motion and the low tier always get the flat grid.
    pub fn resolve(style: &LayerStyle) -> Self {
        if style.reduced_motion || style.performance_tier == PerformanceTier::Low {
            Self::Flat
        } else {
            Self::Perspective
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
struct GridLine {
    from: Point,
    to: Point,
    opacity: f64,
}

#[derive(Debug)]
pub struct GridLayer {
    mode: GridMode,
    width: f64,
    height: f64,
    spacing: f64,
    /// Rays from the vanishing point; fixed between reseeds.
    rays: Vec<GridLine>,
    rows: usize,
    frame: Vec<GridLine>,
}

impl Default for GridLayer {
    fn default() -> Self {
        Self {
            mode: GridMode::Flat,
            width: 0.0,
            height: 0.0,
            spacing: GRID_SPACING,
            rays: Vec::new(),
            rows: 0,
            frame: Vec::new(),
        }
    }
}

impl GridLayer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn mode(&self) -> GridMode {
        self.mode
    }

    fn flat_lines(&self) -> Vec<GridLine> {
        let mut out = Vec::new();
        let mut x = 0.0;
        while x <= self.width && out.len() < HARD_ENTITY_CAP {
            out.push(GridLine {
                from: Point::new(x, 0.0),
                to: Point::new(x, self.height),
                opacity: 0.35,
            });
            x += self.spacing;
        }
        let mut y = 0.0;
        while y <= self.height && out.len() < HARD_ENTITY_CAP {
            out.push(GridLine {
                from: Point::new(0.0, y),
                to: Point::new(self.width, y),
                opacity: 0.35,
            });
            y += self.spacing;
        }
        out
    }

    fn perspective_rows(&self, t: f64) -> impl Iterator<Item = GridLine> + '_ {
        let horizon = self.height * HORIZON;
        let depth = self.height - horizon;
        let offset = (t * SCROLL_ROWS_PER_SEC).fract();
        let rows = self.rows as f64;
        (0..self.rows).map(move |i| {
            let k = ((i as f64 + offset) / rows).clamp(0.0, 1.0);
            let y = horizon + depth * k * k;
            GridLine {
                from: Point::new(0.0, y),
                to: Point::new(self.width, y),
                opacity: 0.1 + 0.5 * k,
            }
        })
    }
}

impl Layer for GridLayer {
    fn kind(&self) -> LayerKind {
        LayerKind::Grid
    }

    fn reseed(&mut self, viewport: &Viewport, style: &LayerStyle, _rng: &mut Rng64) {
        self.mode = GridMode::resolve(style);
        self.width = viewport.width.max(0.0);
        self.height = viewport.height.max(0.0);
        let density = sanitize_density(style.density).max(MIN_DENSITY);
        self.spacing = GRID_SPACING / (density * style.performance_tier.density_scale());
        self.rays.clear();
        self.rows = 0;
        self.frame.clear();

        match self.mode {
            GridMode::Flat => self.frame = self.flat_lines(),
            GridMode::Perspective => {
                let horizon = self.height * HORIZON;
                let vanishing = Point::new(self.width / 2.0, horizon);
                let half = HARD_ENTITY_CAP / 2;
                let mut x = -self.width;
                while x <= 2.0 * self.width && self.rays.len() < half {
                    self.rays.push(GridLine {
                        from: vanishing,
                        to: Point::new(x, self.height),
                        opacity: 0.4,
                    });
                    x += self.spacing;
                }
                let depth = self.height - horizon;
                self.rows = ((depth / self.spacing).ceil().max(1.0) as usize).min(half);
            }
        }
    }

    fn update(&mut self, time: FrameTime, _style: &LayerStyle) -> SceneResult<()> {
        if self.mode == GridMode::Flat {
            return Ok(());
        }
        let rows: Vec<GridLine> = self.perspective_rows(time.elapsed_secs()).collect();
        self.frame.clear();
        self.frame.extend_from_slice(&self.rays);
        self.frame.extend(rows);
        Ok(())
    }

    fn draw(&self, surface: &mut dyn DrawSurface, style: &LayerStyle) -> SceneResult<()> {
        for line in &self.frame {
            surface.stroke_line(
                line.from,
                line.to,
                LINE_WIDTH,
                style.color.with_opacity(line.opacity),
            );
        }
        Ok(())
    }

    fn entity_count(&self) -> usize {
        match self.mode {
            GridMode::Flat => self.frame.len(),
            GridMode::Perspective => self.rays.len() + self.rows,
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/layers/grid.rs"]
mod tests;
