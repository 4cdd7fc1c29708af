use crate::{
    foundation::{
        core::{Point, Rng64, Vec2, Viewport},
        error::SceneResult,
    },
    layers::{FrameTime, Layer, LayerKind, LayerStyle, entity_budget},
    render::DrawSurface,
};

/// CSS pixel area per comet at unit density.
pub const COMET_AREA_PER_ENTITY: f64 = 400_000.0;

const TAIL_SEGMENTS: usize = 8;
const MIN_PERIOD_MS: f64 = 4_000.0;
const MAX_PERIOD_MS: f64 = 11_000.0;

/// Per-comet timing. Flight parameters are re-derived for every pass so the layer is a
/// pure function of elapsed time.
#[derive(Clone, Copy, Debug)]
struct Comet {
    seed: u64,
    period_ms: f64,
    offset_ms: f64,
}

#[derive(Clone, Copy, Debug, PartialEq)]
struct Flight {
    start: Point,
    velocity: Vec2,
    tail_len: f64,
    radius: f64,
}

#[derive(Clone, Copy, Debug, PartialEq)]
struct CometSample {
    head: Point,
    direction: Vec2,
    tail_len: f64,
    radius: f64,
}

#[derive(Debug, Default)]
pub struct CometLayer {
    comets: Vec<Comet>,
    frame: Vec<CometSample>,
    width: f64,
    height: f64,
}

impl CometLayer {
    pub fn new() -> Self {
        Self::default()
    }

    fn flight(&self, comet: &Comet, pass: u64) -> Flight {
        let mut rng = Rng64::new(comet.seed ^ pass.wrapping_mul(0x2545_F491_4F6C_DD1D));
        let (w, h) = (self.width, self.height);
        let start = Point::new(rng.range(-0.2 * w, 0.8 * w), rng.range(-0.2 * h, 0.2 * h));
        let angle = rng.range(0.35, 0.75);
        // Cross roughly the full diagonal during one period.
        let speed = (w.hypot(h) * 1.2) / (comet.period_ms / 1000.0);
        Flight {
            start,
            velocity: Vec2::new(angle.cos(), angle.sin()) * speed,
            tail_len: rng.range(60.0, 160.0),
            radius: rng.range(1.2, 2.4),
        }
    }
}

impl Layer for CometLayer {
    fn kind(&self) -> LayerKind {
        LayerKind::Comet
    }

    fn reseed(&mut self, viewport: &Viewport, style: &LayerStyle, rng: &mut Rng64) {
        let n = entity_budget(
            viewport,
            style.density,
            style.performance_tier,
            COMET_AREA_PER_ENTITY,
        );
        self.width = viewport.width.max(0.0);
        self.height = viewport.height.max(0.0);
        self.comets = (0..n)
            .map(|_| {
                let period_ms = rng.range(MIN_PERIOD_MS, MAX_PERIOD_MS);
                Comet {
                    seed: rng.next_u64(),
                    period_ms,
                    offset_ms: rng.range(0.0, period_ms),
                }
            })
            .collect();
        self.frame.clear();
    }

    fn update(&mut self, time: FrameTime, style: &LayerStyle) -> SceneResult<()> {
        let elapsed = if style.reduced_motion {
            0.0
        } else {
            time.elapsed_ms.max(0.0)
        };
        let samples: Vec<CometSample> = self
            .comets
            .iter()
            .map(|c| {
                let local = elapsed + c.offset_ms;
                let pass = (local / c.period_ms).floor() as u64;
                let t = (local - pass as f64 * c.period_ms) / 1000.0;
                let f = self.flight(c, pass);
                CometSample {
                    head: f.start + f.velocity * t,
                    direction: f.velocity.normalize(),
                    tail_len: f.tail_len,
                    radius: f.radius,
                }
            })
            .collect();
        self.frame = samples;
        Ok(())
    }

    fn draw(&self, surface: &mut dyn DrawSurface, style: &LayerStyle) -> SceneResult<()> {
        let seg = 1.0 / TAIL_SEGMENTS as f64;
        for c in &self.frame {
            for i in 0..TAIL_SEGMENTS {
                let near = c.head - c.direction * (c.tail_len * seg * i as f64);
                let far = c.head - c.direction * (c.tail_len * seg * (i + 1) as f64);
                let fade = 1.0 - i as f64 * seg;
                surface.stroke_line(
                    near,
                    far,
                    c.radius * fade,
                    style.color.with_opacity(0.6 * fade),
                );
            }
            surface.fill_circle(c.head, c.radius, style.color);
        }
        Ok(())
    }

    fn entity_count(&self) -> usize {
        self.comets.len()
    }
}

#[cfg(test)]
#[path = "../../tests/unit/layers/comet.rs"]
mod tests;
