use std::f64::consts::TAU;

use crate::{
    foundation::{
        core::{Point, Rng64, Viewport},
        error::SceneResult,
    },
    layers::{FrameTime, Layer, LayerKind, LayerStyle, entity_budget},
    render::DrawSurface,
};

/// CSS pixel area covered by one star at unit density.
pub const STAR_AREA_PER_ENTITY: f64 = 6000.0;

#[derive(Clone, Copy, Debug)]
struct Star {
    origin: Point,
    radius: f64,
    base_opacity: f64,
    twinkle_hz: f64,
    phase: f64,
    drift_px_s: f64,
}

#[derive(Clone, Copy, Debug)]
struct StarSample {
    center: Point,
    radius: f64,
    opacity: f64,
}

/// Slowly drifting, twinkling points.
#[derive(Debug, Default)]
pub struct StarfieldLayer {
    stars: Vec<Star>,
    frame: Vec<StarSample>,
    height: f64,
}

impl StarfieldLayer {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Layer for StarfieldLayer {
    fn kind(&self) -> LayerKind {
        LayerKind::Starfield
    }

    fn reseed(&mut self, viewport: &Viewport, style: &LayerStyle, rng: &mut Rng64) {
        let n = entity_budget(
            viewport,
            style.density,
            style.performance_tier,
            STAR_AREA_PER_ENTITY,
        );
        let (w, h) = (viewport.width.max(0.0), viewport.height.max(0.0));
        self.height = h;
        self.stars = (0..n)
            .map(|_| Star {
                origin: Point::new(rng.range(0.0, w), rng.range(0.0, h)),
                radius: rng.range(0.4, 1.6),
                base_opacity: rng.range(0.35, 1.0),
                twinkle_hz: rng.range(0.1, 0.6),
                phase: rng.range(0.0, TAU),
                drift_px_s: rng.range(2.0, 10.0),
            })
            .collect();
        self.frame.clear();
    }

    fn update(&mut self, time: FrameTime, style: &LayerStyle) -> SceneResult<()> {
        let t = if style.reduced_motion {
            0.0
        } else {
            time.elapsed_secs()
        };
        let h = self.height;
        self.frame.clear();
        self.frame.extend(self.stars.iter().map(|s| {
            let y = if h > 0.0 {
                (s.origin.y + s.drift_px_s * t).rem_euclid(h)
            } else {
                s.origin.y
            };
            let twinkle = 0.55 + 0.45 * (TAU * s.twinkle_hz * t + s.phase).sin();
            StarSample {
                center: Point::new(s.origin.x, y),
                radius: s.radius,
                opacity: (s.base_opacity * twinkle).clamp(0.0, 1.0),
            }
        }));
        Ok(())
    }

    fn draw(&self, surface: &mut dyn DrawSurface, style: &LayerStyle) -> SceneResult<()> {
        for s in &self.frame {
            surface.fill_circle(s.center, s.radius, style.color.with_opacity(s.opacity));
        }
        Ok(())
    }

    fn entity_count(&self) -> usize {
        self.stars.len()
    }
}

#[cfg(test)]
#[path = "../../tests/unit/layers/starfield.rs"]
mod tests;
