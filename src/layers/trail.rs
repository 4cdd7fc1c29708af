use std::{cell::Cell, f64::consts::TAU, rc::Rc};

use crate::{
    bus::{
        EventBus, Subscription,
        channels::{THOUGHT_TRAIL_HOVER, TrailHover},
    },
    foundation::{
        core::{Point, Rng64, Viewport},
        error::SceneResult,
    },
    layers::{FrameTime, HARD_ENTITY_CAP, Layer, LayerKind, LayerStyle, entity_budget},
    render::DrawSurface,
};

/// CSS pixel area per trail at unit density.
pub const TRAIL_AREA_PER_ENTITY: f64 = 90_000.0;

/// Particles per trail; a trail's entity cost.
pub const POINTS_PER_TRAIL: usize = 24;

const POINT_SPACING: f64 = 14.0;
const HIGHLIGHT_GAIN: f64 = 1.8;

#[derive(Clone, Copy, Debug)]
struct Trail {
    base_y: f64,
    amplitude: f64,
    wavelength: f64,
    speed_px_s: f64,
    start_x: f64,
    phase: f64,
    opacity: f64,
}

#[derive(Clone, Copy, Debug)]
struct Particle {
    center: Point,
    radius: f64,
    opacity: f64,
    trail: u32,
}

/// Sine-wave particle trails; the hovered trail (see `thoughtTrailsHover`) is drawn brighter.
#[derive(Debug, Default)]
pub struct ParticleTrailLayer {
    trails: Vec<Trail>,
    frame: Vec<Particle>,
    width: f64,
    highlighted: Rc<Cell<Option<u32>>>,
    subscription: Option<Subscription>,
}

impl ParticleTrailLayer {
    pub fn new() -> Self {
        Self::default()
    }

    /// A layer whose highlight follows hover events on `bus`.
    pub fn connected(bus: &Rc<EventBus>) -> Self {
        let highlighted: Rc<Cell<Option<u32>>> = Rc::default();
        let cell = Rc::clone(&highlighted);
        let subscription = bus.subscribe_guarded(THOUGHT_TRAIL_HOVER, move |e: &TrailHover| {
            if e.active {
                cell.set(Some(e.id));
            } else if cell.get() == Some(e.id) {
                cell.set(None);
            }
        });
        Self {
            highlighted,
            subscription,
            ..Self::default()
        }
    }

    pub fn highlighted(&self) -> Option<u32> {
        self.highlighted.get()
    }

    pub fn set_highlighted(&self, id: Option<u32>) {
        self.highlighted.set(id);
    }

    pub fn trail_count(&self) -> usize {
        self.trails.len()
    }
}

impl Layer for ParticleTrailLayer {
    fn kind(&self) -> LayerKind {
        LayerKind::ParticleTrail
    }

    fn reseed(&mut self, viewport: &Viewport, style: &LayerStyle, rng: &mut Rng64) {
        let n = entity_budget(
            viewport,
            style.density,
            style.performance_tier,
            TRAIL_AREA_PER_ENTITY,
        )
        .min(HARD_ENTITY_CAP / POINTS_PER_TRAIL);
        let (w, h) = (viewport.width.max(0.0), viewport.height.max(0.0));
        self.width = w;
        self.trails = (0..n)
            .map(|_| Trail {
                base_y: rng.range(h * 0.15, h * 0.85),
                amplitude: rng.range(8.0, 40.0),
                wavelength: rng.range(80.0, 240.0),
                speed_px_s: rng.range(20.0, 70.0),
                start_x: rng.range(0.0, w),
                phase: rng.range(0.0, TAU),
                opacity: rng.range(0.3, 0.7),
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
        let tail = POINT_SPACING * POINTS_PER_TRAIL as f64;
        let span = self.width + tail;
        self.frame.clear();
        for (id, tr) in self.trails.iter().enumerate() {
            let head = if span > 0.0 {
                (tr.start_x + tr.speed_px_s * t).rem_euclid(span)
            } else {
                0.0
            };
            for k in 0..POINTS_PER_TRAIL {
                let x = head - k as f64 * POINT_SPACING;
                let y = tr.base_y + tr.amplitude * (x / tr.wavelength * TAU + tr.phase).sin();
                let fade = 1.0 - k as f64 / POINTS_PER_TRAIL as f64;
                self.frame.push(Particle {
                    center: Point::new(x, y),
                    radius: 0.6 + 1.4 * fade,
                    opacity: tr.opacity * fade,
                    trail: id as u32,
                });
            }
        }
        Ok(())
    }

    fn draw(&self, surface: &mut dyn DrawSurface, style: &LayerStyle) -> SceneResult<()> {
        let hot = self.highlighted.get();
        for p in &self.frame {
            let (radius, opacity) = if hot == Some(p.trail) {
                (p.radius * HIGHLIGHT_GAIN, (p.opacity * HIGHLIGHT_GAIN).min(1.0))
            } else {
                (p.radius, p.opacity)
            };
            surface.fill_circle(p.center, radius, style.color.with_opacity(opacity));
        }
        Ok(())
    }

    fn entity_count(&self) -> usize {
        self.trails.len() * POINTS_PER_TRAIL
    }

    fn detach(&mut self) {
        if let Some(mut sub) = self.subscription.take() {
            sub.cancel();
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/layers/trail.rs"]
mod tests;
