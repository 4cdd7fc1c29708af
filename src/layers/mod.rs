//! Decorative canvas layers.
//!
//! A layer owns its entities exclusively (no identity beyond the array index), derives
//! every per-frame value from elapsed time, and redraws the whole surface each frame.

mod comet;
mod grid;
mod starfield;
mod trail;

pub use comet::{COMET_AREA_PER_ENTITY, CometLayer};
pub use grid::{GRID_SPACING, GridLayer, GridMode};
pub use starfield::{STAR_AREA_PER_ENTITY, StarfieldLayer};
pub use trail::{POINTS_PER_TRAIL, ParticleTrailLayer, TRAIL_AREA_PER_ENTITY};

use std::rc::Rc;

use crate::{
    bus::EventBus,
    capability::PerformanceTier,
    foundation::{
        core::{Rgba8, Rng64, Viewport},
        error::SceneResult,
    },
    render::DrawSurface,
};

/// Absolute entity cap per layer, whatever density was requested.
pub const HARD_ENTITY_CAP: usize = 1500;

/// Requested densities are clamped to `[0, MAX_DENSITY]`.
pub const MAX_DENSITY: f64 = 2.0;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum LayerKind {
    Starfield,
    Grid,
    ParticleTrail,
    Comet,
}

impl LayerKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Starfield => "starfield",
            Self::Grid => "grid",
            Self::ParticleTrail => "particleTrail",
            Self::Comet => "comet",
        }
    }

    /// Build an empty layer of this kind. Trail layers listen for hover events on `bus`.
    pub fn build(self, bus: Option<&Rc<EventBus>>) -> Box<dyn Layer> {
        match self {
            Self::Starfield => Box::new(StarfieldLayer::new()),
            Self::Grid => Box::new(GridLayer::new()),
            Self::ParticleTrail => match bus {
                Some(bus) => Box::new(ParticleTrailLayer::connected(bus)),
                None => Box::new(ParticleTrailLayer::new()),
            },
            Self::Comet => Box::new(CometLayer::new()),
        }
    }
}

/// Fully resolved visual parameters of one layer.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LayerStyle {
    pub density: f64,
    pub color: Rgba8,
    pub performance_tier: PerformanceTier,
    pub reduced_motion: bool,
}

impl Default for LayerStyle {
    fn default() -> Self {
        Self {
            density: 1.0,
            color: Rgba8::WHITE,
            performance_tier: PerformanceTier::High,
            reduced_motion: false,
        }
    }
}

/// Time since the renderer started and since the previous update, in milliseconds.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FrameTime {
    pub elapsed_ms: f64,
    pub delta_ms: f64,
}

impl FrameTime {
    pub const ZERO: Self = Self {
        elapsed_ms: 0.0,
        delta_ms: 0.0,
    };

    pub fn elapsed_secs(&self) -> f64 {
        self.elapsed_ms / 1000.0
    }
}

/// One decorative layer driven by a canvas renderer.
pub trait Layer {
    fn kind(&self) -> LayerKind;

    /// Regenerate the entity set for `viewport`. Called on mount and on every resize.
    fn reseed(&mut self, viewport: &Viewport, style: &LayerStyle, rng: &mut Rng64);

    /// Recompute per-frame state from elapsed time. Always runs before `draw`.
    fn update(&mut self, time: FrameTime, style: &LayerStyle) -> SceneResult<()>;

    /// Paint onto an already cleared surface.
    fn draw(&self, surface: &mut dyn DrawSurface, style: &LayerStyle) -> SceneResult<()>;

    fn entity_count(&self) -> usize;

    /// Drop any outside listeners; called once when the renderer tears down.
    fn detach(&mut self) {}
}

/// NaN and negative densities collapse to zero; large ones clamp to [`MAX_DENSITY`].
pub fn sanitize_density(density: f64) -> f64 {
    if density.is_nan() {
        return 0.0;
    }
    density.clamp(0.0, MAX_DENSITY)
}

/// `min(HARD_ENTITY_CAP, floor(area / area_per_entity * density * tier_scale))`.
pub fn entity_budget(
    viewport: &Viewport,
    density: f64,
    tier: PerformanceTier,
    area_per_entity: f64,
) -> usize {
    if !(area_per_entity.is_finite() && area_per_entity > 0.0) {
        return 0;
    }
    let raw = (viewport.area() / area_per_entity * sanitize_density(density)
        * tier.density_scale())
    .floor();
    if !raw.is_finite() || raw <= 0.0 {
        return 0;
    }
    (raw as usize).min(HARD_ENTITY_CAP)
}

#[cfg(test)]
#[path = "../../tests/unit/layers/budget.rs"]
mod tests;
