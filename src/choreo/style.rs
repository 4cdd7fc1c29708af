//! Pure style computation: `(phase, transition progress) -> StyleRecord`.
//!
//! Each element enters during the transition into one phase. Before that phase it
//! holds its hidden pose, while entering it samples keyframe tracks by progress, and
//! afterwards it rests.

use crate::{
    animation::{
        ease::Ease,
        keyframes::{Keyframe, Keyframes},
    },
    phase::{Phase, ScenePhase},
};

/// Presentation values consumed by whatever draws the element.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StyleRecord {
    pub opacity: f64,
    pub translate_y: f64,
    pub scale: f64,
    pub blur_px: f64,
}

impl StyleRecord {
    pub const REST: Self = Self {
        opacity: 1.0,
        translate_y: 0.0,
        scale: 1.0,
        blur_px: 0.0,
    };
}

struct Tracks {
    opacity: Keyframes,
    translate_y: Keyframes,
    scale: Keyframes,
    blur_px: Keyframes,
}

impl Tracks {
    fn sample(&self, progress: f64) -> StyleRecord {
        StyleRecord {
            opacity: self.opacity.sample(progress).clamp(0.0, 1.0),
            translate_y: self.translate_y.sample(progress),
            scale: self.scale.sample(progress),
            blur_px: self.blur_px.sample(progress).max(0.0),
        }
    }
}

fn track(from: f64, to: f64, ease: Ease) -> Keyframes {
    Keyframes {
        keys: vec![Keyframe::new(0.0, from, Ease::Linear), Keyframe::new(1.0, to, ease)],
    }
}

fn style_for(phase: ScenePhase, progress: f64, enters: ScenePhase, tracks: Tracks) -> StyleRecord {
    let p = if progress.is_finite() {
        progress.clamp(0.0, 1.0)
    } else {
        1.0
    };
    if phase.index() < enters.index() {
        tracks.sample(0.0)
    } else if phase == enters {
        tracks.sample(p)
    } else {
        tracks.sample(1.0)
    }
}

pub fn hero_style(phase: ScenePhase, progress: f64) -> StyleRecord {
    style_for(
        phase,
        progress,
        ScenePhase::HeroIntro,
        Tracks {
            opacity: track(0.0, 1.0, Ease::OutCubic),
            translate_y: track(32.0, 0.0, Ease::OutExpo),
            scale: track(0.96, 1.0, Ease::OutCubic),
            blur_px: track(6.0, 0.0, Ease::OutQuad),
        },
    )
}

/// The planet fades in over the first 60% of its transition while it grows.
pub fn planet_style(phase: ScenePhase, progress: f64) -> StyleRecord {
    style_for(
        phase,
        progress,
        ScenePhase::PlanetReveal,
        Tracks {
            opacity: Keyframes {
                keys: vec![
                    Keyframe::new(0.0, 0.0, Ease::Linear),
                    Keyframe::new(0.6, 1.0, Ease::InOutSine),
                ],
            },
            translate_y: Keyframes::constant(0.0),
            scale: track(0.6, 1.0, Ease::InOutCubic),
            blur_px: track(12.0, 0.0, Ease::OutCubic),
        },
    )
}

pub fn headline_style(phase: ScenePhase, progress: f64) -> StyleRecord {
    style_for(
        phase,
        progress,
        ScenePhase::TextReveal,
        Tracks {
            opacity: track(0.0, 1.0, Ease::InOutSine),
            translate_y: track(24.0, 0.0, Ease::OutCubic),
            scale: Keyframes::constant(1.0),
            blur_px: track(4.0, 0.0, Ease::OutQuad),
        },
    )
}

#[cfg(test)]
#[path = "../../tests/unit/choreo/style.rs"]
mod tests;
