//! Phase sequencing for scroll-driven scenes.

mod controller;

pub use controller::{PhaseController, ScrollGate, ScrollInput, ScrollOutcome};

use std::fmt::Debug;

/// A fixed, ordered sequence of discrete animation phases.
pub trait Phase: Copy + Eq + Debug + 'static {
    /// Every phase in order; the first is the initial phase, the last is terminal.
    const SEQUENCE: &'static [Self];

    fn name(self) -> &'static str;

    /// Duration of the transition into this phase.
    fn transition_ms(self) -> u64;

    /// Advance to the next phase automatically once the transition into this one settles.
    fn auto_advances(self) -> bool {
        false
    }

    fn initial() -> Self {
        Self::SEQUENCE[0]
    }

    fn terminal() -> Self {
        Self::SEQUENCE[Self::SEQUENCE.len() - 1]
    }

    fn index(self) -> usize {
        Self::SEQUENCE
            .iter()
            .position(|p| *p == self)
            .unwrap_or(0)
    }

    fn next(self) -> Option<Self> {
        Self::SEQUENCE.get(self.index() + 1).copied()
    }

    fn is_terminal(self) -> bool {
        self.next().is_none()
    }
}

/// Landing-page reveal sequence.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ScenePhase {
    Initial,
    HeroIntro,
    PlanetReveal,
    TextReveal,
    Interactive,
}

impl Phase for ScenePhase {
    const SEQUENCE: &'static [Self] = &[
        Self::Initial,
        Self::HeroIntro,
        Self::PlanetReveal,
        Self::TextReveal,
        Self::Interactive,
    ];

    fn name(self) -> &'static str {
        match self {
            Self::Initial => "initial",
            Self::HeroIntro => "hero-intro",
            Self::PlanetReveal => "planet-reveal",
            Self::TextReveal => "text-reveal",
            Self::Interactive => "interactive",
        }
    }

    fn transition_ms(self) -> u64 {
        match self {
            Self::Initial => 0,
            Self::HeroIntro => 1200,
            Self::PlanetReveal => 1500,
            Self::TextReveal => 1000,
            Self::Interactive => 600,
        }
    }
}

/// Single scroll-triggered animation: idle until scrolled, then plays to completion.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum PlaybackPhase {
    Idle,
    Playing,
    Complete,
}

impl Phase for PlaybackPhase {
    const SEQUENCE: &'static [Self] = &[Self::Idle, Self::Playing, Self::Complete];

    fn name(self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::Playing => "playing",
            Self::Complete => "complete",
        }
    }

    fn transition_ms(self) -> u64 {
        match self {
            Self::Idle => 0,
            Self::Playing => 2400,
            Self::Complete => 0,
        }
    }

    fn auto_advances(self) -> bool {
        matches!(self, Self::Playing)
    }
}
