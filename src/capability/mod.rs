//! Device capability detection.
//!
//! Capability detection only gates cosmetic decisions, so the contract is total: the
//! prober always returns a fully populated [`DeviceCapability`] and every detection
//! failure degrades to the conservative value instead of surfacing an error.

mod probe;

pub use probe::{
    ArithmeticBenchmark, Benchmark, CapabilityProber, HostEnvironment, PERF_TIER_ENV,
    ProbeSettings, StaticEnvironment, classify_elapsed,
};

use std::str::FromStr;

use crate::foundation::error::SceneError;

/// Coarse client rendering capability used to scale density and effects.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PerformanceTier {
    High,
    Medium,
    Low,
}

impl PerformanceTier {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::High => "high",
            Self::Medium => "medium",
            Self::Low => "low",
        }
    }

    /// Multiplier applied to requested entity density.
    pub fn density_scale(self) -> f64 {
        match self {
            Self::High => 1.0,
            Self::Medium => 0.6,
            Self::Low => 0.35,
        }
    }

    /// Minimum spacing between animated frames; zero means every host frame.
    pub fn min_frame_interval_ms(self) -> f64 {
        match self {
            Self::High | Self::Medium => 0.0,
            Self::Low => 1000.0 / 30.0,
        }
    }
}

impl FromStr for PerformanceTier {
    type Err = SceneError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "high" => Ok(Self::High),
            "medium" => Ok(Self::Medium),
            "low" => Ok(Self::Low),
            other => Err(SceneError::validation(format!(
                "unknown performance tier \"{other}\""
            ))),
        }
    }
}

/// Best 3D drawing surface available.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum WebglSupport {
    None,
    WebGl1,
    WebGl2,
}

/// Immutable per-session capability record.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeviceCapability {
    pub webgl_support_tier: WebglSupport,
    pub canvas2d_supported: bool,
    pub performance_tier: PerformanceTier,
    pub device_pixel_ratio: f64,
    pub is_touch_device: bool,
    pub prefers_reduced_motion: bool,
}

impl DeviceCapability {
    /// The record used when nothing could be detected.
    pub fn conservative() -> Self {
        Self {
            webgl_support_tier: WebglSupport::None,
            canvas2d_supported: false,
            performance_tier: PerformanceTier::Low,
            device_pixel_ratio: 1.0,
            is_touch_device: false,
            prefers_reduced_motion: true,
        }
    }

    /// Copy with a re-derived pixel ratio (window moved between displays / zoomed).
    pub fn with_pixel_ratio(self, ratio: f64) -> Self {
        Self {
            device_pixel_ratio: crate::foundation::core::sanitize_pixel_ratio(ratio),
            ..self
        }
    }
}

impl Default for DeviceCapability {
    fn default() -> Self {
        Self::conservative()
    }
}
