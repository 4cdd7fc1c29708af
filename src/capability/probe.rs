use std::time::Instant;

use crate::{
    capability::{DeviceCapability, PerformanceTier, WebglSupport},
    foundation::{
        core::sanitize_pixel_ratio,
        error::{SceneError, SceneResult},
    },
};

/// Environment variable forcing the probed tier (`high` / `medium` / `low`).
pub const PERF_TIER_ENV: &str = "CURIOUSLABS_PERF_TIER";

/// Host feature probes. Each one may fail independently.
pub trait HostEnvironment {
    fn canvas_2d_supported(&self) -> SceneResult<bool>;

    fn webgl_support(&self) -> SceneResult<WebglSupport>;

    fn max_touch_points(&self) -> SceneResult<u32>;

    fn device_pixel_ratio(&self) -> SceneResult<f64>;

    fn prefers_reduced_motion(&self) -> SceneResult<bool>;
}

/// Fixed host description, used for headless runs and configuration files.
///
/// Missing fields are treated as undetectable.
#[derive(Clone, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct StaticEnvironment {
    pub canvas_2d: Option<bool>,
    pub webgl: Option<WebglSupport>,
    pub max_touch_points: Option<u32>,
    pub device_pixel_ratio: Option<f64>,
    pub prefers_reduced_motion: Option<bool>,
}

impl StaticEnvironment {
    /// A typical desktop browser: 2D + WebGL2, no touch, ratio 1, motion allowed.
    pub fn desktop() -> Self {
        Self {
            canvas_2d: Some(true),
            webgl: Some(WebglSupport::WebGl2),
            max_touch_points: Some(0),
            device_pixel_ratio: Some(1.0),
            prefers_reduced_motion: Some(false),
        }
    }

    fn field<T: Copy>(v: Option<T>, what: &str) -> SceneResult<T> {
        v.ok_or_else(|| SceneError::capability(format!("{what} is not detectable")))
    }
}

impl HostEnvironment for StaticEnvironment {
    fn canvas_2d_supported(&self) -> SceneResult<bool> {
        Self::field(self.canvas_2d, "2d canvas support")
    }

    fn webgl_support(&self) -> SceneResult<WebglSupport> {
        Self::field(self.webgl, "webgl support")
    }

    fn max_touch_points(&self) -> SceneResult<u32> {
        Self::field(self.max_touch_points, "touch points")
    }

    fn device_pixel_ratio(&self) -> SceneResult<f64> {
        Self::field(self.device_pixel_ratio, "device pixel ratio")
    }

    fn prefers_reduced_motion(&self) -> SceneResult<bool> {
        Self::field(self.prefers_reduced_motion, "reduced motion preference")
    }
}

/// Micro-benchmark returning elapsed wall-clock milliseconds for `iterations` steps.
pub trait Benchmark {
    fn run(&self, iterations: u32) -> SceneResult<f64>;
}

/// Tight arithmetic loop timed with [`Instant`].
#[derive(Clone, Copy, Debug, Default)]
pub struct ArithmeticBenchmark;

impl Benchmark for ArithmeticBenchmark {
    fn run(&self, iterations: u32) -> SceneResult<f64> {
        let start = Instant::now();
        let mut acc = 0.0f64;
        for i in 0..iterations {
            let x = std::hint::black_box(f64::from(i));
            acc += x.sqrt() * (x * 0.001).sin();
        }
        std::hint::black_box(acc);
        Ok(start.elapsed().as_secs_f64() * 1000.0)
    }
}

/// Benchmark size and the two tier cut points (inclusive, in milliseconds).
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ProbeSettings {
    pub iterations: u32,
    pub fast_ms: f64,
    pub medium_ms: f64,
}

impl Default for ProbeSettings {
    fn default() -> Self {
        Self {
            iterations: 1_000_000,
            fast_ms: 20.0,
            medium_ms: 50.0,
        }
    }
}

impl ProbeSettings {
    pub fn validate(&self) -> SceneResult<()> {
        if self.iterations == 0 {
            return Err(SceneError::validation("probe iterations must be > 0"));
        }
        if !(self.fast_ms.is_finite() && self.medium_ms.is_finite()) {
            return Err(SceneError::validation("probe thresholds must be finite"));
        }
        if self.fast_ms < 0.0 || self.fast_ms > self.medium_ms {
            return Err(SceneError::validation(
                "probe thresholds must satisfy 0 <= fastMs <= mediumMs",
            ));
        }
        Ok(())
    }
}

/// Threshold an elapsed benchmark time. Values equal to a cut point fall into the faster
/// tier; non-finite or negative timings are treated as untrustworthy.
pub fn classify_elapsed(elapsed_ms: f64, settings: &ProbeSettings) -> PerformanceTier {
    if !elapsed_ms.is_finite() || elapsed_ms < 0.0 {
        return PerformanceTier::Low;
    }
    if elapsed_ms <= settings.fast_ms {
        PerformanceTier::High
    } else if elapsed_ms <= settings.medium_ms {
        PerformanceTier::Medium
    } else {
        PerformanceTier::Low
    }
}

/// One-shot capability classification.
#[derive(Clone, Copy, Debug, Default)]
pub struct CapabilityProber {
    settings: ProbeSettings,
    forced_tier: Option<PerformanceTier>,
}

impl CapabilityProber {
    pub fn new(settings: ProbeSettings) -> Self {
        Self {
            settings,
            forced_tier: None,
        }
    }

    /// Pick up [`PERF_TIER_ENV`]; unparsable values are ignored.
    pub fn with_env_overrides(mut self) -> Self {
        self.forced_tier = std::env::var(PERF_TIER_ENV)
            .ok()
            .and_then(|v| v.parse::<PerformanceTier>().ok());
        self
    }

    pub fn with_forced_tier(mut self, tier: Option<PerformanceTier>) -> Self {
        self.forced_tier = tier;
        self
    }

    pub fn settings(&self) -> &ProbeSettings {
        &self.settings
    }

    #[tracing::instrument(skip(self, env, bench))]
    pub fn probe(&self, env: &dyn HostEnvironment, bench: &dyn Benchmark) -> DeviceCapability {
        let fallback = DeviceCapability::conservative();

        let canvas2d_supported = or_conservative(
            "canvas2d",
            env.canvas_2d_supported(),
            fallback.canvas2d_supported,
        );
        let webgl_support_tier =
            or_conservative("webgl", env.webgl_support(), fallback.webgl_support_tier);
        let is_touch_device = or_conservative(
            "touch",
            env.max_touch_points().map(|n| n > 0),
            fallback.is_touch_device,
        );
        let device_pixel_ratio = sanitize_pixel_ratio(or_conservative(
            "pixel ratio",
            env.device_pixel_ratio(),
            fallback.device_pixel_ratio,
        ));
        let prefers_reduced_motion = or_conservative(
            "reduced motion",
            env.prefers_reduced_motion(),
            fallback.prefers_reduced_motion,
        );

        let performance_tier = match self.forced_tier {
            Some(tier) => {
                tracing::debug!(tier = tier.as_str(), "performance tier forced");
                tier
            }
            None => self.benchmark_tier(bench),
        };

        let capability = DeviceCapability {
            webgl_support_tier,
            canvas2d_supported,
            performance_tier,
            device_pixel_ratio,
            is_touch_device,
            prefers_reduced_motion,
        };
        tracing::debug!(?capability, "device capability probed");
        capability
    }

    fn benchmark_tier(&self, bench: &dyn Benchmark) -> PerformanceTier {
        if self.settings.validate().is_err() {
            tracing::warn!(settings = ?self.settings, "invalid probe settings; assuming low tier");
            return PerformanceTier::Low;
        }
        match bench.run(self.settings.iterations) {
            Ok(elapsed_ms) => {
                let tier = classify_elapsed(elapsed_ms, &self.settings);
                tracing::debug!(elapsed_ms, tier = tier.as_str(), "benchmark finished");
                tier
            }
            Err(err) => {
                tracing::warn!(%err, "benchmark failed; assuming low tier");
                PerformanceTier::Low
            }
        }
    }
}

fn or_conservative<T>(what: &str, probed: SceneResult<T>, fallback: T) -> T {
    probed.unwrap_or_else(|err| {
        tracing::warn!(probe = what, %err, "capability probe failed; using conservative value");
        fallback
    })
}

#[cfg(test)]
#[path = "../../tests/unit/capability/probe.rs"]
mod tests;
