//! JSON scene configuration and per-layer visual options.

use std::path::Path;

use crate::{
    capability::{DeviceCapability, PerformanceTier, ProbeSettings, StaticEnvironment},
    foundation::{
        color::parse_hex_color,
        core::{Rgba8, Viewport},
        error::{SceneError, SceneResult},
    },
    layers::{LayerKind, LayerStyle, MAX_DENSITY},
};

/// Page background behind every layer when frames are composited headless.
pub const DEFAULT_BACKGROUND: Rgba8 = Rgba8::rgb(5, 6, 15);

/// Visual options accepted by a canvas layer.
///
/// Omitted `performanceTier` / `reducedMotion` inherit the probed device capability.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct LayerOptions {
    pub kind: LayerKind,
    #[serde(default = "unit_density")]
    pub density: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub performance_tier: Option<PerformanceTier>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reduced_motion: Option<bool>,
}

fn unit_density() -> f64 {
    1.0
}

impl LayerOptions {
    pub fn new(kind: LayerKind) -> Self {
        Self {
            kind,
            density: 1.0,
            color: None,
            performance_tier: None,
            reduced_motion: None,
        }
    }

    pub fn validate(&self) -> SceneResult<()> {
        if !self.density.is_finite() || self.density < 0.0 {
            return Err(SceneError::validation(format!(
                "{} density must be finite and >= 0",
                self.kind.as_str()
            )));
        }
        if let Some(c) = &self.color {
            parse_hex_color(c)?;
        }
        Ok(())
    }

    /// Merge with the device capability into the style a renderer draws with.
    ///
    /// A device that prefers reduced motion always gets it, whatever the options say.
    pub fn resolve(&self, capability: &DeviceCapability) -> SceneResult<LayerStyle> {
        self.validate()?;
        let color = match &self.color {
            Some(c) => parse_hex_color(c)?,
            None => default_color(self.kind),
        };
        Ok(LayerStyle {
            density: self.density.min(MAX_DENSITY),
            color,
            performance_tier: self
                .performance_tier
                .unwrap_or(capability.performance_tier),
            reduced_motion: capability.prefers_reduced_motion
                || self.reduced_motion.unwrap_or(false),
        })
    }
}

fn default_color(kind: LayerKind) -> Rgba8 {
    match kind {
        LayerKind::Starfield | LayerKind::Comet => Rgba8::WHITE,
        LayerKind::Grid => Rgba8::rgb(90, 140, 255),
        LayerKind::ParticleTrail => Rgba8::rgb(170, 120, 255),
    }
}

fn default_layers() -> Vec<LayerOptions> {
    vec![
        LayerOptions::new(LayerKind::Starfield),
        LayerOptions::new(LayerKind::Grid),
    ]
}

fn desktop() -> StaticEnvironment {
    StaticEnvironment::desktop()
}

/// Scene description used by headless runs and the CLI.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SceneConfig {
    pub viewport: Viewport,
    #[serde(default = "desktop")]
    pub environment: StaticEnvironment,
    #[serde(default)]
    pub probe: ProbeSettings,
    #[serde(default)]
    pub seed: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub background: Option<String>,
    #[serde(default = "default_layers")]
    pub layers: Vec<LayerOptions>,
}

impl Default for SceneConfig {
    fn default() -> Self {
        Self {
            viewport: Viewport::new(1280.0, 720.0, 1.0),
            environment: desktop(),
            probe: ProbeSettings::default(),
            seed: 0,
            background: None,
            layers: default_layers(),
        }
    }
}

impl SceneConfig {
    pub fn from_json_str(s: &str) -> SceneResult<Self> {
        let cfg: Self = serde_json::from_str(s)?;
        cfg.validate()?;
        Ok(cfg)
    }

    pub fn from_path(path: &Path) -> SceneResult<Self> {
        let raw = std::fs::read_to_string(path).map_err(|e| {
            SceneError::validation(format!("read config '{}': {e}", path.display()))
        })?;
        Self::from_json_str(&raw)
    }

    pub fn validate(&self) -> SceneResult<()> {
        self.viewport.validate()?;
        self.probe.validate()?;
        if let Some(bg) = &self.background {
            parse_hex_color(bg)?;
        }
        for layer in &self.layers {
            layer.validate()?;
        }
        Ok(())
    }

    pub fn background_color(&self) -> SceneResult<Rgba8> {
        match &self.background {
            Some(bg) => parse_hex_color(bg),
            None => Ok(DEFAULT_BACKGROUND),
        }
    }
}

#[cfg(test)]
#[path = "../tests/unit/config/config.rs"]
mod tests;
