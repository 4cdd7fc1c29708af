use crate::foundation::error::{SceneError, SceneResult};

pub use kurbo::{Point, Rect, Vec2};

/// Upper bound applied to the device pixel ratio when sizing drawing surfaces.
pub const MAX_PIXEL_RATIO: f64 = 2.0;

/// Visible viewport in CSS pixels plus the host's device pixel ratio.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Viewport {
    pub width: f64,
    pub height: f64,
    #[serde(default = "one")]
    pub device_pixel_ratio: f64,
}

fn one() -> f64 {
    1.0
}

impl Viewport {
    pub fn new(width: f64, height: f64, device_pixel_ratio: f64) -> Self {
        Self {
            width,
            height,
            device_pixel_ratio,
        }
    }

    pub fn validate(&self) -> SceneResult<()> {
        if !(self.width.is_finite() && self.width > 0.0) {
            return Err(SceneError::validation("viewport width must be > 0"));
        }
        if !(self.height.is_finite() && self.height > 0.0) {
            return Err(SceneError::validation("viewport height must be > 0"));
        }
        Ok(())
    }

    /// Area in CSS pixels; zero for degenerate viewports.
    pub fn area(&self) -> f64 {
        let w = if self.width.is_finite() { self.width.max(0.0) } else { 0.0 };
        let h = if self.height.is_finite() { self.height.max(0.0) } else { 0.0 };
        w * h
    }

    /// Pixel ratio actually used for surfaces: sanitized and clamped to `[1, MAX_PIXEL_RATIO]`.
    pub fn effective_pixel_ratio(&self) -> f64 {
        sanitize_pixel_ratio(self.device_pixel_ratio).clamp(1.0, MAX_PIXEL_RATIO)
    }

    /// Backing-store dimensions for a surface covering this viewport.
    pub fn surface_dims(&self) -> (u32, u32) {
        let ratio = self.effective_pixel_ratio();
        let dim = |css: f64| -> u32 {
            if !css.is_finite() || css <= 0.0 {
                return 1;
            }
            ((css * ratio).floor() as u32).max(1)
        };
        (dim(self.width), dim(self.height))
    }
}

/// Non-finite or non-positive ratios collapse to 1.
pub fn sanitize_pixel_ratio(ratio: f64) -> f64 {
    if ratio.is_finite() && ratio > 0.0 {
        ratio
    } else {
        1.0
    }
}

/// Straight (non-premultiplied) RGBA8 color.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub struct Rgba8 {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Rgba8 {
    pub const WHITE: Self = Self::rgb(255, 255, 255);
    pub const TRANSPARENT: Self = Self {
        r: 0,
        g: 0,
        b: 0,
        a: 0,
    };

    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 255 }
    }

    pub const fn rgba(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    /// Scale alpha by `opacity` (clamped to `[0, 1]`).
    pub fn with_opacity(self, opacity: f64) -> Self {
        let o = if opacity.is_finite() {
            opacity.clamp(0.0, 1.0)
        } else {
            0.0
        };
        Self {
            a: ((f64::from(self.a) * o).round() as u32).min(255) as u8,
            ..self
        }
    }

    pub fn to_premul(self) -> [u8; 4] {
        fn premul(c: u8, a: u8) -> u8 {
            let c = u16::from(c);
            let a = u16::from(a);
            (((c * a) + 127) / 255) as u8
        }
        [
            premul(self.r, self.a),
            premul(self.g, self.a),
            premul(self.b, self.a),
            self.a,
        ]
    }
}

/// Deterministic SplitMix64 generator; every entity seed in the crate goes through it.
#[derive(Clone, Copy, Debug)]
pub struct Rng64 {
    state: u64,
}

impl Rng64 {
    pub fn new(seed: u64) -> Self {
        Self { state: seed }
    }

    pub fn next_u64(&mut self) -> u64 {
        self.state = self.state.wrapping_add(0x9E37_79B9_7F4A_7C15);
        let mut z = self.state;
        z = (z ^ (z >> 30)).wrapping_mul(0xBF58_476D_1CE4_E5B9);
        z = (z ^ (z >> 27)).wrapping_mul(0x94D0_49BB_1331_11EB);
        z ^ (z >> 31)
    }

    /// Uniform in `[0, 1)` with 53 bits of precision.
    pub fn next_f64(&mut self) -> f64 {
        let v = self.next_u64() >> 11;
        (v as f64) * (1.0 / ((1u64 << 53) as f64))
    }

    pub fn range(&mut self, lo: f64, hi: f64) -> f64 {
        lo + (hi - lo) * self.next_f64()
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/core.rs"]
mod tests;
