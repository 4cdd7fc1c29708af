use crate::{
    animation::ease::Ease,
    foundation::error::{SceneError, SceneResult},
};

pub fn lerp(a: f64, b: f64, t: f64) -> f64 {
    a + (b - a) * t
}

/// A value pinned at normalized progress `at`; `ease` shapes the segment arriving here.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Keyframe {
    pub at: f64,
    pub value: f64,
    pub ease: Ease,
}

impl Keyframe {
    pub const fn new(at: f64, value: f64, ease: Ease) -> Self {
        Self { at, value, ease }
    }
}

/// Scalar track over normalized progress in `[0, 1]`.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Keyframes {
    pub keys: Vec<Keyframe>, // sorted by `at`
}

impl Keyframes {
    pub fn new(keys: Vec<Keyframe>) -> SceneResult<Self> {
        let kf = Self { keys };
        kf.validate()?;
        Ok(kf)
    }

    pub fn constant(value: f64) -> Self {
        Self {
            keys: vec![Keyframe::new(0.0, value, Ease::Linear)],
        }
    }

    pub fn validate(&self) -> SceneResult<()> {
        if self.keys.is_empty() {
            return Err(SceneError::validation("keyframes must have at least one key"));
        }
        if self.keys.iter().any(|k| !k.at.is_finite() || !k.value.is_finite()) {
            return Err(SceneError::validation("keyframes must be finite"));
        }
        if !self.keys.windows(2).all(|w| w[0].at <= w[1].at) {
            return Err(SceneError::validation("keyframes must be sorted by progress"));
        }
        Ok(())
    }

    /// Sample at `progress`; values before the first key and after the last key hold.
    pub fn sample(&self, progress: f64) -> f64 {
        let Some(first) = self.keys.first() else {
            return 0.0;
        };
        let p = if progress.is_nan() { 0.0 } else { progress };

        let idx = self.keys.partition_point(|k| k.at <= p);
        if idx == 0 {
            return first.value;
        }
        if idx >= self.keys.len() {
            return self.keys[self.keys.len() - 1].value;
        }

        let a = self.keys[idx - 1];
        let b = self.keys[idx];
        let span = b.at - a.at;
        if span <= 0.0 {
            return b.value;
        }
        let t = b.ease.apply((p - a.at) / span);
        lerp(a.value, b.value, t)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/animation/keyframes.rs"]
mod tests;
