/// Convenience result type used across the scene crate.
pub type SceneResult<T> = Result<T, SceneError>;

/// Error taxonomy for scene APIs.
///
/// Nothing in this crate is load-bearing business logic, so most of these are recovered
/// locally (see the capability prober, the renderer loop and the mission tracker). They
/// still exist as values so the degraded paths can be logged and tested.
#[derive(thiserror::Error, Debug)]
pub enum SceneError {
    /// Invalid user-provided configuration.
    #[error("validation error: {0}")]
    Validation(String),

    /// A host capability could not be detected.
    #[error("capability error: {0}")]
    Capability(String),

    /// A drawing surface could not be acquired or resized.
    #[error("surface error: {0}")]
    Surface(String),

    /// A layer failed while updating or drawing a frame.
    #[error("render error: {0}")]
    Render(String),

    /// Key-value storage failed to read or write.
    #[error("storage error: {0}")]
    Storage(String),

    /// Errors when serializing or deserializing data structures.
    #[error("serialization error: {0}")]
    Serde(String),

    /// Wrapped lower-level error from dependencies or IO.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl SceneError {
    /// Build a [`SceneError::Validation`] value.
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Build a [`SceneError::Capability`] value.
    pub fn capability(msg: impl Into<String>) -> Self {
        Self::Capability(msg.into())
    }

    /// Build a [`SceneError::Surface`] value.
    pub fn surface(msg: impl Into<String>) -> Self {
        Self::Surface(msg.into())
    }

    /// Build a [`SceneError::Render`] value.
    pub fn render(msg: impl Into<String>) -> Self {
        Self::Render(msg.into())
    }

    /// Build a [`SceneError::Storage`] value.
    pub fn storage(msg: impl Into<String>) -> Self {
        Self::Storage(msg.into())
    }

    /// Build a [`SceneError::Serde`] value.
    pub fn serde(msg: impl Into<String>) -> Self {
        Self::Serde(msg.into())
    }
}

impl From<serde_json::Error> for SceneError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serde(err.to_string())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;
