/// Crate-wide result alias.
pub type OverprintResult<T> = Result<T, OverprintError>;

/// Errors produced while preparing, rendering, or exporting a scene.
#[derive(thiserror::Error, Debug)]
pub enum OverprintError {
    /// The scene is structurally invalid (missing fields, out-of-range values, bad dimensions).
    #[error("invalid scene: {0}")]
    InvalidScene(String),

    /// An overlay image could not be resolved or decoded.
    #[error("decode failure: {0}")]
    Decode(String),

    /// The rendered surface could not be serialized to the target format.
    #[error("encode failure: {0}")]
    Encode(String),

    /// A font could not be loaded or registered.
    #[error("font error: {0}")]
    Font(String),

    /// Configuration could not be read or is inconsistent.
    #[error("config error: {0}")]
    Config(String),

    /// JSON (de)serialization failed outside of scene parsing.
    #[error("serialization error: {0}")]
    Serde(String),

    /// Anything else, with its source chain preserved.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl OverprintError {
    /// Build an [`OverprintError::InvalidScene`].
    pub fn invalid_scene(msg: impl Into<String>) -> Self {
        Self::InvalidScene(msg.into())
    }

    /// Build an [`OverprintError::Decode`].
    pub fn decode(msg: impl Into<String>) -> Self {
        Self::Decode(msg.into())
    }

    /// Build an [`OverprintError::Encode`].
    pub fn encode(msg: impl Into<String>) -> Self {
        Self::Encode(msg.into())
    }

    /// Build an [`OverprintError::Font`].
    pub fn font(msg: impl Into<String>) -> Self {
        Self::Font(msg.into())
    }

    /// Build an [`OverprintError::Config`].
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Build an [`OverprintError::Serde`].
    pub fn serde(msg: impl Into<String>) -> Self {
        Self::Serde(msg.into())
    }

    /// Whether the error was caused by caller input rather than the renderer itself.
    ///
    /// The HTTP surface maps these to `400 Bad Request`.
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            Self::InvalidScene(_) | Self::Decode(_) | Self::Serde(_)
        )
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;
