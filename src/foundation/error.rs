/// Result alias used across the crate.
pub type IconResult<T> = Result<T, IconError>;

/// Errors surfaced by document loading, asset decoding and rendering.
///
/// Most per-layer problems are recovered locally (logged and skipped); these variants are what
/// remains when recovery is not possible.
#[derive(thiserror::Error, Debug)]
pub enum IconError {
    /// Invalid configuration or document structure.
    #[error("validation error: {0}")]
    Validation(String),

    /// A color specifier could not be constructed.
    #[error("color error: {0}")]
    Color(String),

    /// An asset could not be decoded or rasterized.
    #[error("decode error: {0}")]
    Decode(String),

    /// A backend invariant was violated while executing a render plan.
    #[error("render error: {0}")]
    Render(String),

    /// The icon document could not be (de)serialized.
    #[error("serialization error: {0}")]
    Serde(String),

    /// Wrapped lower-level failure.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl IconError {
    /// Build an [`IconError::Validation`].
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Build an [`IconError::Color`].
    pub fn color(msg: impl Into<String>) -> Self {
        Self::Color(msg.into())
    }

    /// Build an [`IconError::Decode`].
    pub fn decode(msg: impl Into<String>) -> Self {
        Self::Decode(msg.into())
    }

    /// Build an [`IconError::Render`].
    pub fn render(msg: impl Into<String>) -> Self {
        Self::Render(msg.into())
    }

    /// Build an [`IconError::Serde`].
    pub fn serde(msg: impl Into<String>) -> Self {
        Self::Serde(msg.into())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;
