/// Convenience result type used across candyscroll.
pub type ScrollResult<T> = Result<T, ScrollError>;

/// Top-level error taxonomy used by player, catalogue and relay APIs.
#[derive(thiserror::Error, Debug)]
pub enum ScrollError {
    /// Invalid catalogue data, configuration or caller input.
    #[error("validation error: {0}")]
    Validation(String),

    /// Errors while fetching or decoding frame assets.
    #[error("asset error: {0}")]
    Asset(String),

    /// Errors raised by surface and compositing helpers.
    #[error("render error: {0}")]
    Render(String),

    /// Errors raised by the mail relay boundary.
    #[error("relay error: {0}")]
    Relay(String),

    /// Errors when serializing or deserializing data structures.
    #[error("serialization error: {0}")]
    Serde(String),

    /// Wrapped lower-level error from dependencies or IO.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl ScrollError {
    /// Build a [`ScrollError::Validation`] value.
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Build a [`ScrollError::Asset`] value.
    pub fn asset(msg: impl Into<String>) -> Self {
        Self::Asset(msg.into())
    }

    /// Build a [`ScrollError::Render`] value.
    pub fn render(msg: impl Into<String>) -> Self {
        Self::Render(msg.into())
    }

    /// Build a [`ScrollError::Relay`] value.
    pub fn relay(msg: impl Into<String>) -> Self {
        Self::Relay(msg.into())
    }

    /// Build a [`ScrollError::Serde`] value.
    pub fn serde(msg: impl Into<String>) -> Self {
        Self::Serde(msg.into())
    }
}

impl From<serde_json::Error> for ScrollError {
    fn from(err: serde_json::Error) -> Self {
        Self::serde(err.to_string())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;
