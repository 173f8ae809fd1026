/// Convenience result type used across shamebell.
pub type ShamebellResult<T> = Result<T, ShamebellError>;

/// Top-level error taxonomy used by the library APIs.
#[derive(thiserror::Error, Debug)]
pub enum ShamebellError {
    /// Invalid user-provided data, configuration, or call order.
    #[error("validation error: {0}")]
    Validation(String),

    /// An image (bundled frame or user background) could not be decoded.
    #[error("decode error: {0}")]
    Decode(String),

    /// A drawing surface could not be created or used.
    #[error("surface error: {0}")]
    Surface(String),

    /// Errors while quantizing or packing the animated output.
    #[error("encode error: {0}")]
    Encode(String),

    /// Errors when serializing or deserializing configuration.
    #[error("serialization error: {0}")]
    Serde(String),

    /// Wrapped lower-level error from dependencies or IO.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl ShamebellError {
    /// Build a [`ShamebellError::Validation`] value.
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Build a [`ShamebellError::Decode`] value.
    pub fn decode(msg: impl Into<String>) -> Self {
        Self::Decode(msg.into())
    }

    /// Build a [`ShamebellError::Surface`] value.
    pub fn surface(msg: impl Into<String>) -> Self {
        Self::Surface(msg.into())
    }

    /// Build a [`ShamebellError::Encode`] value.
    pub fn encode(msg: impl Into<String>) -> Self {
        Self::Encode(msg.into())
    }

    /// Build a [`ShamebellError::Serde`] value.
    pub fn serde(msg: impl Into<String>) -> Self {
        Self::Serde(msg.into())
    }

    /// Return `true` for errors that abort a single composite pass but leave session state usable.
    pub fn is_surface(&self) -> bool {
        matches!(self, Self::Surface(_))
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;
