/// Convenience result type used across SuperShow.
pub type SuperShowResult<T> = Result<T, SuperShowError>;

/// Top-level error taxonomy used by engine APIs.
#[derive(thiserror::Error, Debug)]
pub enum SuperShowError {
    /// User-provided input that cannot be used (corrupt font file, unsupported extension).
    #[error("input error: {0}")]
    Input(String),

    /// Invalid configuration or API arguments.
    #[error("validation error: {0}")]
    Validation(String),

    /// A text backend failed to lay out or measure a word.
    #[error("measurement error: {0}")]
    Measurement(String),

    /// Errors when serializing or deserializing data structures.
    #[error("serialization error: {0}")]
    Serde(String),

    /// Wrapped lower-level error from dependencies or IO.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl SuperShowError {
    /// Build a [`SuperShowError::Input`] value.
    pub fn input(msg: impl Into<String>) -> Self {
        Self::Input(msg.into())
    }

    /// Build a [`SuperShowError::Validation`] value.
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Build a [`SuperShowError::Measurement`] value.
    pub fn measurement(msg: impl Into<String>) -> Self {
        Self::Measurement(msg.into())
    }

    /// Build a [`SuperShowError::Serde`] value.
    pub fn serde(msg: impl Into<String>) -> Self {
        Self::Serde(msg.into())
    }

    /// Whether this error should be surfaced to the user rather than only logged.
    pub fn is_user_facing(&self) -> bool {
        matches!(self, Self::Input(_))
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;
