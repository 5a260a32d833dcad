/// Convenience result type used across the player.
pub type PlayerResult<T> = Result<T, PlayerError>;

/// Top-level error taxonomy used by player APIs.
///
/// Navigation never produces errors: rejected or impossible moves are silent no-ops. Errors are
/// reserved for malformed input handed to the player (scripts, options, URLs).
#[derive(thiserror::Error, Debug)]
pub enum PlayerError {
    /// Invalid user-provided script or option data.
    #[error("validation error: {0}")]
    Validation(String),

    /// A script could not be interpreted (unknown slide id, inconsistent lookup tables).
    #[error("script error: {0}")]
    Script(String),

    /// Errors when serializing or deserializing data structures.
    #[error("serialization error: {0}")]
    Serde(String),

    /// Wrapped lower-level error from dependencies or IO.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl PlayerError {
    /// Build a [`PlayerError::Validation`] value.
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Build a [`PlayerError::Script`] value.
    pub fn script(msg: impl Into<String>) -> Self {
        Self::Script(msg.into())
    }

    /// Build a [`PlayerError::Serde`] value.
    pub fn serde(msg: impl Into<String>) -> Self {
        Self::Serde(msg.into())
    }
}

impl From<serde_json::Error> for PlayerError {
    fn from(err: serde_json::Error) -> Self {
        Self::serde(err.to_string())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;
