//! Error types for the mazelearn crate

use thiserror::Error;

use crate::types::{Action, State};

/// Main error type for the mazelearn crate
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum Error {
    #[error("invalid configuration: {message}")]
    InvalidConfiguration { message: String },

    #[error("value for state {state}, action {action} read before initialization")]
    UninitializedValue { state: State, action: Action },

    #[error("non-terminal observation carries an empty action space (state {state})")]
    EmptyActionSpace { state: State },

    #[error("binary maze needs at least 2 levels, got {levels}")]
    InvalidMazeLevels { levels: usize },

    #[error(
        "reward location (level {level}, position {position}) is outside a {levels}-level maze"
    )]
    RewardLocationOutOfBounds {
        level: usize,
        position: usize,
        levels: usize,
    },

    #[error("agent returned no action for a non-terminal observation (state {state})")]
    MissingAction { state: State },

    #[error("progress bar template error: {message}")]
    ProgressBarTemplate { message: String },

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Convenience type alias for Results using the crate's Error type
pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    /// Shorthand for configuration failures raised during agent construction.
    pub(crate) fn config(message: impl Into<String>) -> Self {
        Error::InvalidConfiguration {
            message: message.into(),
        }
    }
}
