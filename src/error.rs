//! Error types for the Poolslip engine.

use chrono::{DateTime, Utc};
use thiserror::Error;

/// The main error type for Poolslip.
#[derive(Error, Debug)]
pub enum Error {
    /// IO errors (file operations, etc.)
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// HTTP transport errors.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Configuration errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// Serialization/deserialization errors
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Channel communication errors
    #[error("Channel error: {0}")]
    Channel(String),

    /// Local slip validation failures (no network call was made).
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// The submission collaborator rejected the slip with a structured
    /// reason, surfaced verbatim.
    #[error("submission rejected: {message}")]
    Rejected { message: String },

    /// Network connectivity errors
    #[error("Network error: {0}")]
    Network(String),

    /// Invalid input or state
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Generic application error
    #[error("{0}")]
    Application(String),
}

/// Validation failures raised before a slip ever reaches the network.
///
/// The two variants must stay distinguishable from the message alone: an
/// incomplete slip can be fixed by picking outcomes, a passed deadline
/// cannot.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// One or more matches on the slip carry no selected outcome.
    #[error("slip incomplete: {missing} match(es) have no selected outcome")]
    IncompleteSelections { missing: usize },

    /// The game deadline passed before the submission attempt.
    #[error("game deadline passed at {deadline}")]
    DeadlinePassed { deadline: DateTime<Utc> },
}

/// Alias for Result with our Error type.
pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    /// Create a new config error.
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Create a new channel error.
    pub fn channel(msg: impl Into<String>) -> Self {
        Self::Channel(msg.into())
    }

    /// Create a new rejection error carrying the collaborator's reason.
    pub fn rejected(msg: impl Into<String>) -> Self {
        Self::Rejected {
            message: msg.into(),
        }
    }

    /// Create a new invalid input error.
    pub fn invalid_input(msg: impl Into<String>) -> Self {
        Self::InvalidInput(msg.into())
    }

    /// Create a new network error.
    pub fn network(msg: impl Into<String>) -> Self {
        Self::Network(msg.into())
    }

    /// Create a new application error.
    pub fn application(msg: impl Into<String>) -> Self {
        Self::Application(msg.into())
    }

    /// Check if this error is recoverable (user can retry).
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            Self::Network(_) | Self::Http(_) | Self::Rejected { .. } | Self::Channel(_)
        )
    }
}
