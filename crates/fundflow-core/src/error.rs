//! Centralized error types for FundFlow.

use thiserror::Error;

/// Main error type for FundFlow operations outside the request lifecycle.
#[derive(Error, Debug)]
pub enum FundflowError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("TOML error: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("HTTP client error: {0}")]
    Client(#[from] reqwest::Error),
}

/// Result type for FundFlow operations.
pub type FundflowResult<T> = Result<T, FundflowError>;

impl FundflowError {
    /// Create a configuration error.
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }
}

/// Failure of a single outbound analysis call.
///
/// The controller collapses every variant into one user-facing message; the
/// variant and its detail only reach the logs.
#[derive(Error, Debug)]
pub enum BackendError {
    /// The backend could not be reached (refused, unreachable, timed out).
    #[error("Transport error: {0}")]
    Transport(#[source] reqwest::Error),

    /// The backend answered with a non-success status.
    #[error("Server error ({status}): {body}")]
    Server { status: u16, body: String },

    /// The backend answered successfully but without a narrative.
    #[error("Malformed response: {0}")]
    MalformedResponse(String),
}

impl BackendError {
    /// Short, stable name of the variant for structured logs.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Transport(_) => "transport",
            Self::Server { .. } => "server",
            Self::MalformedResponse(_) => "malformed_response",
        }
    }

    pub fn malformed(msg: impl Into<String>) -> Self {
        Self::MalformedResponse(msg.into())
    }
}
