//! Error types for the redeploy control

use thiserror::Error;

/// Main error type for the redeploy control
#[derive(Error, Debug)]
pub enum ControlError {
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),

    #[error("HTTP error: {0}")]
    HttpError(#[from] reqwest::Error),

    /// Both the bearer token and the application identifier must be
    /// configured before any upstream call is attempted.
    #[error("missing required token and appId")]
    MissingCredentials,

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("Gateway error: {0}")]
    GatewayError(String),

    #[error("Session error: {0}")]
    SessionError(String),

    #[error("Server error: {0}")]
    ServerError(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<anyhow::Error> for ControlError {
    fn from(err: anyhow::Error) -> Self {
        ControlError::Internal(err.to_string())
    }
}
