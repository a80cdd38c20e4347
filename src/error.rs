use thiserror::Error;

/// Errors surfaced by the Data API client.
///
/// Local failures (`ParameterError`, `UnsupportedColumnType`, `DecodeError`,
/// `ConfigError`) are raised before or after the remote call; everything the
/// endpoint reports is passed through as `Remote` or `Transport` untouched.
#[derive(Debug, Error)]
pub enum RdsDataError {
    #[cfg(feature = "http")]
    #[error(transparent)]
    Transport(#[from] reqwest::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("Invalid parameter type for name: {name} value: {value} type: {inferred}")]
    ParameterError {
        name: String,
        value: String,
        inferred: String,
    },

    #[error("Unsupported column type: {0}")]
    UnsupportedColumnType(String),

    #[error("Result decode error: {0}")]
    DecodeError(String),

    /// Failure reported by the endpoint. `body` is the response body exactly as
    /// received; `error_type` is the endpoint's exception name when it sent one
    /// (e.g. `BadRequestException`, `StatementTimeoutException`).
    #[error("Data API error (status {status}): {message}")]
    Remote {
        status: u16,
        error_type: Option<String>,
        message: String,
        body: String,
    },

    #[error("Other error: {0}")]
    Other(String),
}

impl RdsDataError {
    /// A remote failure with only a status and message, as scripted transports report it.
    #[must_use]
    pub fn remote(status: u16, message: impl Into<String>) -> Self {
        let message = message.into();
        Self::Remote {
            status,
            error_type: None,
            body: message.clone(),
            message,
        }
    }

    /// The endpoint's exception name, for remote failures that carried one.
    #[must_use]
    pub fn error_type(&self) -> Option<&str> {
        match self {
            Self::Remote { error_type, .. } => error_type.as_deref(),
            _ => None,
        }
    }

    /// True when the failure came from the endpoint or the network rather than local marshalling.
    #[must_use]
    pub fn is_remote(&self) -> bool {
        match self {
            Self::Remote { .. } => true,
            #[cfg(feature = "http")]
            Self::Transport(_) => true,
            _ => false,
        }
    }
}
