//! Error model used by Noko API client operations.

use reqwest::StatusCode;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, NokoError>;

/// Failure modes of a Noko API call: HTTP status errors, rejected tokens, timeouts, connection problems and payload decoding issues.
#[derive(Debug, Error)]
pub enum NokoError {
    #[error("HTTP {status}: {message}")]
    Http { status: StatusCode, message: String },
    #[error("authentication error: {0}")]
    Authentication(String),
    #[error("request timed out: {0}")]
    Timeout(String),
    #[error("network error: {0}")]
    Network(String),
    #[error("serialization error: {0}")]
    Serialization(String),
    #[error("unexpected error: {0}")]
    Other(String),
}

impl NokoError {
    /// Constructs an HTTP error variant from a status and response body.
    pub fn http(status: StatusCode, message: impl Into<String>) -> Self {
        NokoError::Http {
            status,
            message: message.into(),
        }
    }

    /// Returns the HTTP status carried by the error, if any.
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            NokoError::Http { status, .. } => Some(*status),
            _ => None,
        }
    }
}

impl From<reqwest::Error> for NokoError {
    /// Converts reqwest errors into semantic NokoError variants.
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            NokoError::Timeout(err.to_string())
        } else if err.is_status() {
            let status = err.status().unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
            NokoError::Http {
                status,
                message: err.to_string(),
            }
        } else if err.is_connect() {
            NokoError::Network(err.to_string())
        } else if err.is_decode() {
            NokoError::Serialization(err.to_string())
        } else {
            NokoError::Other(err.to_string())
        }
    }
}

impl From<serde_json::Error> for NokoError {
    fn from(err: serde_json::Error) -> Self {
        NokoError::Serialization(err.to_string())
    }
}
