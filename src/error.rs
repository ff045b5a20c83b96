//! Error types surfaced by the timer core.

use std::io;

use noko_api::NokoError;
use thiserror::Error;

/// Validation failure for free-form time typed by the user.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TimeInputError {
    #[error("{message}")]
    InvalidFormat { message: &'static str },
}

impl TimeInputError {
    pub(crate) fn invalid(message: &'static str) -> Self {
        TimeInputError::InvalidFormat { message }
    }
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("could not determine config directory")]
    NoConfigDir,
    #[error("io error: {0}")]
    Io(#[from] io::Error),
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
    #[error("personal access token is not configured")]
    MissingToken,
    #[error("api client error: {0}")]
    Client(#[from] NokoError),
}

/// Failure of a user-facing action. `title` is the short headline shown to the user.
#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("{title}: {source}")]
    Api {
        title: &'static str,
        #[source]
        source: NokoError,
    },
    #[error("Invalid Input: {0}")]
    InvalidInput(#[from] TimeInputError),
}

impl ServiceError {
    pub(crate) fn api(title: &'static str) -> impl FnOnce(NokoError) -> Self {
        move |source| ServiceError::Api { title, source }
    }

    pub fn title(&self) -> &'static str {
        match self {
            ServiceError::Api { title, .. } => title,
            ServiceError::InvalidInput(_) => "Invalid Input",
        }
    }
}
