//! Typed Noko time tracking API client used by the timer core.

pub mod client;
pub mod config;
pub mod error;
pub mod models;
pub mod pacer;

pub use client::NokoClient;
pub use config::NokoConfig;
pub use error::{NokoError, Result};
pub use models::{
    ApiEntry, ApiProject, ApiTag, ApiTimer, ApiTimerState, ApiUser, CreateEntryRequest,
    LogTimerRequest,
};
pub use pacer::RequestPacer;
