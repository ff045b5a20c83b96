//! Timer core for tracking time against Noko projects.
//!
//! The crate turns timer snapshots fetched from the Noko API into a live elapsed
//! display, fires interval notifications, and summarises logged entries. The
//! presentation layer plugs in through [`driver::DisplaySink`] and
//! [`driver::NotificationPlayer`].

pub mod clock;
pub mod config;
pub mod dates;
pub mod driver;
pub mod entries;
pub mod error;
pub mod project_store;
pub mod scheduler;
pub mod service;
pub mod sort;
pub mod summary;
pub mod time_format;
pub mod timer;

pub use clock::{Clock, ManualClock, SystemClock};
pub use config::{Config, ConfigManager, NotificationSettings, NotificationSound, PreferencesProvider};
pub use dates::EntryDateFilter;
pub use driver::{DisplaySink, DriverContext, NotificationPlayer, TimerDisplayDriver};
pub use entries::{DecoratedEntry, Project, Tag, TimeEntry};
pub use error::{ConfigError, ServiceError, TimeInputError};
pub use scheduler::{CancelToken, ManualScheduler, Scheduler, TokioScheduler};
pub use service::{EntryForm, NokoService};
pub use summary::{EntriesSummary, EntrySummary, WeekSummary};
pub use timer::{compute_elapsed, Timer, TimerSnapshot, TimerState};

/// Installs the global logger, `info` unless `RUST_LOG` says otherwise. Safe to call twice.
pub fn init_logging() {
    let _ = env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .format_timestamp_millis()
        .try_init();
    log::debug!("Logging initialised");
}

#[cfg(test)]
mod tests {
    use super::init_logging;

    #[test]
    fn init_logging_is_idempotent() {
        init_logging();
        init_logging();
    }
}
