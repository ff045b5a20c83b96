//! User-facing actions against the Noko API.
//!
//! Each action maps API failures to a [`ServiceError`] carrying the headline the
//! presentation layer shows, and keeps the [`ProjectStore`] in step with timer changes.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use log::{info, warn};
use noko_api::{CreateEntryRequest, LogTimerRequest, NokoClient, NokoError};

use crate::clock::{Clock, SystemClock};
use crate::config::{Config, PreferencesProvider};
use crate::dates::{date_on_timezone, filter_date, week_range, EntryDateFilter};
use crate::entries::{combine_description_and_tags, decorate_entries, DecoratedEntry, Project, Tag, TimeEntry};
use crate::error::{ConfigError, ServiceError};
use crate::project_store::ProjectStore;
use crate::sort::sort_projects;
use crate::summary::{entries_summary, week_summary, EntriesSummary, WeekSummary};
use crate::time_format::parse_user_time_input;
use crate::timer::Timer;

pub const FAILED_TO_START_TIMER: &str = "Failed to Start Timer";
pub const FAILED_TO_PAUSE_TIMER: &str = "Failed to Pause Timer";
pub const FAILED_TO_DISCARD_TIMER: &str = "Failed to Discard Timer";
pub const FAILED_TO_LOG_TIMER: &str = "Failed to Log Timer";
pub const FAILED_TO_RESET_TIMER: &str = "Failed to Reset Timer";
pub const FAILED_TO_ADD_ENTRY: &str = "Failed to Add Entry";
pub const FAILED_TO_DELETE_ENTRY: &str = "Failed to Delete Entry";
pub const ERROR_LOADING_ENTRIES: &str = "Error Loading Entries";
pub const ERROR_LOADING_DATA: &str = "Something went wrong";

/// Values submitted from the log-timer and add-entry forms.
#[derive(Debug, Clone)]
pub struct EntryForm {
    /// Raw time text, `h:mm` or minutes.
    pub minutes: String,
    pub project_name: String,
    pub description: String,
    pub tags: Vec<String>,
    pub date: DateTime<Utc>,
}

fn failure(title: &'static str) -> impl FnOnce(NokoError) -> ServiceError {
    move |err| {
        warn!("{}: {}", title, err);
        ServiceError::api(title)(err)
    }
}

pub struct NokoService {
    client: NokoClient,
    clock: Arc<dyn Clock>,
    preferences: Arc<dyn PreferencesProvider>,
    store: ProjectStore,
}

impl NokoService {
    pub fn new(
        client: NokoClient,
        clock: Arc<dyn Clock>,
        preferences: Arc<dyn PreferencesProvider>,
    ) -> Self {
        Self {
            client,
            clock,
            preferences,
            store: ProjectStore::default(),
        }
    }

    /// Builds a service on the system clock from stored preferences.
    pub fn from_config(config: Config) -> Result<Self, ConfigError> {
        let client = NokoClient::new(config.client_config()?)?;
        Ok(Self::new(client, Arc::new(SystemClock), Arc::new(config)))
    }

    pub fn store(&self) -> &ProjectStore {
        &self.store
    }

    pub fn clock(&self) -> Arc<dyn Clock> {
        self.clock.clone()
    }

    pub fn preferences(&self) -> Arc<dyn PreferencesProvider> {
        self.preferences.clone()
    }

    fn timezone(&self) -> Option<String> {
        self.preferences.timezone()
    }

    /// Fetches enabled projects and all timers, joins them and caches the sorted list.
    pub async fn refresh_projects(&self) -> Result<Vec<Project>, ServiceError> {
        let projects = self
            .client
            .list_projects()
            .await
            .map_err(failure(ERROR_LOADING_DATA))?;
        let timers = self
            .client
            .list_timers()
            .await
            .map_err(failure(ERROR_LOADING_DATA))?;
        let fetched_at = self.clock.now();

        let mut joined: Vec<Project> = projects
            .into_iter()
            .map(|project| {
                let timer = timers.iter().find(|timer| {
                    timer
                        .project
                        .as_ref()
                        .is_some_and(|owner| owner.id == project.id)
                });
                Project::from_api(project, timer, fetched_at)
            })
            .collect();
        sort_projects(&mut joined);

        info!(
            "Loaded {} projects, {} with timers",
            joined.len(),
            joined.iter().filter(|project| project.timer != Timer::None).count()
        );
        self.store.set(joined.clone());
        Ok(joined)
    }

    pub async fn fetch_timer(&self, project_id: &str) -> Result<Timer, ServiceError> {
        let timer = self
            .client
            .get_project_timer(project_id)
            .await
            .map_err(failure(ERROR_LOADING_DATA))?;
        let timer = timer
            .map(|timer| Timer::from_api(&timer, self.clock.now()))
            .unwrap_or_default();
        self.store.update_timer(project_id, timer.clone());
        Ok(timer)
    }

    pub async fn start_timer(&self, project_id: &str) -> Result<Timer, ServiceError> {
        let timer = self
            .client
            .start_timer(project_id)
            .await
            .map_err(failure(FAILED_TO_START_TIMER))?;
        info!("Started timer for project {}", project_id);
        Ok(self.remember_timer(project_id, Timer::from_api(&timer, self.clock.now())))
    }

    pub async fn pause_timer(&self, project_id: &str) -> Result<Timer, ServiceError> {
        let timer = self
            .client
            .pause_timer(project_id)
            .await
            .map_err(failure(FAILED_TO_PAUSE_TIMER))?;
        info!("Paused timer for project {}", project_id);
        Ok(self.remember_timer(project_id, Timer::from_api(&timer, self.clock.now())))
    }

    /// Drops the timer without saving its time.
    pub async fn discard_timer(&self, project_id: &str) -> Result<(), ServiceError> {
        self.client
            .discard_timer(project_id)
            .await
            .map_err(failure(FAILED_TO_DISCARD_TIMER))?;
        info!("Discarded timer for project {}", project_id);
        self.remember_timer(project_id, Timer::None);
        Ok(())
    }

    /// Discards the timer and starts a fresh one. Either step failing reports a reset failure.
    pub async fn reset_timer(&self, project_id: &str) -> Result<Timer, ServiceError> {
        self.client
            .discard_timer(project_id)
            .await
            .map_err(failure(FAILED_TO_RESET_TIMER))?;
        self.remember_timer(project_id, Timer::None);
        let timer = self
            .client
            .start_timer(project_id)
            .await
            .map_err(failure(FAILED_TO_RESET_TIMER))?;
        info!("Reset timer for project {}", project_id);
        Ok(self.remember_timer(project_id, Timer::from_api(&timer, self.clock.now())))
    }

    /// Logs the timer as an entry. The form's time replaces whatever the timer counted.
    pub async fn log_timer(&self, project_id: &str, form: &EntryForm) -> Result<(), ServiceError> {
        let minutes = parse_user_time_input(&form.minutes)?;
        let payload = LogTimerRequest {
            minutes,
            description: combine_description_and_tags(&form.description, &form.tags),
            entry_date: date_on_timezone(form.date, self.timezone().as_deref()),
        };
        self.client
            .log_timer(project_id, &payload)
            .await
            .map_err(failure(FAILED_TO_LOG_TIMER))?;
        info!("Logged {} min for project {}", minutes, project_id);
        self.remember_timer(project_id, Timer::None);
        Ok(())
    }

    pub async fn create_entry(&self, form: &EntryForm) -> Result<TimeEntry, ServiceError> {
        let minutes = parse_user_time_input(&form.minutes)?;
        let payload = CreateEntryRequest {
            minutes,
            project_name: form.project_name.clone(),
            description: combine_description_and_tags(&form.description, &form.tags),
            date: date_on_timezone(form.date, self.timezone().as_deref()),
        };
        let entry = self
            .client
            .create_entry(&payload)
            .await
            .map_err(failure(FAILED_TO_ADD_ENTRY))?;
        info!("Added {} min entry to {}", minutes, form.project_name);
        Ok(TimeEntry::from(entry))
    }

    pub async fn delete_entry(&self, entry_id: &str) -> Result<(), ServiceError> {
        self.client
            .delete_entry(entry_id)
            .await
            .map_err(failure(FAILED_TO_DELETE_ENTRY))?;
        info!("Deleted entry {}", entry_id);
        Ok(())
    }

    pub async fn day_entries(&self, filter: EntryDateFilter) -> Result<Vec<DecoratedEntry>, ServiceError> {
        let day = filter_date(filter, self.clock.now(), self.timezone().as_deref());
        self.entries_between(&day, &day).await
    }

    /// Entries from Sunday of the current week through today.
    pub async fn week_entries(&self) -> Result<Vec<DecoratedEntry>, ServiceError> {
        let (from, to) = week_range(self.clock.now(), self.timezone().as_deref());
        self.entries_between(&from, &to).await
    }

    pub async fn day_summary(&self, filter: EntryDateFilter) -> Result<EntriesSummary, ServiceError> {
        let entries = self.day_entries(filter).await?;
        Ok(entries_summary(entries.iter().map(DecoratedEntry::entry)))
    }

    pub async fn week_summary(&self) -> Result<WeekSummary, ServiceError> {
        let entries = self.week_entries().await?;
        Ok(week_summary(entries.iter().map(DecoratedEntry::entry)))
    }

    pub async fn tags(&self) -> Result<Vec<Tag>, ServiceError> {
        let tags = self
            .client
            .list_tags()
            .await
            .map_err(failure(ERROR_LOADING_DATA))?;
        Ok(tags.into_iter().map(Tag::from).collect())
    }

    async fn entries_between(&self, from: &str, to: &str) -> Result<Vec<DecoratedEntry>, ServiceError> {
        let entries = self
            .client
            .current_user_entries(from, to)
            .await
            .map_err(failure(ERROR_LOADING_ENTRIES))?;
        Ok(decorate_entries(entries.into_iter().map(TimeEntry::from).collect()))
    }

    fn remember_timer(&self, project_id: &str, timer: Timer) -> Timer {
        self.store.update_timer(project_id, timer.clone());
        timer
    }
}
