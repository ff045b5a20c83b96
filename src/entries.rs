//! Domain shapes handed to the presentation layer, plus the small text helpers
//! used when rendering entries and building descriptions.

use chrono::{DateTime, NaiveDate, Utc};
use noko_api::{ApiEntry, ApiProject, ApiTag, ApiTimer, ApiUser};
use serde::Serialize;

use crate::time_format::format_hours_minutes;
use crate::timer::Timer;

/// Represents a Noko tag; `formatted_name` is the hashtag form shown in lists.
#[derive(Serialize, Debug, Clone, PartialEq, Eq)]
pub struct Tag {
    pub id: String,
    pub name: String,
    pub formatted_name: String,
}

#[derive(Serialize, Debug, Clone, PartialEq, Eq)]
pub struct User {
    pub id: String,
    pub email: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub profile_image_url: Option<String>,
}

#[derive(Serialize, Debug, Clone, PartialEq, Eq)]
pub struct Approval {
    pub approved_by: Option<User>,
    pub approved_at: Option<String>,
}

#[derive(Serialize, Debug, Clone, PartialEq, Eq)]
pub struct ProjectRef {
    pub id: String,
    pub name: String,
}

/// Represents a logged unit of work.
#[derive(Serialize, Debug, Clone, PartialEq, Eq)]
pub struct TimeEntry {
    pub id: String,
    pub date: NaiveDate,
    pub billable: bool,
    pub minutes: u32,
    pub description: String,
    pub tags: Vec<Tag>,
    pub project: Option<ProjectRef>,
    pub user: Option<User>,
    pub approval: Option<Approval>,
}

/// Represents a project together with its current timer.
#[derive(Serialize, Debug, Clone, PartialEq, Eq)]
pub struct Project {
    pub id: String,
    pub name: String,
    pub color: Option<String>,
    pub enabled: bool,
    pub billing_increment: Option<u32>,
    pub timer: Timer,
}

impl Project {
    /// Joins an API project with its timer, if one is running or paused.
    pub fn from_api(project: ApiProject, timer: Option<&ApiTimer>, fetched_at: DateTime<Utc>) -> Self {
        let timer = timer
            .map(|timer| Timer::from_api(timer, fetched_at))
            .unwrap_or_default();
        Self {
            id: project.id,
            name: project.name,
            color: project.color,
            enabled: project.enabled,
            billing_increment: project.billing_increment,
            timer,
        }
    }
}

/// Entry with its `HH:MM` duration precomputed for display.
///
/// The formatted value is private so it can only change together with `minutes`.
#[derive(Serialize, Debug, Clone, PartialEq, Eq)]
pub struct DecoratedEntry {
    #[serde(flatten)]
    entry: TimeEntry,
    formatted_minutes: String,
}

impl DecoratedEntry {
    pub fn new(entry: TimeEntry) -> Self {
        let formatted_minutes = format_hours_minutes(u64::from(entry.minutes));
        Self {
            entry,
            formatted_minutes,
        }
    }

    pub fn entry(&self) -> &TimeEntry {
        &self.entry
    }

    pub fn into_entry(self) -> TimeEntry {
        self.entry
    }

    pub fn formatted_minutes(&self) -> &str {
        &self.formatted_minutes
    }

    pub fn set_minutes(&mut self, minutes: u32) {
        self.entry.minutes = minutes;
        self.formatted_minutes = format_hours_minutes(u64::from(minutes));
    }
}

pub fn decorate_entries(entries: Vec<TimeEntry>) -> Vec<DecoratedEntry> {
    entries.into_iter().map(DecoratedEntry::new).collect()
}

/// `First Last <email>`, or an empty string when any part is missing.
pub fn user_name(user: Option<&User>) -> String {
    let Some(user) = user else {
        return String::new();
    };
    let present = |value: &Option<String>| value.as_deref().filter(|v| !v.is_empty()).map(str::to_owned);
    match (present(&user.first_name), present(&user.last_name), present(&user.email)) {
        (Some(first), Some(last), Some(email)) => format!("{} {} <{}>", first, last, email),
        _ => String::new(),
    }
}

pub fn format_tags(tags: &[Tag]) -> String {
    tags.iter()
        .map(|tag| tag.formatted_name.as_str())
        .collect::<Vec<_>>()
        .join(", ")
}

/// Appends hashtags to a description the way Noko expects them inline.
pub fn combine_description_and_tags(description: &str, tags: &[String]) -> String {
    format!("{} {}", description, tags.join(" ")).trim().to_string()
}

impl From<ApiTag> for Tag {
    fn from(tag: ApiTag) -> Self {
        let formatted_name = tag.formatted_name.unwrap_or_else(|| tag.name.clone());
        Self {
            id: tag.id,
            name: tag.name,
            formatted_name,
        }
    }
}

impl From<ApiUser> for User {
    fn from(user: ApiUser) -> Self {
        Self {
            id: user.id,
            email: user.email,
            first_name: user.first_name,
            last_name: user.last_name,
            profile_image_url: user.profile_image_url,
        }
    }
}

impl From<ApiProject> for ProjectRef {
    fn from(project: ApiProject) -> Self {
        Self {
            id: project.id,
            name: project.name,
        }
    }
}

impl From<ApiEntry> for TimeEntry {
    fn from(entry: ApiEntry) -> Self {
        let approval = if entry.approved_by.is_some() || entry.approved_at.is_some() {
            Some(Approval {
                approved_by: entry.approved_by.map(User::from),
                approved_at: entry.approved_at,
            })
        } else {
            None
        };
        Self {
            id: entry.id,
            date: entry.date,
            billable: entry.billable,
            minutes: entry.minutes.clamp(0, i64::from(u32::MAX)) as u32,
            description: entry.description.unwrap_or_default(),
            tags: entry.tags.into_iter().map(Tag::from).collect(),
            project: entry.project.map(ProjectRef::from),
            user: entry.user.map(User::from),
            approval,
        }
    }
}
