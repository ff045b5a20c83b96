//! Persistent preferences model and file-backed manager.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use noko_api::NokoConfig;

use crate::error::ConfigError;

pub const DEFAULT_NOTIFICATION_SOUND: &str = "Glass";
pub const DEFAULT_NOTIFICATION_VOLUME: f64 = 1.0;
pub const DEFAULT_NOTIFICATION_INTERVAL_MINUTES: u64 = 15;

/// Sound name that turns interval notifications off.
pub const SILENT_SOUND: &str = "none";

fn default_notification_sound() -> String {
    DEFAULT_NOTIFICATION_SOUND.to_string()
}

fn default_notification_volume() -> PreferenceValue {
    PreferenceValue::Number(DEFAULT_NOTIFICATION_VOLUME)
}

fn default_notification_interval() -> PreferenceValue {
    PreferenceValue::Number(DEFAULT_NOTIFICATION_INTERVAL_MINUTES as f64)
}

/// Preference stored either as a JSON number or as the text a settings form produced.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(untagged)]
pub enum PreferenceValue {
    Number(f64),
    Text(String),
}

impl PreferenceValue {
    pub fn as_f64(&self) -> Option<f64> {
        let value = match self {
            PreferenceValue::Number(value) => *value,
            PreferenceValue::Text(text) => text.trim().parse().ok()?,
        };
        value.is_finite().then_some(value)
    }
}

/// Represents the preferences persisted on disk: API token, display timezone and timer notification options.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(default)]
pub struct Config {
    pub personal_access_token: Option<String>,
    pub timezone: Option<String>,
    #[serde(default = "default_notification_sound")]
    pub notification_sound: String,
    #[serde(default = "default_notification_volume")]
    pub notification_volume: PreferenceValue,
    #[serde(default = "default_notification_interval")]
    pub notification_interval_minutes: PreferenceValue,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            personal_access_token: None,
            timezone: None,
            notification_sound: default_notification_sound(),
            notification_volume: default_notification_volume(),
            notification_interval_minutes: default_notification_interval(),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum NotificationSound {
    Silent,
    Named(String),
}

impl NotificationSound {
    fn from_preference(name: &str) -> Self {
        let name = name.trim();
        if name.is_empty() || name.eq_ignore_ascii_case(SILENT_SOUND) {
            NotificationSound::Silent
        } else {
            NotificationSound::Named(name.to_string())
        }
    }
}

/// Notification options after validation; every field is usable as-is.
#[derive(Clone, Debug, PartialEq)]
pub struct NotificationSettings {
    pub sound: NotificationSound,
    pub volume: f64,
    pub interval_minutes: u64,
}

impl Default for NotificationSettings {
    fn default() -> Self {
        Self {
            sound: NotificationSound::Named(DEFAULT_NOTIFICATION_SOUND.to_string()),
            volume: DEFAULT_NOTIFICATION_VOLUME,
            interval_minutes: DEFAULT_NOTIFICATION_INTERVAL_MINUTES,
        }
    }
}

impl Config {
    /// Normalises the raw notification preferences. Malformed values fall back to defaults.
    pub fn notification_settings(&self) -> NotificationSettings {
        let interval_minutes = self
            .notification_interval_minutes
            .as_f64()
            .filter(|value| *value >= 1.0)
            .map(|value| value.trunc() as u64)
            .unwrap_or(DEFAULT_NOTIFICATION_INTERVAL_MINUTES);
        let volume = self
            .notification_volume
            .as_f64()
            .map(|value| value.clamp(0.0, 1.0))
            .unwrap_or(DEFAULT_NOTIFICATION_VOLUME);

        NotificationSettings {
            sound: NotificationSound::from_preference(&self.notification_sound),
            volume,
            interval_minutes,
        }
    }

    /// Timezone with blank values treated as unset.
    pub fn timezone(&self) -> Option<&str> {
        self.timezone
            .as_deref()
            .map(str::trim)
            .filter(|zone| !zone.is_empty())
    }

    /// Builds the API client configuration from the stored token.
    pub fn client_config(&self) -> Result<NokoConfig, ConfigError> {
        let token = self
            .personal_access_token
            .as_deref()
            .map(str::trim)
            .filter(|token| !token.is_empty())
            .ok_or(ConfigError::MissingToken)?;
        Ok(NokoConfig::new(token))
    }
}

/// Source of the preferences consulted while the app is running.
pub trait PreferencesProvider: Send + Sync {
    fn timezone(&self) -> Option<String>;
    fn notification_settings(&self) -> NotificationSettings;
}

impl PreferencesProvider for Config {
    fn timezone(&self) -> Option<String> {
        Config::timezone(self).map(ToOwned::to_owned)
    }

    fn notification_settings(&self) -> NotificationSettings {
        Config::notification_settings(self)
    }
}

/// Manages loading and saving of preferences to a JSON file in the platform-specific config directory.
pub struct ConfigManager {
    path: PathBuf,
}

impl ConfigManager {
    /// Creates a manager bound to the platform-specific app config path.
    pub fn new() -> Result<Self, ConfigError> {
        let dirs = directories::ProjectDirs::from("com", "noko", "noko-timer")
            .ok_or(ConfigError::NoConfigDir)?;
        Ok(Self::with_path(dirs.config_dir().join("config.json")))
    }

    pub fn with_path(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Loads config from disk, falling back to defaults on read/parse errors.
    pub fn load(&self) -> Config {
        if !self.path.exists() {
            return Config::default();
        }
        let content = fs::read_to_string(&self.path).unwrap_or_default();
        serde_json::from_str(&content).unwrap_or_else(|err| {
            log::warn!("Ignoring unreadable config {}: {}", self.path.display(), err);
            Config::default()
        })
    }

    /// Persists config to disk, creating parent directories when needed.
    pub fn save(&self, config: &Config) -> Result<(), ConfigError> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        let content = serde_json::to_string_pretty(config)?;
        fs::write(&self.path, content)?;
        Ok(())
    }
}

// Re-reads the file on every call so edits apply to a running timer.
impl PreferencesProvider for ConfigManager {
    fn timezone(&self) -> Option<String> {
        PreferencesProvider::timezone(&self.load())
    }

    fn notification_settings(&self) -> NotificationSettings {
        self.load().notification_settings()
    }
}
