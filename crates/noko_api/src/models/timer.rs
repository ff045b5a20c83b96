//! Timer payloads returned by `/timers` and `/projects/:id/timer*` endpoints.

use serde::{Deserialize, Serialize};

use super::ids::deserialize_id;
use super::{ApiProject, ApiUser};

/// Timer state as reported by the API. Values this client does not know about land in `Unknown`.
#[derive(Debug, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ApiTimerState {
    Running,
    Paused,
    Pending,
    Stopped,
    #[serde(other)]
    Unknown,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ApiTimer {
    #[serde(deserialize_with = "deserialize_id")]
    pub id: String,
    pub state: ApiTimerState,
    pub date: Option<String>,
    #[serde(default)]
    pub seconds: i64,
    pub formatted_time: Option<String>,
    pub description: Option<String>,
    pub user: Option<ApiUser>,
    pub project: Option<ApiProject>,
    pub url: Option<String>,
}

/// Body of `PUT /projects/:id/timer/log`.
#[derive(Debug, Serialize, Clone)]
pub struct LogTimerRequest {
    pub minutes: u32,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub description: String,
    pub entry_date: String,
}

#[cfg(test)]
mod tests {
    use super::{ApiTimer, ApiTimerState, LogTimerRequest};

    #[test]
    fn decodes_running_timer_with_project() {
        let body = r#"{
            "id": 13,
            "state": "running",
            "date": "2024-01-10",
            "seconds": 125,
            "formatted_time": "0:02:05",
            "project": {"id": 5, "name": "Website"}
        }"#;
        let timer: ApiTimer = serde_json::from_str(body).unwrap();
        assert_eq!(timer.id, "13");
        assert_eq!(timer.state, ApiTimerState::Running);
        assert_eq!(timer.seconds, 125);
        assert_eq!(timer.project.map(|p| p.id).as_deref(), Some("5"));
    }

    #[test]
    fn unknown_state_is_tolerated() {
        let timer: ApiTimer =
            serde_json::from_str(r#"{"id": "x", "state": "archived", "seconds": 0}"#).unwrap();
        assert_eq!(timer.state, ApiTimerState::Unknown);
    }

    #[test]
    fn log_request_skips_empty_description() {
        let payload = LogTimerRequest {
            minutes: 30,
            description: String::new(),
            entry_date: "2024-01-10".to_string(),
        };
        let json = serde_json::to_value(&payload).unwrap();
        assert!(json.get("description").is_none());
        assert_eq!(json["minutes"], 30);
    }
}
