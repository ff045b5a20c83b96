//! Entry payloads returned by `/current_user/entries` and accepted by `POST /entries`.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::ids::deserialize_id;
use super::{ApiProject, ApiTag, ApiUser};

#[derive(Debug, Deserialize, Clone)]
pub struct ApiEntry {
    #[serde(deserialize_with = "deserialize_id")]
    pub id: String,
    pub date: NaiveDate,
    #[serde(default)]
    pub billable: bool,
    #[serde(default)]
    pub minutes: i64,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub tags: Vec<ApiTag>,
    pub project: Option<ApiProject>,
    pub user: Option<ApiUser>,
    pub approved_by: Option<ApiUser>,
    pub approved_at: Option<String>,
}

/// Body of `POST /entries`. The project is referenced by name.
#[derive(Debug, Serialize, Clone)]
pub struct CreateEntryRequest {
    pub minutes: u32,
    pub project_name: String,
    pub description: String,
    pub date: String,
}

#[cfg(test)]
mod tests {
    use super::ApiEntry;
    use chrono::NaiveDate;

    #[test]
    fn decodes_entry_with_tags_and_approval() {
        let body = r##"{
            "id": 99,
            "date": "2024-01-07",
            "billable": true,
            "minutes": 480,
            "description": "Sunday work #ops",
            "tags": [{"id": 1, "name": "ops", "formatted_name": "#ops"}],
            "project": {"id": 5, "name": "Website"},
            "user": {"id": 3, "email": "ada@example.com", "first_name": "Ada", "last_name": "Lovelace"},
            "approved_by": null,
            "approved_at": null
        }"##;
        let entry: ApiEntry = serde_json::from_str(body).unwrap();
        assert_eq!(entry.id, "99");
        assert_eq!(entry.date, NaiveDate::from_ymd_opt(2024, 1, 7).unwrap());
        assert_eq!(entry.minutes, 480);
        assert_eq!(entry.tags[0].formatted_name.as_deref(), Some("#ops"));
        assert!(entry.approved_by.is_none());
    }

    #[test]
    fn missing_optional_fields_use_defaults() {
        let entry: ApiEntry = serde_json::from_str(r#"{"id": "1", "date": "2024-01-08"}"#).unwrap();
        assert!(!entry.billable);
        assert_eq!(entry.minutes, 0);
        assert!(entry.tags.is_empty());
        assert!(entry.project.is_none());
    }
}
