//! Project payloads, both standalone and embedded in timers and entries.

use serde::Deserialize;

use super::ids::deserialize_id;

fn default_enabled() -> bool {
    true
}

/// Represents a Noko project. Embedded copies inside timers and entries may omit everything but id and name.
#[derive(Debug, Deserialize, Clone)]
pub struct ApiProject {
    #[serde(deserialize_with = "deserialize_id")]
    pub id: String,
    #[serde(default)]
    pub name: String,
    pub color: Option<String>,
    #[serde(default = "default_enabled")]
    pub enabled: bool,
    pub billing_increment: Option<u32>,
}

#[cfg(test)]
mod tests {
    use super::ApiProject;

    #[test]
    fn embedded_project_defaults_to_enabled() {
        let project: ApiProject = serde_json::from_str(r#"{"id": 7, "name": "Website"}"#).unwrap();
        assert_eq!(project.id, "7");
        assert!(project.enabled);
        assert!(project.billing_increment.is_none());
    }
}
