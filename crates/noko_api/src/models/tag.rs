use serde::Deserialize;

use super::ids::deserialize_id;

#[derive(Debug, Deserialize, Clone)]
pub struct ApiTag {
    #[serde(deserialize_with = "deserialize_id")]
    pub id: String,
    pub name: String,
    pub formatted_name: Option<String>,
}
