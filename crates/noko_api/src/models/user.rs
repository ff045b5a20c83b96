use serde::Deserialize;

use super::ids::deserialize_id;

#[derive(Debug, Deserialize, Clone)]
pub struct ApiUser {
    #[serde(deserialize_with = "deserialize_id")]
    pub id: String,
    pub email: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub profile_image_url: Option<String>,
}
