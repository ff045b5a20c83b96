//! Noko ids arrive as JSON numbers on most endpoints and as strings on a few; both are kept as strings.

use serde::de::{Deserializer, Error as DeError};
use serde::Deserialize;
use serde_json::Value;

pub(crate) fn deserialize_id<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    coerce_id(value).ok_or_else(|| D::Error::custom("expected a string or numeric id"))
}

fn coerce_id(value: Value) -> Option<String> {
    match value {
        Value::String(text) => {
            let trimmed = text.trim();
            if trimmed.is_empty() {
                None
            } else {
                Some(trimmed.to_string())
            }
        }
        Value::Number(number) => Some(number.to_string()),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::deserialize_id;
    use serde::Deserialize;

    #[derive(Deserialize)]
    struct Required {
        #[serde(deserialize_with = "deserialize_id")]
        id: String,
    }

    #[test]
    fn numeric_and_string_ids_become_strings() {
        let numeric: Required = serde_json::from_str(r#"{"id": 42}"#).unwrap();
        let text: Required = serde_json::from_str(r#"{"id": " 42 "}"#).unwrap();
        assert_eq!(numeric.id, "42");
        assert_eq!(text.id, "42");
    }

    #[test]
    fn required_id_rejects_null() {
        assert!(serde_json::from_str::<Required>(r#"{"id": null}"#).is_err());
    }
}
