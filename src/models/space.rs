use crate::error::{Result, UploaderError};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

const MAX_SPACE_ID_LEN: usize = 43;

/// Identifier of a data-modeling space. Case-sensitive and immutable once the
/// space exists.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ContainerId(String);

impl ContainerId {
    /// Validates the identifier before it is sent anywhere.
    pub fn parse(raw: &str) -> Result<Self> {
        let mut chars = raw.chars();
        let starts_with_letter = chars.next().is_some_and(|c| c.is_ascii_alphabetic());
        let valid_tail = chars.all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-');

        if raw.is_empty() || raw.len() > MAX_SPACE_ID_LEN || !starts_with_letter || !valid_tail {
            return Err(UploaderError::Config(format!(
                "Invalid space identifier '{}': expected 1-{} characters, starting with a letter, \
                 using only letters, digits, '_' or '-'",
                raw, MAX_SPACE_ID_LEN
            )));
        }
        Ok(Self(raw.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ContainerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for ContainerId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Space {
    pub space: ContainerId,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub is_global: bool,
    #[serde(default, with = "chrono::serde::ts_milliseconds_option")]
    pub created_time: Option<DateTime<Utc>>,
    #[serde(default, with = "chrono::serde::ts_milliseconds_option")]
    pub last_updated_time: Option<DateTime<Utc>>,
}

/// Creation payload for a space.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SpaceApply {
    pub space: ContainerId,
    pub name: String,
    pub description: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_ids() {
        for id in ["demo_space", "proj_space", "a", "Space-01"] {
            assert_eq!(ContainerId::parse(id).unwrap().as_str(), id);
        }
    }

    #[test]
    fn test_invalid_ids() {
        let too_long = "a".repeat(44);
        for id in ["", "1space", "_space", "my space", "space.dots", too_long.as_str()] {
            assert!(ContainerId::parse(id).is_err(), "{:?} should be rejected", id);
        }
    }

    #[test]
    fn test_space_from_api() {
        let space: Space = serde_json::from_str(
            r#"{"space":"demo_space","name":"Demo Space","isGlobal":false,
                "createdTime":1717000000000,"lastUpdatedTime":1717000000000}"#,
        )
        .unwrap();
        assert_eq!(space.space.as_str(), "demo_space");
        assert_eq!(space.name.as_deref(), Some("Demo Space"));
        assert!(space.description.is_none());
        assert_eq!(
            space.created_time.map(|t| t.timestamp_millis()),
            Some(1717000000000)
        );
    }
}
