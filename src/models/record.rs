use super::{ContainerId, UploadedFile};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Reference to the data-model view whose properties a record populates.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename = "view", rename_all = "camelCase")]
pub struct ViewId {
    pub space: String,
    pub external_id: String,
    pub version: String,
}

impl ViewId {
    pub fn new(space: &str, external_id: &str, version: &str) -> Self {
        Self {
            space: space.to_string(),
            external_id: external_id.to_string(),
            version: version.to_string(),
        }
    }

    /// The core data model's file view.
    pub fn cognite_file() -> Self {
        Self::new("cdf_cdm", "CogniteFile", "v1")
    }
}

impl Default for ViewId {
    fn default() -> Self {
        Self::cognite_file()
    }
}

/// Operator overrides for the record created alongside an upload.
#[derive(Debug, Clone, Default)]
pub struct RecordOptions {
    /// Node external id; the file's external id when absent.
    pub external_id: Option<String>,
    pub name: Option<String>,
    pub source: Option<String>,
    /// Applied after the derived properties, so they win on conflicts.
    pub properties: Map<String, Value>,
    pub view: ViewId,
}

/// A data-model node describing one uploaded file.
#[derive(Debug, Clone, PartialEq)]
pub struct FileRecord {
    pub space: ContainerId,
    pub external_id: String,
    pub view: ViewId,
    pub properties: Map<String, Value>,
}

impl FileRecord {
    pub fn from_upload(space: ContainerId, file: &UploadedFile, options: &RecordOptions) -> Self {
        let non_empty = |v: &Option<String>| v.clone().filter(|s| !s.is_empty());

        let mut properties = Map::new();
        properties.insert(
            "name".to_string(),
            Value::from(non_empty(&options.name).unwrap_or_else(|| file.name.clone())),
        );
        properties.insert(
            "fileExternalId".to_string(),
            Value::from(file.external_id.clone()),
        );
        if let Some(mime_type) = non_empty(&file.mime_type) {
            properties.insert("mimeType".to_string(), Value::from(mime_type));
        }
        let metadata: Map<String, Value> = file
            .metadata
            .iter()
            .map(|(k, v)| (k.clone(), Value::from(v.clone())))
            .collect();
        properties.insert("metadata".to_string(), Value::Object(metadata));
        if let Some(directory) = non_empty(&file.directory) {
            properties.insert("directory".to_string(), Value::from(directory));
        }
        if let Some(source) = non_empty(&options.source).or_else(|| non_empty(&file.source)) {
            properties.insert("source".to_string(), Value::from(source));
        }

        for (key, value) in &options.properties {
            properties.insert(key.clone(), value.clone());
        }

        Self {
            space,
            external_id: non_empty(&options.external_id)
                .unwrap_or_else(|| file.external_id.clone()),
            view: options.view.clone(),
            properties,
        }
    }
}

/// Per-node result of an instances apply call.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NodeResult {
    pub space: String,
    pub external_id: String,
    #[serde(default)]
    pub version: i64,
    #[serde(default)]
    pub was_modified: bool,
    #[serde(default, with = "chrono::serde::ts_milliseconds_option")]
    pub created_time: Option<DateTime<Utc>>,
    #[serde(default, with = "chrono::serde::ts_milliseconds_option")]
    pub last_updated_time: Option<DateTime<Utc>>,
}
