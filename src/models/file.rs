use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::PathBuf;
use validator::Validate;

/// Everything the operator asked for about one file, before it is read.
#[derive(Debug, Clone, Default, Validate)]
pub struct UploadRequest {
    pub local_path: PathBuf,

    #[validate(length(min = 1, max = 255, message = "External id must be 1-255 characters"))]
    pub external_id: String,

    /// Display name; the local file name when absent.
    #[validate(length(min = 1, max = 256))]
    pub name: Option<String>,

    #[validate(length(max = 128))]
    pub source: Option<String>,

    /// Explicit MIME type; guessed when absent or unparseable.
    pub mime_type: Option<String>,

    pub metadata: BTreeMap<String, String>,

    #[validate(range(min = 1, message = "Data set id must be a positive integer"))]
    pub data_set_id: Option<i64>,

    #[validate(length(min = 1, max = 512))]
    pub directory: Option<String>,

    pub overwrite: bool,
}

/// A fully resolved upload: names and MIME type decided, content in memory.
pub struct FileUpload {
    pub external_id: String,
    pub name: String,
    pub source: Option<String>,
    pub mime_type: String,
    pub metadata: BTreeMap<String, String>,
    pub data_set_id: Option<i64>,
    pub directory: Option<String>,
    pub overwrite: bool,
    pub content: Vec<u8>,
}

/// File metadata as reported by the platform after an upload.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UploadedFile {
    pub id: i64,
    pub external_id: String,
    pub name: String,
    #[serde(default)]
    pub source: Option<String>,
    #[serde(default)]
    pub mime_type: Option<String>,
    #[serde(default)]
    pub metadata: BTreeMap<String, String>,
    #[serde(default)]
    pub directory: Option<String>,
    #[serde(default)]
    pub data_set_id: Option<i64>,
    #[serde(default)]
    pub uploaded: bool,
    #[serde(default, with = "chrono::serde::ts_milliseconds_option")]
    pub uploaded_time: Option<DateTime<Utc>>,
    #[serde(default, with = "chrono::serde::ts_milliseconds_option")]
    pub created_time: Option<DateTime<Utc>>,
    #[serde(default, with = "chrono::serde::ts_milliseconds_option")]
    pub last_updated_time: Option<DateTime<Utc>>,
}
