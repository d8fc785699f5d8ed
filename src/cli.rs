use crate::error::{Result, UploaderError};
use crate::models::{ContainerId, RecordOptions, UploadRequest, ViewId};
use crate::services::resolver::{DEFAULT_FALLBACK_SPACE, TargetErrorPolicy};
use clap::Parser;
use clap::error::ErrorKind;
use serde_json::{Map, Value};
use std::collections::BTreeMap;
use std::ffi::OsString;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

/// Process exit status for every failure, including unusable arguments.
pub const FAILURE_EXIT_CODE: i32 = 1;

const PLACEHOLDER_CONTENT: &str =
    "This is a placeholder file created by cdf-file-uploader for testing.\n";

/// Upload a local file to CDF and register it as a CogniteFile node.
///
/// Connection settings come from COGNITE_PROJECT, COGNITE_CLIENT_ID,
/// COGNITE_CLIENT_SECRET, COGNITE_TENANT_ID and COGNITE_BASE_URL.
#[derive(Parser, Debug, Clone)]
#[command(name = "cdf-file-uploader", version, about)]
pub struct Opts {
    /// Local file to upload
    #[arg(long, env = "UPLOAD_FILE_PATH", default_value = "sample.txt")]
    pub file: PathBuf,

    /// Data modeling space to register the file record in
    #[arg(long, env = "TARGET_SPACE", default_value = "my_data_model_space")]
    pub space: String,

    /// Space used (and created if needed) when the target space is unusable
    #[arg(long, env = "FALLBACK_SPACE", default_value = DEFAULT_FALLBACK_SPACE)]
    pub fallback_space: String,

    /// External id of the file in the Files API
    #[arg(long, env = "FILE_EXTERNAL_ID", default_value = "unique_file_external_id_001")]
    pub external_id: String,

    /// File name in CDF (defaults to the local file name)
    #[arg(long, env = "FILE_NAME")]
    pub name: Option<String>,

    #[arg(long, env = "FILE_SOURCE", default_value = "cdf-file-uploader")]
    pub source: String,

    /// MIME type (guessed when omitted)
    #[arg(long, env = "FILE_MIME_TYPE")]
    pub mime_type: Option<String>,

    /// File metadata entry, repeatable
    #[arg(long = "metadata", value_name = "KEY=VALUE", value_parser = parse_key_value)]
    pub metadata: Vec<(String, String)>,

    /// Numeric id of an existing data set
    #[arg(long, env = "DATA_SET_ID")]
    pub data_set_id: Option<i64>,

    #[arg(long, env = "FILE_DIRECTORY")]
    pub directory: Option<String>,

    /// External id of the file record node (defaults to the file external id)
    #[arg(long)]
    pub node_external_id: Option<String>,

    #[arg(long)]
    pub node_name: Option<String>,

    #[arg(long)]
    pub node_source: Option<String>,

    /// Extra node property, repeatable; values that parse as JSON are sent as JSON
    #[arg(long = "property", value_name = "KEY=VALUE", value_parser = parse_key_value)]
    pub properties: Vec<(String, String)>,

    #[arg(long, default_value = "cdf_cdm")]
    pub view_space: String,

    #[arg(long, default_value = "CogniteFile")]
    pub view_external_id: String,

    #[arg(long, default_value = "v1")]
    pub view_version: String,

    /// Fail instead of replacing an existing file with the same external id
    #[arg(long)]
    pub no_overwrite: bool,

    /// Abort when the target space cannot be read for reasons other than not-found
    #[arg(long)]
    pub strict_target: bool,

    /// Write a small placeholder file when the local file is missing
    #[arg(long)]
    pub create_placeholder: bool,
}

/// Result of reading the command line.
#[derive(Debug)]
pub enum Invocation {
    Run(Box<Opts>),
    /// `--help` or `--version`; clap prints it and exits successfully.
    Info(clap::Error),
}

/// Parses the command line, turning malformed options or env values into
/// configuration errors instead of clap's usage exit.
pub fn parse_from<I, T>(args: I) -> Result<Invocation>
where
    I: IntoIterator<Item = T>,
    T: Into<OsString> + Clone,
{
    match Opts::try_parse_from(args) {
        Ok(opts) => Ok(Invocation::Run(Box::new(opts))),
        Err(e) if matches!(e.kind(), ErrorKind::DisplayHelp | ErrorKind::DisplayVersion) => {
            Ok(Invocation::Info(e))
        }
        Err(e) => {
            let rendered = e.to_string();
            let message = rendered.trim().trim_start_matches("error: ");
            Err(UploaderError::Config(message.to_string()))
        }
    }
}

impl Opts {
    pub fn spaces(&self) -> Result<(ContainerId, ContainerId)> {
        Ok((
            ContainerId::parse(&self.space)?,
            ContainerId::parse(&self.fallback_space)?,
        ))
    }

    pub fn policy(&self) -> TargetErrorPolicy {
        if self.strict_target {
            TargetErrorPolicy::Fail
        } else {
            TargetErrorPolicy::Fallback
        }
    }

    pub fn upload_request(&self) -> Result<UploadRequest> {
        Ok(UploadRequest {
            local_path: self.file.clone(),
            external_id: self.external_id.clone(),
            name: self
                .name
                .as_deref()
                .map(str::trim)
                .filter(|n| !n.is_empty())
                .map(str::to_string),
            source: Some(self.source.clone()).filter(|s| !s.is_empty()),
            mime_type: self.mime_type.clone().filter(|m| !m.is_empty()),
            metadata: unique_entries(&self.metadata, "metadata")?,
            data_set_id: self.data_set_id,
            directory: self.directory.clone().filter(|d| !d.is_empty()),
            overwrite: !self.no_overwrite,
        })
    }

    pub fn record_options(&self) -> Result<RecordOptions> {
        let properties: Map<String, Value> = unique_entries(&self.properties, "property")?
            .into_iter()
            .map(|(key, raw)| {
                let value = serde_json::from_str(&raw).unwrap_or(Value::String(raw));
                (key, value)
            })
            .collect();

        Ok(RecordOptions {
            external_id: self.node_external_id.clone(),
            name: self.node_name.clone(),
            source: self.node_source.clone(),
            properties,
            view: ViewId::new(&self.view_space, &self.view_external_id, &self.view_version),
        })
    }
}

fn parse_key_value(raw: &str) -> std::result::Result<(String, String), String> {
    let (key, value) = raw
        .split_once('=')
        .ok_or_else(|| format!("expected KEY=VALUE, got '{}'", raw))?;
    let key = key.trim();
    if key.is_empty() {
        return Err(format!("empty key in '{}'", raw));
    }
    Ok((key.to_string(), value.to_string()))
}

fn unique_entries(entries: &[(String, String)], what: &str) -> Result<BTreeMap<String, String>> {
    let mut map = BTreeMap::new();
    for (key, value) in entries {
        if map.insert(key.clone(), value.clone()).is_some() {
            return Err(UploaderError::Config(format!(
                "Duplicate {} key '{}'",
                what, key
            )));
        }
    }
    Ok(map)
}

/// Creates a small demo file at `path` unless something already exists there.
pub async fn write_placeholder(path: &Path) -> Result<()> {
    if tokio::fs::try_exists(path).await.unwrap_or(false) {
        return Ok(());
    }

    warn!(path = %path.display(), "Local file missing, creating a placeholder for demonstration");
    let io_error = |source: std::io::Error| UploaderError::Io {
        path: path.to_path_buf(),
        source,
    };
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        tokio::fs::create_dir_all(parent).await.map_err(io_error)?;
    }
    tokio::fs::write(path, PLACEHOLDER_CONTENT)
        .await
        .map_err(io_error)?;
    info!(path = %path.display(), "✅ Placeholder file created");
    Ok(())
}
