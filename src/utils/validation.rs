use crate::error::{Result, UploaderError};
use std::path::Path;
use tracing::{debug, warn};

pub const DEFAULT_MIME_TYPE: &str = "application/octet-stream";

/// Name the file is registered under: the explicit name when given,
/// otherwise the final component of the local path.
pub fn display_name(explicit: Option<&str>, path: &Path) -> Result<String> {
    if let Some(name) = explicit.map(str::trim).filter(|n| !n.is_empty()) {
        return Ok(name.to_string());
    }

    path.file_name()
        .and_then(|n| n.to_str())
        .filter(|n| !n.is_empty())
        .map(str::to_string)
        .ok_or_else(|| {
            UploaderError::Config(format!(
                "Cannot derive a file name from path '{}'",
                path.display()
            ))
        })
}

/// Lowercases a MIME type and strips parameters such as `; charset=utf-8`.
/// Returns `None` when the value does not parse as `type/subtype`.
pub fn normalize_mime_type(content_type: &str) -> Option<String> {
    let normalized = content_type
        .split(';')
        .next()
        .unwrap_or("")
        .trim()
        .to_lowercase();

    normalized
        .parse::<mime::Mime>()
        .ok()
        .map(|m| m.essence_str().to_string())
}

/// Picks the MIME type for an upload.
///
/// Order: explicit value, extension lookup, content sniffing, then
/// `application/octet-stream`.
pub fn resolve_mime_type(explicit: Option<&str>, path: &Path, header: &[u8]) -> String {
    if let Some(raw) = explicit.map(str::trim).filter(|m| !m.is_empty()) {
        match normalize_mime_type(raw) {
            Some(mime_type) => {
                debug!("Using provided MIME type: {}", mime_type);
                return mime_type;
            }
            None => warn!("Ignoring unparseable MIME type '{}'", raw),
        }
    }

    if let Some(guess) = mime_guess::from_path(path).first() {
        debug!("Determined MIME type from extension: {}", guess);
        return guess.essence_str().to_string();
    }

    if let Some(kind) = infer::get(header) {
        debug!("Determined MIME type from content: {}", kind.mime_type());
        return kind.mime_type().to_string();
    }

    DEFAULT_MIME_TYPE.to_string()
}
