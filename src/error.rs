use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum UploaderError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Invalid upload parameters: {0}")]
    Validation(#[from] validator::ValidationErrors),

    #[error("Local file not found: {}", .0.display())]
    FileNotFound(PathBuf),

    #[error("Failed to read local file {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Authentication failed: {0}")]
    Auth(String),

    #[error("Not Found: {0}")]
    NotFound(String),

    #[error("Duplicated: {0}")]
    Duplicated(String),

    #[error("API error {code}: {message} (request id: {})", request_id.as_deref().unwrap_or("unknown"))]
    Api {
        code: u16,
        message: String,
        request_id: Option<String>,
    },

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Malformed response: {0}")]
    Json(#[from] serde_json::Error),
}

impl UploaderError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, UploaderError::NotFound(_))
    }

    pub fn is_duplicated(&self) -> bool {
        matches!(self, UploaderError::Duplicated(_))
    }

    /// Errors raised before any network call was attempted.
    pub fn is_local(&self) -> bool {
        matches!(
            self,
            UploaderError::Config(_)
                | UploaderError::Validation(_)
                | UploaderError::FileNotFound(_)
                | UploaderError::Io { .. }
        )
    }

    /// Short operator-facing label used when reporting a fatal error.
    pub fn category(&self) -> &'static str {
        match self {
            UploaderError::Config(_) | UploaderError::Validation(_) => "Configuration",
            UploaderError::FileNotFound(_) | UploaderError::Io { .. } => "File System",
            UploaderError::Auth(_) => "Authentication",
            UploaderError::NotFound(_) => "CDF Not Found",
            UploaderError::Duplicated(_) => "CDF Duplicated",
            UploaderError::Api { .. } | UploaderError::Http(_) | UploaderError::Json(_) => {
                "Cognite API"
            }
        }
    }
}

pub type Result<T, E = UploaderError> = std::result::Result<T, E>;
