use crate::error::{Result, UploaderError};
use std::env;
use url::Url;

pub const DEFAULT_CLIENT_NAME: &str = "cdf-file-uploader";

/// Connection settings for the CDF project, read from the environment.
#[derive(Debug, Clone)]
pub struct CdfConfig {
    /// CDF project name (`COGNITE_PROJECT`)
    pub project: String,

    /// OAuth client id (`COGNITE_CLIENT_ID`)
    pub client_id: String,

    /// OAuth client secret (`COGNITE_CLIENT_SECRET`)
    pub client_secret: String,

    /// Identity provider tenant (`COGNITE_TENANT_ID`)
    pub tenant_id: String,

    /// Cluster base URL, e.g. `https://westeurope-1.cognitedata.com` (`COGNITE_BASE_URL`)
    pub base_url: String,

    /// Token endpoint override (`COGNITE_TOKEN_URL`)
    pub token_url: Option<String>,

    /// Value sent in the `x-cdp-app` header (`COGNITE_CLIENT_NAME`)
    pub client_name: String,
}

const REQUIRED_VARS: [&str; 5] = [
    "COGNITE_PROJECT",
    "COGNITE_CLIENT_ID",
    "COGNITE_CLIENT_SECRET",
    "COGNITE_TENANT_ID",
    "COGNITE_BASE_URL",
];

impl CdfConfig {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build the configuration from an arbitrary key lookup.
    ///
    /// Every missing required variable is reported in a single error.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let value = |key: &str| {
            lookup(key)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };

        let missing: Vec<&str> = REQUIRED_VARS
            .iter()
            .copied()
            .filter(|key| value(*key).is_none())
            .collect();
        if !missing.is_empty() {
            return Err(UploaderError::Config(format!(
                "Missing required environment variables: {}",
                missing.join(", ")
            )));
        }

        let required = |key: &str| value(key).unwrap_or_default();

        let base_url = normalize_base_url(&required("COGNITE_BASE_URL"));
        Url::parse(&base_url).map_err(|e| {
            UploaderError::Config(format!("Invalid COGNITE_BASE_URL '{}': {}", base_url, e))
        })?;

        Ok(Self {
            project: required("COGNITE_PROJECT"),
            client_id: required("COGNITE_CLIENT_ID"),
            client_secret: required("COGNITE_CLIENT_SECRET"),
            tenant_id: required("COGNITE_TENANT_ID"),
            base_url,
            token_url: value("COGNITE_TOKEN_URL"),
            client_name: value("COGNITE_CLIENT_NAME")
                .unwrap_or_else(|| DEFAULT_CLIENT_NAME.to_string()),
        })
    }

    pub fn token_url(&self) -> String {
        self.token_url.clone().unwrap_or_else(|| {
            format!(
                "https://login.microsoftonline.com/{}/oauth2/v2.0/token",
                self.tenant_id
            )
        })
    }

    pub fn auth_url(&self) -> String {
        format!(
            "https://login.microsoftonline.com/{}/oauth2/v2.0/authorize",
            self.tenant_id
        )
    }

    pub fn scopes(&self) -> Vec<String> {
        vec![format!("{}/.default", self.base_url)]
    }

    /// Root of every project-scoped API path.
    pub fn project_url(&self) -> String {
        format!("{}/api/v1/projects/{}", self.base_url, self.project)
    }
}

/// Accepts the base URL with or without scheme and trailing slash.
pub fn normalize_base_url(raw: &str) -> String {
    let trimmed = raw.trim().trim_end_matches('/');
    if trimmed.starts_with("http://") || trimmed.starts_with("https://") {
        trimmed.to_string()
    } else {
        format!("https://{}", trimmed)
    }
}
