use crate::config::CdfConfig;
use crate::error::{Result, UploaderError};
use crate::models::{
    ContainerId, FileRecord, FileUpload, NodeResult, Space, SpaceApply, UploadedFile, ViewId,
};
use crate::services::spaces::ContainerService;
use crate::services::storage::{FileStore, RecordStore};
use async_trait::async_trait;
use reqwest::header::{CONTENT_TYPE, HeaderMap, HeaderValue};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::BTreeMap;
use std::time::Duration;
use tracing::debug;

const TIMEOUT_SECONDS: u64 = 60;
const REQUEST_ID_HEADER: &str = "x-request-id";

/// REST client for the CDF project APIs used by the uploader.
pub struct CdfClient {
    http: reqwest::Client,
    project_url: String,
    token: String,
}

#[derive(Serialize)]
struct Items<T> {
    items: Vec<T>,
}

#[derive(Deserialize)]
struct ItemsResponse<T> {
    items: Vec<T>,
}

#[derive(Serialize)]
struct SpaceRef<'a> {
    space: &'a ContainerId,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct FileCreate<'a> {
    external_id: &'a str,
    name: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    source: Option<&'a str>,
    mime_type: &'a str,
    #[serde(skip_serializing_if = "is_empty_map")]
    metadata: &'a BTreeMap<String, String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    data_set_id: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    directory: Option<&'a str>,
}

fn is_empty_map(map: &&BTreeMap<String, String>) -> bool {
    map.is_empty()
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct FileCreated {
    #[serde(flatten)]
    file: UploadedFile,
    upload_url: String,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct NodeWrite<'a> {
    instance_type: &'static str,
    space: &'a ContainerId,
    external_id: &'a str,
    sources: Vec<NodeSourceWrite<'a>>,
}

#[derive(Serialize)]
struct NodeSourceWrite<'a> {
    source: &'a ViewId,
    properties: &'a Map<String, Value>,
}

impl<'a> From<&'a FileRecord> for NodeWrite<'a> {
    fn from(record: &'a FileRecord) -> Self {
        Self {
            instance_type: "node",
            space: &record.space,
            external_id: &record.external_id,
            sources: vec![NodeSourceWrite {
                source: &record.view,
                properties: &record.properties,
            }],
        }
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct InstancesApply<'a> {
    items: Vec<NodeWrite<'a>>,
    auto_create_start_nodes: bool,
    auto_create_end_nodes: bool,
}

#[derive(Deserialize)]
struct ApiErrorBody {
    error: ApiErrorDetail,
}

#[derive(Deserialize)]
struct ApiErrorDetail {
    message: String,
    #[serde(default)]
    missing: Vec<Value>,
    #[serde(default)]
    duplicated: Vec<Value>,
}

impl CdfClient {
    /// Authenticates and builds a client for the configured project.
    pub async fn connect(config: &CdfConfig) -> Result<Self> {
        let token = super::auth::Authenticator::new(config)?.fetch_token().await?;
        Self::new(config, token)
    }

    pub fn new(config: &CdfConfig, token: String) -> Result<Self> {
        let mut headers = HeaderMap::new();
        headers.insert(
            "x-cdp-app",
            HeaderValue::from_str(&config.client_name).map_err(|e| {
                UploaderError::Config(format!("Invalid client name '{}': {}", config.client_name, e))
            })?,
        );

        let http = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(Duration::from_secs(TIMEOUT_SECONDS))
            .build()?;

        Ok(Self {
            http,
            project_url: config.project_url(),
            token,
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.project_url, path)
    }

    async fn post_json<B, T>(&self, path: &str, body: &B) -> Result<T>
    where
        B: Serialize + ?Sized + Sync,
        T: DeserializeOwned,
    {
        let url = self.url(path);
        debug!("POST {}", url);
        let response = self
            .http
            .post(&url)
            .bearer_auth(&self.token)
            .json(body)
            .send()
            .await?;
        let response = check_status(response).await?;
        let text = response.text().await?;
        Ok(serde_json::from_str(&text)?)
    }
}

async fn check_status(response: reqwest::Response) -> Result<reqwest::Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let request_id = response
        .headers()
        .get(REQUEST_ID_HEADER)
        .and_then(|v| v.to_str().ok())
        .map(str::to_string);
    let body = response
        .text()
        .await
        .unwrap_or_else(|_| "Unknown error".to_string());
    Err(decode_api_error(status.as_u16(), request_id, &body))
}

/// Maps an error response onto the uploader's error taxonomy.
pub(crate) fn decode_api_error(status: u16, request_id: Option<String>, body: &str) -> UploaderError {
    let detail = serde_json::from_str::<ApiErrorBody>(body)
        .ok()
        .map(|b| b.error);
    let message = detail
        .as_ref()
        .map(|d| d.message.clone())
        .unwrap_or_else(|| body.to_string());

    let missing = detail.as_ref().is_some_and(|d| !d.missing.is_empty());
    let duplicated = detail.as_ref().is_some_and(|d| !d.duplicated.is_empty());

    if status == 404 || missing {
        UploaderError::NotFound(message)
    } else if status == 409 || duplicated {
        UploaderError::Duplicated(message)
    } else {
        UploaderError::Api {
            code: status,
            message,
            request_id,
        }
    }
}

fn first_item<T>(response: ItemsResponse<T>, what: &str) -> Result<T> {
    response.items.into_iter().next().ok_or_else(|| UploaderError::Api {
        code: 200,
        message: format!("Empty response while {}", what),
        request_id: None,
    })
}

#[async_trait]
impl ContainerService for CdfClient {
    async fn retrieve(&self, id: &ContainerId) -> Result<Space> {
        let body = Items {
            items: vec![SpaceRef { space: id }],
        };
        let response: ItemsResponse<Space> = self.post_json("models/spaces/byids", &body).await?;
        response
            .items
            .into_iter()
            .find(|s| &s.space == id)
            .ok_or_else(|| UploaderError::NotFound(format!("space '{}'", id)))
    }

    async fn create(&self, space: SpaceApply) -> Result<Space> {
        let body = Items { items: vec![space] };
        let response: ItemsResponse<Space> = self.post_json("models/spaces", &body).await?;
        first_item(response, "creating space")
    }
}

#[async_trait]
impl FileStore for CdfClient {
    async fn upload(&self, upload: FileUpload) -> Result<UploadedFile> {
        let body = FileCreate {
            external_id: &upload.external_id,
            name: &upload.name,
            source: upload.source.as_deref(),
            mime_type: &upload.mime_type,
            metadata: &upload.metadata,
            data_set_id: upload.data_set_id,
            directory: upload.directory.as_deref(),
        };
        let path = format!("files?overwrite={}", upload.overwrite);
        let created: FileCreated = self.post_json(&path, &body).await?;

        debug!("PUT {} ({} bytes)", created.upload_url, upload.content.len());
        let response = self
            .http
            .put(&created.upload_url)
            .header(CONTENT_TYPE, upload.mime_type.as_str())
            .body(upload.content)
            .send()
            .await?;
        check_status(response).await?;

        Ok(created.file)
    }
}

#[async_trait]
impl RecordStore for CdfClient {
    async fn apply(&self, records: &[FileRecord]) -> Result<Vec<NodeResult>> {
        let body = InstancesApply {
            items: records.iter().map(NodeWrite::from).collect(),
            auto_create_start_nodes: true,
            auto_create_end_nodes: true,
        };
        let response: ItemsResponse<NodeResult> = self.post_json("models/instances", &body).await?;
        Ok(response.items)
    }
}
