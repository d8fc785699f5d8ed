use crate::error::{Result, UploaderError};
use crate::models::{
    ContainerId, FileRecord, FileUpload, NodeResult, RecordOptions, UploadRequest, UploadedFile,
};
use crate::services::resolver::{ContainerResolver, TargetErrorPolicy};
use crate::services::spaces::ContainerService;
use crate::services::storage::{FileStore, RecordStore};
use crate::utils::validation::{display_name, resolve_mime_type};
use std::path::Path;
use std::sync::Arc;
use tracing::{info, warn};
use validator::Validate;

const MIME_SNIFF_LEN: usize = 1024;

#[derive(Debug, Clone)]
pub struct PipelineOutcome {
    pub space: ContainerId,
    pub file: UploadedFile,
    pub nodes: Vec<NodeResult>,
}

/// Runs one upload end to end: local read, space resolution, file upload,
/// record creation. Each step starts only after the previous one succeeded.
pub struct UploadPipeline {
    resolver: ContainerResolver,
    files: Arc<dyn FileStore>,
    records: Arc<dyn RecordStore>,
}

impl UploadPipeline {
    pub fn new(
        spaces: Arc<dyn ContainerService>,
        files: Arc<dyn FileStore>,
        records: Arc<dyn RecordStore>,
    ) -> Self {
        Self {
            resolver: ContainerResolver::new(spaces),
            files,
            records,
        }
    }

    pub fn with_policy(mut self, policy: TargetErrorPolicy) -> Self {
        self.resolver = self.resolver.with_policy(policy);
        self
    }

    /// Validates the request and reads the local file. Touches no network.
    pub async fn prepare(request: &UploadRequest) -> Result<FileUpload> {
        request.validate()?;

        let content = read_local_file(&request.local_path).await?;
        let name = display_name(request.name.as_deref(), &request.local_path)?;
        let header = &content[..content.len().min(MIME_SNIFF_LEN)];
        let mime_type = resolve_mime_type(request.mime_type.as_deref(), &request.local_path, header);
        info!(file = %name, mime_type = %mime_type, size = content.len(), "📄 Local file ready");

        Ok(FileUpload {
            external_id: request.external_id.clone(),
            name,
            source: request.source.clone().filter(|s| !s.is_empty()),
            mime_type,
            metadata: request.metadata.clone(),
            data_set_id: request.data_set_id,
            directory: request.directory.clone(),
            overwrite: request.overwrite,
            content,
        })
    }

    pub async fn run(
        &self,
        target: &ContainerId,
        fallback: &ContainerId,
        request: &UploadRequest,
        options: &RecordOptions,
    ) -> Result<PipelineOutcome> {
        let upload = Self::prepare(request).await?;
        self.run_prepared(target, fallback, upload, options).await
    }

    /// Same as [`UploadPipeline::run`] for a file already read by
    /// [`UploadPipeline::prepare`].
    pub async fn run_prepared(
        &self,
        target: &ContainerId,
        fallback: &ContainerId,
        upload: FileUpload,
        options: &RecordOptions,
    ) -> Result<PipelineOutcome> {
        info!(target = %target, fallback = %fallback, "🔎 Ensuring data modeling space exists");
        let space = self.resolver.resolve(target, fallback).await?;

        info!(
            external_id = %upload.external_id,
            name = %upload.name,
            overwrite = upload.overwrite,
            "☁️  Uploading file"
        );
        let file = self.files.upload(upload).await?;
        info!(external_id = %file.external_id, id = file.id, "✅ File uploaded");

        let record = FileRecord::from_upload(space.clone(), &file, options);
        info!(
            external_id = %record.external_id,
            space = %record.space,
            "🧾 Creating file record"
        );
        let nodes = self.records.apply(std::slice::from_ref(&record)).await?;
        if nodes.is_empty() {
            warn!("⚠️  Record creation completed but returned no node information");
        }
        for node in &nodes {
            info!(
                external_id = %node.external_id,
                space = %node.space,
                version = node.version,
                "✅ Node processed"
            );
        }

        Ok(PipelineOutcome { space, file, nodes })
    }
}

pub async fn read_local_file(path: &Path) -> Result<Vec<u8>> {
    tokio::fs::read(path).await.map_err(|e| match e.kind() {
        std::io::ErrorKind::NotFound => UploaderError::FileNotFound(path.to_path_buf()),
        _ => UploaderError::Io {
            path: path.to_path_buf(),
            source: e,
        },
    })
}
