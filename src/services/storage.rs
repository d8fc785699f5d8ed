use crate::error::Result;
use crate::models::{FileRecord, FileUpload, NodeResult, UploadedFile};
use async_trait::async_trait;

/// Binary object storage of the platform.
#[async_trait]
pub trait FileStore: Send + Sync {
    /// Registers the file metadata and uploads its content. With
    /// `overwrite` set, an existing file with the same external id is
    /// replaced instead of rejected as a duplicate.
    async fn upload(&self, upload: FileUpload) -> Result<UploadedFile>;
}

/// Data-model instance storage of the platform.
#[async_trait]
pub trait RecordStore: Send + Sync {
    /// Applies the records as upserts, auto-creating referenced start and
    /// end nodes.
    async fn apply(&self, records: &[FileRecord]) -> Result<Vec<NodeResult>>;
}
