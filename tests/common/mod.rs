#![allow(dead_code)]

use async_trait::async_trait;
use cdf_file_uploader::error::{Result, UploaderError};
use cdf_file_uploader::models::{
    ContainerId, FileRecord, FileUpload, NodeResult, Space, SpaceApply, UploadedFile,
};
use cdf_file_uploader::services::spaces::ContainerService;
use cdf_file_uploader::services::storage::{FileStore, RecordStore};
use std::collections::{HashMap, HashSet};
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};

/// In-memory stand-in for a CDF project with upsert semantics.
#[derive(Default)]
pub struct InMemoryCdf {
    pub spaces: Mutex<HashSet<String>>,
    /// Spaces whose retrieval fails with a server error.
    pub broken: Mutex<HashSet<String>>,
    pub files: Mutex<HashMap<String, (UploadedFile, Vec<u8>)>>,
    pub nodes: Mutex<HashMap<(String, String), FileRecord>>,
    pub retrieve_calls: AtomicUsize,
    pub create_calls: AtomicUsize,
    pub upload_calls: AtomicUsize,
    pub apply_calls: AtomicUsize,
    next_id: AtomicUsize,
}

impl InMemoryCdf {
    pub fn with_spaces(spaces: &[&str]) -> Self {
        let cdf = Self::default();
        cdf.spaces
            .lock()
            .unwrap()
            .extend(spaces.iter().map(|s| s.to_string()));
        cdf
    }

    pub fn break_space(&self, space: &str) {
        self.broken.lock().unwrap().insert(space.to_string());
    }

    pub fn has_space(&self, space: &str) -> bool {
        self.spaces.lock().unwrap().contains(space)
    }

    pub fn network_calls(&self) -> usize {
        self.retrieve_calls.load(Ordering::SeqCst)
            + self.create_calls.load(Ordering::SeqCst)
            + self.upload_calls.load(Ordering::SeqCst)
            + self.apply_calls.load(Ordering::SeqCst)
    }
}

fn space(id: &ContainerId) -> Space {
    Space {
        space: id.clone(),
        name: None,
        description: None,
        is_global: false,
        created_time: None,
        last_updated_time: None,
    }
}

#[async_trait]
impl ContainerService for InMemoryCdf {
    async fn retrieve(&self, id: &ContainerId) -> Result<Space> {
        self.retrieve_calls.fetch_add(1, Ordering::SeqCst);
        if self.broken.lock().unwrap().contains(id.as_str()) {
            return Err(UploaderError::Api {
                code: 500,
                message: "Internal server error".to_string(),
                request_id: None,
            });
        }
        if self.spaces.lock().unwrap().contains(id.as_str()) {
            Ok(space(id))
        } else {
            Err(UploaderError::NotFound(format!("space '{}'", id)))
        }
    }

    async fn create(&self, apply: SpaceApply) -> Result<Space> {
        self.create_calls.fetch_add(1, Ordering::SeqCst);
        self.spaces
            .lock()
            .unwrap()
            .insert(apply.space.as_str().to_string());
        Ok(space(&apply.space))
    }
}

#[async_trait]
impl FileStore for InMemoryCdf {
    async fn upload(&self, upload: FileUpload) -> Result<UploadedFile> {
        self.upload_calls.fetch_add(1, Ordering::SeqCst);
        let mut files = self.files.lock().unwrap();
        let existing_id = files.get(&upload.external_id).map(|(f, _)| f.id);
        if existing_id.is_some() && !upload.overwrite {
            return Err(UploaderError::Duplicated(format!(
                "file '{}'",
                upload.external_id
            )));
        }
        let id = existing_id
            .unwrap_or_else(|| self.next_id.fetch_add(1, Ordering::SeqCst) as i64 + 1);
        let file = UploadedFile {
            id,
            external_id: upload.external_id.clone(),
            name: upload.name,
            source: upload.source,
            mime_type: Some(upload.mime_type),
            metadata: upload.metadata,
            directory: upload.directory,
            data_set_id: upload.data_set_id,
            uploaded: true,
            uploaded_time: None,
            created_time: None,
            last_updated_time: None,
        };
        files.insert(upload.external_id, (file.clone(), upload.content));
        Ok(file)
    }
}

#[async_trait]
impl RecordStore for InMemoryCdf {
    async fn apply(&self, records: &[FileRecord]) -> Result<Vec<NodeResult>> {
        self.apply_calls.fetch_add(1, Ordering::SeqCst);
        let mut nodes = self.nodes.lock().unwrap();
        let mut results = Vec::new();
        for record in records {
            if !self.spaces.lock().unwrap().contains(record.space.as_str()) {
                return Err(UploaderError::NotFound(format!("space '{}'", record.space)));
            }
            let key = (record.space.to_string(), record.external_id.clone());
            let version = match nodes.get(&key) {
                Some(_) => 2,
                None => 1,
            };
            nodes.insert(key, record.clone());
            results.push(NodeResult {
                space: record.space.to_string(),
                external_id: record.external_id.clone(),
                version,
                was_modified: true,
                created_time: None,
                last_updated_time: None,
            });
        }
        Ok(results)
    }
}
