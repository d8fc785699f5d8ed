use crate::error::Result;
use crate::models::{ContainerId, Space, SpaceApply};
use async_trait::async_trait;

/// Remote registry of data-modeling spaces.
#[async_trait]
pub trait ContainerService: Send + Sync {
    /// Fails with `UploaderError::NotFound` when the space does not exist.
    async fn retrieve(&self, id: &ContainerId) -> Result<Space>;

    /// Fails with `UploaderError::Duplicated` when the space already exists.
    async fn create(&self, space: SpaceApply) -> Result<Space>;
}
