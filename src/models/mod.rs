mod file;
mod record;
mod space;

pub use file::{FileUpload, UploadRequest, UploadedFile};
pub use record::{FileRecord, NodeResult, RecordOptions, ViewId};
pub use space::{ContainerId, Space, SpaceApply};
