pub mod resolver;
pub mod spaces;
pub mod storage;
pub mod upload_service;
