//! Uploads a local file to Cognite Data Fusion and registers it as a node in
//! a data modeling space, falling back to a default space when the requested
//! one is unavailable.

pub mod cli;
pub mod config;
pub mod error;
pub mod infrastructure;
pub mod models;
pub mod services;
pub mod utils;

pub use error::{Result, UploaderError};
