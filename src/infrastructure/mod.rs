pub mod auth;
pub mod cdf_client;
pub mod storage;
