//! Clients for the Redis price cache and the image storage API

pub mod cache;
pub mod storage;

pub use cache::RedisCache;
pub use storage::{ImageUpload, StorageClient};
