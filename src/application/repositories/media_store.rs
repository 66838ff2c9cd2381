use async_trait::async_trait;

use crate::application::error::ApplicationError;

/// Durable mapping from file id to bytes. Nothing else about the file is
/// kept here; mime type and name travel in the owning record.
#[async_trait]
pub trait MediaStore: Send + Sync {
    /// Inserts or overwrites the bytes stored under `file_id`.
    async fn put(&self, file_id: &str, content: &[u8]) -> Result<(), ApplicationError>;
    /// Returns `Ok(None)` when nothing is stored under `file_id`.
    async fn get(&self, file_id: &str) -> Result<Option<Vec<u8>>, ApplicationError>;
    /// Deleting an unknown id succeeds.
    async fn delete(&self, file_id: &str) -> Result<(), ApplicationError>;
}
