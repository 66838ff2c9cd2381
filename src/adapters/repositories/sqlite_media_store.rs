use async_trait::async_trait;
use tracing::debug;

use crate::{
    adapters::repositories::sqlite_statements,
    application::{error::ApplicationError, repositories::media_store::MediaStore},
};

pub struct SqliteMediaStore {
    pool: sqlx::SqlitePool,
}

impl SqliteMediaStore {
    pub fn new(pool: sqlx::SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl MediaStore for SqliteMediaStore {
    async fn put(&self, file_id: &str, content: &[u8]) -> Result<(), ApplicationError> {
        let mut conn = self.pool.acquire().await?;
        sqlite_statements::upsert_media(&mut conn, &[(file_id.to_string(), content.to_vec())])
            .await?;
        debug!("Stored {} bytes for file {}", content.len(), file_id);
        Ok(())
    }

    async fn get(&self, file_id: &str) -> Result<Option<Vec<u8>>, ApplicationError> {
        let mut conn = self.pool.acquire().await?;
        Ok(sqlite_statements::select_media(&mut conn, file_id).await?)
    }

    async fn delete(&self, file_id: &str) -> Result<(), ApplicationError> {
        let mut conn = self.pool.acquire().await?;
        sqlite_statements::delete_media(&mut conn, &[file_id.to_string()]).await?;
        Ok(())
    }
}
