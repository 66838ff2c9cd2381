#![allow(dead_code)]

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, TimeZone, Utc};
use genieus_store::{
    service_for, ApplicationError, Database, MediaStore, PersistenceService, Project,
    SqliteMediaStore, SqliteRecordStore, SqliteUnitOfWork, UploadedFile,
};

pub struct TestStore {
    pub database: Database,
    pub service: PersistenceService,
    pub media: SqliteMediaStore,
}

pub async fn setup_in_memory() -> TestStore {
    genieus_store::telemetry::init_tracing();
    let database = Database::connect_in_memory()
        .await
        .expect("in-memory database");
    let service = service_for(&database);
    let media = SqliteMediaStore::new(database.pool().clone());
    TestStore {
        database,
        service,
        media,
    }
}

pub fn at(minute: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 6, 1, 10, minute, 0).unwrap()
}

pub fn image(id: &str, bytes: &[u8]) -> UploadedFile {
    UploadedFile::with_id(
        id.to_string(),
        bytes.to_vec(),
        format!("{}.png", id),
        "image/png".to_string(),
    )
}

pub fn video(id: &str, bytes: &[u8]) -> UploadedFile {
    UploadedFile::with_id(
        id.to_string(),
        bytes.to_vec(),
        format!("{}.mp4", id),
        "video/mp4".to_string(),
    )
}

pub fn project(id: &str, user_id: &str, created_at: DateTime<Utc>) -> Project {
    Project::new(id.to_string(), user_id.to_string(), created_at)
}

/// Media store that fails lookups for one file id and delegates the rest.
pub struct FlakyMediaStore {
    pub inner: SqliteMediaStore,
    pub failing_id: String,
}

#[async_trait]
impl MediaStore for FlakyMediaStore {
    async fn put(&self, file_id: &str, content: &[u8]) -> Result<(), ApplicationError> {
        self.inner.put(file_id, content).await
    }

    async fn get(&self, file_id: &str) -> Result<Option<Vec<u8>>, ApplicationError> {
        if file_id == self.failing_id {
            return Err(ApplicationError::DatabaseError(
                "database disk image is malformed".to_string(),
            ));
        }
        self.inner.get(file_id).await
    }

    async fn delete(&self, file_id: &str) -> Result<(), ApplicationError> {
        self.inner.delete(file_id).await
    }
}

pub fn service_with_flaky_media(database: &Database, failing_id: &str) -> PersistenceService {
    let pool = database.pool().clone();
    PersistenceService::new(
        Arc::new(FlakyMediaStore {
            inner: SqliteMediaStore::new(pool.clone()),
            failing_id: failing_id.to_string(),
        }),
        Arc::new(SqliteRecordStore::new(pool.clone())),
        Arc::new(SqliteUnitOfWork::new(pool)),
    )
}
