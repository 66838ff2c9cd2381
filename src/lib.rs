//! Local persistence for GenieUs projects, saved products and brand profiles.
//!
//! Records are stored lean in an embedded SQLite database and their media
//! bytes are kept in a separate `files` table keyed by file id. Reads
//! reattach the bytes; deletes remove the record together with every blob it
//! referenced.

pub mod adapters;
pub mod application;
pub mod domain;
pub mod telemetry;

use std::sync::Arc;

pub use adapters::{
    database::Database,
    repositories::{SqliteMediaStore, SqliteRecordStore, SqliteUnitOfWork},
};
pub use application::{
    error::ApplicationError,
    repositories::{
        media_store::MediaStore,
        record_store::{Collection, RecordStore, StoredRecord},
        unit_of_work::{UnitOfWork, WriteBatch, WriteOp},
    },
    services::PersistenceService,
};
pub use domain::{
    config::storage::StorageConfig,
    models::{
        file::UploadedFile,
        library::{BrandProfile, SavedProduct},
        project::Project,
    },
};

/// Wires the SQLite-backed stores into a [`PersistenceService`].
pub fn service_for(database: &Database) -> PersistenceService {
    let pool = database.pool().clone();
    PersistenceService::new(
        Arc::new(SqliteMediaStore::new(pool.clone())) as Arc<dyn MediaStore>,
        Arc::new(SqliteRecordStore::new(pool.clone())) as Arc<dyn RecordStore>,
        Arc::new(SqliteUnitOfWork::new(pool)) as Arc<dyn UnitOfWork>,
    )
}

/// Opens the database described by `config` and returns the service on top.
pub async fn open(config: &StorageConfig) -> Result<(Database, PersistenceService), ApplicationError> {
    let database = Database::connect(config).await?;
    let service = service_for(&database);
    Ok((database, service))
}
