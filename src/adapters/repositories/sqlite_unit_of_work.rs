use async_trait::async_trait;
use sqlx::SqliteConnection;
use tracing::{debug, warn};

use crate::{
    adapters::repositories::sqlite_statements,
    application::{
        error::ApplicationError,
        repositories::unit_of_work::{UnitOfWork, WriteBatch, WriteOp},
    },
};

pub struct SqliteUnitOfWork {
    pool: sqlx::SqlitePool,
}

impl SqliteUnitOfWork {
    pub fn new(pool: sqlx::SqlitePool) -> Self {
        Self { pool }
    }
}

/// Media ids `previous` referenced that `current` no longer does. Both
/// lists are sorted.
fn dropped_ids(previous: Vec<String>, current: &[String]) -> Vec<String> {
    previous
        .into_iter()
        .filter(|file_id| current.binary_search(file_id).is_err())
        .collect()
}

async fn flush_media(
    conn: &mut SqliteConnection,
    pending: &mut Vec<(String, Vec<u8>)>,
) -> Result<(), sqlx::Error> {
    if !pending.is_empty() {
        sqlite_statements::upsert_media(conn, pending).await?;
        pending.clear();
    }
    Ok(())
}

async fn apply(conn: &mut SqliteConnection, batch: WriteBatch) -> Result<(), sqlx::Error> {
    // Consecutive media puts go out as one statement.
    let mut pending: Vec<(String, Vec<u8>)> = Vec::new();

    for op in batch.into_ops() {
        match op {
            WriteOp::PutMedia { file_id, content } => {
                pending.push((file_id, content));
            }
            WriteOp::PutRecord { collection, record } => {
                flush_media(conn, &mut pending).await?;
                let previous =
                    sqlite_statements::select_record_file_ids(conn, collection, &record.key)
                        .await?
                        .unwrap_or_default();
                let dropped = dropped_ids(previous, &record.file_ids);
                if !dropped.is_empty() {
                    debug!(
                        "Removing {} media no longer referenced by {} {}",
                        dropped.len(),
                        collection.table_name(),
                        record.key
                    );
                    sqlite_statements::delete_media(conn, &dropped).await?;
                }
                sqlite_statements::upsert_record(conn, collection, &record).await?;
            }
            WriteOp::DeleteRecord { collection, key } => {
                flush_media(conn, &mut pending).await?;
                let Some(file_ids) =
                    sqlite_statements::select_record_file_ids(conn, collection, &key).await?
                else {
                    debug!("Nothing to delete for {} {}", collection.table_name(), key);
                    continue;
                };
                sqlite_statements::delete_media(conn, &file_ids).await?;
                sqlite_statements::delete_record(conn, collection, &key).await?;
            }
        }
    }

    flush_media(conn, &mut pending).await
}

#[async_trait]
impl UnitOfWork for SqliteUnitOfWork {
    async fn commit(&self, batch: WriteBatch) -> Result<(), ApplicationError> {
        if batch.is_empty() {
            return Ok(());
        }
        let op_count = batch.len();

        // Take the write lock up front: record ops read the previous row
        // before writing, and a deferred transaction could not upgrade once
        // another writer committed.
        let mut tx = self.pool.begin_with("BEGIN IMMEDIATE").await?;
        if let Err(e) = apply(&mut tx, batch).await {
            warn!("Rolling back write batch of {} ops: {}", op_count, e);
            if let Err(rollback_error) = tx.rollback().await {
                warn!("Rollback failed: {}", rollback_error);
            }
            return Err(e.into());
        }
        tx.commit().await?;

        debug!("Write batch of {} ops committed", op_count);
        Ok(())
    }
}
