use chrono::{DateTime, Utc};
use sqlx::{sqlite::SqliteRow, FromRow, Row};

use crate::application::{error::ApplicationError, repositories::record_store::StoredRecord};

/// A row of one of the record tables, with the document still as text.
#[derive(Debug, Clone)]
pub struct RecordRow {
    pub id: String,
    pub user_id: String,
    pub created_at: DateTime<Utc>,
    pub file_ids: String,
    pub document: String,
}

impl FromRow<'_, SqliteRow> for RecordRow {
    fn from_row(row: &SqliteRow) -> Result<Self, sqlx::Error> {
        Ok(RecordRow {
            id: row.try_get("id")?,
            user_id: row.try_get("user_id")?,
            created_at: row.try_get("created_at")?,
            file_ids: row.try_get("file_ids")?,
            document: row.try_get("document")?,
        })
    }
}

impl TryFrom<RecordRow> for StoredRecord {
    type Error = ApplicationError;

    fn try_from(value: RecordRow) -> Result<Self, Self::Error> {
        Ok(StoredRecord {
            key: value.id,
            owner_id: value.user_id,
            created_at: value.created_at,
            file_ids: serde_json::from_str(&value.file_ids)?,
            document: serde_json::from_str(&value.document)?,
        })
    }
}
