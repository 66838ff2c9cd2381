//! SQL shared by the standalone stores and the transactional unit of work.
//! Every helper runs on a bare connection so the caller decides whether it
//! is part of a transaction.

use sqlx::{query_as, QueryBuilder, Sqlite, SqliteConnection};

use crate::{
    adapters::dto::record_dto::RecordRow,
    application::repositories::record_store::{Collection, StoredRecord},
};

/// SQLite caps bound parameters per statement; stay well below the limit.
const MAX_BINDS_PER_STATEMENT: usize = 900;

pub async fn upsert_media(
    conn: &mut SqliteConnection,
    files: &[(String, Vec<u8>)],
) -> Result<(), sqlx::Error> {
    for chunk in files.chunks(MAX_BINDS_PER_STATEMENT / 2) {
        let mut builder: QueryBuilder<Sqlite> = QueryBuilder::new("INSERT INTO files (id, content) ");
        builder.push_values(chunk, |mut row, (file_id, content)| {
            row.push_bind(file_id.as_str()).push_bind(content.as_slice());
        });
        builder.push(" ON CONFLICT(id) DO UPDATE SET content = excluded.content");
        builder.build().execute(&mut *conn).await?;
    }
    Ok(())
}

pub async fn delete_media(
    conn: &mut SqliteConnection,
    file_ids: &[String],
) -> Result<(), sqlx::Error> {
    for chunk in file_ids.chunks(MAX_BINDS_PER_STATEMENT) {
        let mut builder: QueryBuilder<Sqlite> = QueryBuilder::new("DELETE FROM files WHERE id IN (");
        let mut separated = builder.separated(", ");
        for file_id in chunk {
            separated.push_bind(file_id.as_str());
        }
        separated.push_unseparated(")");
        builder.build().execute(&mut *conn).await?;
    }
    Ok(())
}

pub async fn select_media(
    conn: &mut SqliteConnection,
    file_id: &str,
) -> Result<Option<Vec<u8>>, sqlx::Error> {
    let row: Option<(Vec<u8>,)> = query_as("SELECT content FROM files WHERE id = ?")
        .bind(file_id)
        .fetch_optional(&mut *conn)
        .await?;
    Ok(row.map(|(content,)| content))
}

pub async fn upsert_record(
    conn: &mut SqliteConnection,
    collection: Collection,
    record: &StoredRecord,
) -> Result<(), sqlx::Error> {
    let file_ids = serde_json::to_string(&record.file_ids)
        .map_err(|e| sqlx::Error::Encode(Box::new(e)))?;
    let query = format!(
        r#"
        INSERT INTO {} (id, user_id, created_at, file_ids, document)
        VALUES (?, ?, ?, ?, ?)
        ON CONFLICT(id) DO UPDATE SET
            user_id = excluded.user_id,
            created_at = excluded.created_at,
            file_ids = excluded.file_ids,
            document = excluded.document
        "#,
        collection.table_name()
    );

    sqlx::query(&query)
        .bind(&record.key)
        .bind(&record.owner_id)
        .bind(record.created_at)
        .bind(file_ids)
        .bind(record.document.to_string())
        .execute(&mut *conn)
        .await?;
    Ok(())
}

pub async fn delete_record(
    conn: &mut SqliteConnection,
    collection: Collection,
    key: &str,
) -> Result<(), sqlx::Error> {
    let query = format!("DELETE FROM {} WHERE id = ?", collection.table_name());
    sqlx::query(&query).bind(key).execute(&mut *conn).await?;
    Ok(())
}

pub async fn select_record(
    conn: &mut SqliteConnection,
    collection: Collection,
    key: &str,
) -> Result<Option<RecordRow>, sqlx::Error> {
    let query = format!(
        "SELECT id, user_id, created_at, file_ids, document FROM {} WHERE id = ?",
        collection.table_name()
    );
    query_as::<_, RecordRow>(&query)
        .bind(key)
        .fetch_optional(&mut *conn)
        .await
}

pub async fn select_all_records(
    conn: &mut SqliteConnection,
    collection: Collection,
) -> Result<Vec<RecordRow>, sqlx::Error> {
    let query = format!(
        "SELECT id, user_id, created_at, file_ids, document FROM {}",
        collection.table_name()
    );
    query_as::<_, RecordRow>(&query).fetch_all(&mut *conn).await
}

/// Media ids referenced by the stored record, or `None` when there is no
/// record under `key`.
pub async fn select_record_file_ids(
    conn: &mut SqliteConnection,
    collection: Collection,
    key: &str,
) -> Result<Option<Vec<String>>, sqlx::Error> {
    let query = format!("SELECT file_ids FROM {} WHERE id = ?", collection.table_name());
    let row: Option<(String,)> = query_as(&query)
        .bind(key)
        .fetch_optional(&mut *conn)
        .await?;

    row.map(|(file_ids,)| {
        serde_json::from_str(&file_ids).map_err(|e| sqlx::Error::Decode(Box::new(e)))
    })
    .transpose()
}
