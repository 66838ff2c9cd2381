use async_trait::async_trait;
use tracing::warn;

use crate::{
    adapters::repositories::sqlite_statements,
    application::{
        error::ApplicationError,
        repositories::record_store::{Collection, RecordStore, StoredRecord},
    },
};

pub struct SqliteRecordStore {
    pool: sqlx::SqlitePool,
}

impl SqliteRecordStore {
    pub fn new(pool: sqlx::SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl RecordStore for SqliteRecordStore {
    async fn put(
        &self,
        collection: Collection,
        record: StoredRecord,
    ) -> Result<(), ApplicationError> {
        let mut conn = self.pool.acquire().await?;
        sqlite_statements::upsert_record(&mut conn, collection, &record).await?;
        Ok(())
    }

    async fn get(
        &self,
        collection: Collection,
        key: &str,
    ) -> Result<Option<StoredRecord>, ApplicationError> {
        let mut conn = self.pool.acquire().await?;
        sqlite_statements::select_record(&mut conn, collection, key)
            .await?
            .map(StoredRecord::try_from)
            .transpose()
    }

    async fn get_all(&self, collection: Collection) -> Result<Vec<StoredRecord>, ApplicationError> {
        let mut conn = self.pool.acquire().await?;
        let rows = sqlite_statements::select_all_records(&mut conn, collection).await?;

        Ok(rows
            .into_iter()
            .filter_map(|row| {
                let key = row.id.clone();
                match StoredRecord::try_from(row) {
                    Ok(record) => Some(record),
                    Err(e) => {
                        warn!(
                            "Skipping {} row {} with malformed document: {}",
                            collection.table_name(),
                            key,
                            e
                        );
                        None
                    }
                }
            })
            .collect())
    }

    async fn delete(&self, collection: Collection, key: &str) -> Result<(), ApplicationError> {
        let mut conn = self.pool.acquire().await?;
        sqlite_statements::delete_record(&mut conn, collection, key).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use chrono::{TimeZone, Utc};
    use serde_json::json;

    use super::*;
    use crate::adapters::database::Database;

    fn record(key: &str, owner: &str) -> StoredRecord {
        StoredRecord {
            key: key.to_string(),
            owner_id: owner.to_string(),
            created_at: Utc.with_ymd_and_hms(2024, 1, 2, 3, 4, 5).unwrap(),
            file_ids: vec![format!("{}-img", key)],
            document: json!({ "id": key, "userId": owner }),
        }
    }

    #[tokio::test]
    async fn get_all_is_unfiltered_and_collections_are_separate() {
        let database = Database::connect_in_memory().await.unwrap();
        let store = SqliteRecordStore::new(database.pool().clone());

        store.put(Collection::Projects, record("p1", "u1")).await.unwrap();
        store.put(Collection::Projects, record("p2", "u2")).await.unwrap();
        store
            .put(Collection::SavedProducts, record("s1", "u1"))
            .await
            .unwrap();

        let projects = store.get_all(Collection::Projects).await.unwrap();
        assert_eq!(projects.len(), 2);
        assert!(store.get_all(Collection::BrandProfiles).await.unwrap().is_empty());
        assert_eq!(store.get_all(Collection::SavedProducts).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn put_overwrites_by_key() {
        let database = Database::connect_in_memory().await.unwrap();
        let store = SqliteRecordStore::new(database.pool().clone());

        store.put(Collection::Projects, record("p1", "u1")).await.unwrap();
        let mut updated = record("p1", "u1");
        updated.document = json!({ "id": "p1", "userId": "u1", "prompt": "v2" });
        store.put(Collection::Projects, updated.clone()).await.unwrap();

        let fetched = store.get(Collection::Projects, "p1").await.unwrap().unwrap();
        assert_eq!(fetched, updated);
        assert_eq!(store.get_all(Collection::Projects).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn missing_keys_read_as_none_and_delete_quietly() {
        let database = Database::connect_in_memory().await.unwrap();
        let store = SqliteRecordStore::new(database.pool().clone());

        assert!(store.get(Collection::Projects, "nope").await.unwrap().is_none());
        store.delete(Collection::Projects, "nope").await.unwrap();

        store.put(Collection::Projects, record("p1", "u1")).await.unwrap();
        store.delete(Collection::Projects, "p1").await.unwrap();
        assert!(store.get(Collection::Projects, "p1").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn malformed_rows_are_skipped_by_get_all() {
        let database = Database::connect_in_memory().await.unwrap();
        let store = SqliteRecordStore::new(database.pool().clone());

        store.put(Collection::Projects, record("p1", "u1")).await.unwrap();
        sqlx::query(
            "INSERT INTO projects (id, user_id, created_at, document) \
             VALUES ('bad', 'u1', '2024-01-01T00:00:00Z', '{not json')",
        )
        .execute(database.pool())
        .await
        .unwrap();

        let all = store.get_all(Collection::Projects).await.unwrap();
        assert_eq!(all.len(), 1);
        assert_eq!(all[0].key, "p1");
    }
}
