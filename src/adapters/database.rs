use std::str::FromStr;

use sqlx::sqlite::{
    SqliteConnectOptions, SqliteJournalMode, SqlitePool, SqlitePoolOptions, SqliteSynchronous,
};
use tracing::info;

use crate::{application::error::ApplicationError, domain::config::storage::StorageConfig};

const SCHEMA: [&str; 6] = [
    r#"
    CREATE TABLE IF NOT EXISTS files (
        id TEXT PRIMARY KEY,
        content BLOB NOT NULL
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS projects (
        id TEXT PRIMARY KEY,
        user_id TEXT NOT NULL,
        created_at TEXT NOT NULL,
        file_ids TEXT NOT NULL DEFAULT '[]',
        document TEXT NOT NULL
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS saved_products (
        id TEXT PRIMARY KEY,
        user_id TEXT NOT NULL,
        created_at TEXT NOT NULL,
        file_ids TEXT NOT NULL DEFAULT '[]',
        document TEXT NOT NULL
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS brand_profiles (
        id TEXT PRIMARY KEY,
        user_id TEXT NOT NULL,
        created_at TEXT NOT NULL,
        file_ids TEXT NOT NULL DEFAULT '[]',
        document TEXT NOT NULL
    )
    "#,
    "CREATE INDEX IF NOT EXISTS idx_projects_user_id ON projects(user_id)",
    "CREATE INDEX IF NOT EXISTS idx_saved_products_user_id ON saved_products(user_id)",
];

/// Connection pool over the embedded SQLite database that backs every store.
#[derive(Clone)]
pub struct Database {
    pool: SqlitePool,
}

impl Database {
    pub async fn connect(config: &StorageConfig) -> Result<Self, ApplicationError> {
        let in_memory = config.is_in_memory();

        let mut options = SqliteConnectOptions::from_str(&config.database_url)
            .map_err(|e| {
                ApplicationError::StorageUnavailable(format!(
                    "Invalid database URL '{}': {}",
                    config.database_url, e
                ))
            })?
            .create_if_missing(true)
            .foreign_keys(true);
        if !in_memory {
            options = options
                .journal_mode(SqliteJournalMode::Wal)
                .synchronous(SqliteSynchronous::Normal);
        }

        // Every connection to `:memory:` is a separate database, so an
        // in-memory pool holds exactly one connection for its whole life.
        let pool_options = if in_memory {
            SqlitePoolOptions::new()
                .max_connections(1)
                .min_connections(1)
                .idle_timeout(None)
                .max_lifetime(None)
        } else {
            SqlitePoolOptions::new().max_connections(config.max_connections)
        };

        let pool = pool_options
            .acquire_timeout(config.acquire_timeout)
            .connect_with(options)
            .await
            .map_err(|e| {
                ApplicationError::StorageUnavailable(format!("Failed to open database: {}", e))
            })?;

        let database = Self { pool };
        database.run_migrations().await?;

        info!(
            "Database ready at {} (in memory: {})",
            config.database_url, in_memory
        );
        Ok(database)
    }

    pub async fn connect_in_memory() -> Result<Self, ApplicationError> {
        Self::connect(&StorageConfig::in_memory()).await
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    pub async fn close(&self) {
        self.pool.close().await;
    }

    async fn run_migrations(&self) -> Result<(), ApplicationError> {
        for statement in SCHEMA {
            sqlx::query(statement)
                .execute(&self.pool)
                .await
                .map_err(|e| {
                    ApplicationError::StorageUnavailable(format!("Failed to create schema: {}", e))
                })?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn creates_every_table() {
        let database = Database::connect_in_memory().await.unwrap();

        let tables: Vec<(String,)> = sqlx::query_as(
            "SELECT name FROM sqlite_master WHERE type = 'table' ORDER BY name",
        )
        .fetch_all(database.pool())
        .await
        .unwrap();
        let tables: Vec<String> = tables.into_iter().map(|(name,)| name).collect();

        for expected in ["brand_profiles", "files", "projects", "saved_products"] {
            assert!(tables.contains(&expected.to_string()), "missing {}", expected);
        }
    }

    #[tokio::test]
    async fn file_database_survives_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let config = StorageConfig {
            database_url: format!("sqlite://{}", dir.path().join("store.db").display()),
            ..StorageConfig::default()
        };

        let first = Database::connect(&config).await.unwrap();
        sqlx::query("INSERT INTO files (id, content) VALUES ('f1', x'010203')")
            .execute(first.pool())
            .await
            .unwrap();
        first.close().await;

        let second = Database::connect(&config).await.unwrap();
        let (content,): (Vec<u8>,) = sqlx::query_as("SELECT content FROM files WHERE id = 'f1'")
            .fetch_one(second.pool())
            .await
            .unwrap();
        assert_eq!(content, vec![1, 2, 3]);
    }

    #[tokio::test]
    async fn unreachable_path_is_storage_unavailable() {
        let config = StorageConfig {
            database_url: "sqlite:///nonexistent-dir/for/sure/store.db".to_string(),
            ..StorageConfig::default()
        };

        let result = Database::connect(&config).await;
        assert!(matches!(result, Err(ApplicationError::StorageUnavailable(_))));
    }
}
