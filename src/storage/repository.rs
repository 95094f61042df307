use anyhow::{Context, Result};
use chrono::Utc;
use serde::de::DeserializeOwned;
use sqlx::{Row, SqlitePool};
use tracing::debug;

use super::MIGRATION_001_KV_STORE;

/// Outcome of reading a JSON value back from the store.
#[derive(Debug, Clone, PartialEq)]
pub enum Stored<T> {
    /// Nothing was ever written under the key
    Missing,
    /// The value was present and parsed
    Value(T),
    /// The value was present but could not be parsed
    Corrupt { raw: String, reason: String },
}

/// Durable key-value store over a single SQLite table.
///
/// Values are opaque strings; callers decide how to encode them. Cloning is
/// cheap and every clone talks to the same database.
#[derive(Clone)]
pub struct Repository {
    pool: SqlitePool,
}

impl Repository {
    /// Create a new repository with the given SQLite connection pool.
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Connect to a SQLite database at the given URL.
    pub async fn connect(database_url: &str) -> Result<Self> {
        let pool = SqlitePool::connect(database_url)
            .await
            .context("Failed to connect to database")?;
        Ok(Self::new(pool))
    }

    /// Run database migrations.
    pub async fn migrate(&self) -> Result<()> {
        sqlx::query(MIGRATION_001_KV_STORE)
            .execute(&self.pool)
            .await
            .context("Failed to run migration 001")?;
        Ok(())
    }

    /// Open (creating if needed) a database file and migrate it.
    pub async fn open(database_path: &str) -> Result<Self> {
        let db_url = format!("sqlite:{}?mode=rwc", database_path);
        let repo = Self::connect(&db_url).await?;
        repo.migrate().await?;
        Ok(repo)
    }

    /// Read the raw value stored under `key`.
    pub async fn get(&self, key: &str) -> Result<Option<String>> {
        let row = sqlx::query("SELECT value FROM kv_store WHERE key = ?")
            .bind(key)
            .fetch_optional(&self.pool)
            .await
            .with_context(|| format!("Failed to read key '{}'", key))?;

        Ok(row.map(|row| row.get("value")))
    }

    /// Write `value` under `key`, replacing any previous value.
    pub async fn set(&self, key: &str, value: &str) -> Result<()> {
        sqlx::query(
            r#"
            INSERT INTO kv_store (key, value, updated_at)
            VALUES (?, ?, ?)
            ON CONFLICT(key) DO UPDATE SET value = excluded.value, updated_at = excluded.updated_at
            "#,
        )
        .bind(key)
        .bind(value)
        .bind(Utc::now().to_rfc3339())
        .execute(&self.pool)
        .await
        .with_context(|| format!("Failed to write key '{}'", key))?;

        debug!(key, bytes = value.len(), "Persisted value");
        Ok(())
    }

    /// List every key currently stored, sorted.
    pub async fn keys(&self) -> Result<Vec<String>> {
        let rows = sqlx::query("SELECT key FROM kv_store ORDER BY key")
            .fetch_all(&self.pool)
            .await
            .context("Failed to list keys")?;

        Ok(rows.iter().map(|row| row.get("key")).collect())
    }

    /// Read and deserialize a JSON value.
    /// Parse failures are reported as [`Stored::Corrupt`], not as errors.
    pub async fn load_json<T: DeserializeOwned>(&self, key: &str) -> Result<Stored<T>> {
        let Some(raw) = self.get(key).await? else {
            return Ok(Stored::Missing);
        };

        match serde_json::from_str(&raw) {
            Ok(value) => Ok(Stored::Value(value)),
            Err(e) => Ok(Stored::Corrupt {
                raw,
                reason: e.to_string(),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use tempfile::TempDir;

    use super::*;

    async fn test_repo() -> (Repository, TempDir) {
        let temp_dir = TempDir::new().unwrap();
        let db_path = temp_dir.path().join("kv.db");
        let repo = Repository::open(db_path.to_str().unwrap()).await.unwrap();
        (repo, temp_dir)
    }

    #[tokio::test]
    async fn test_get_missing_key() {
        let (repo, _temp) = test_repo().await;
        assert_eq!(repo.get("nope").await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_set_overwrites() {
        let (repo, _temp) = test_repo().await;
        repo.set("currentUserId", "1").await.unwrap();
        repo.set("currentUserId", "2").await.unwrap();

        assert_eq!(repo.get("currentUserId").await.unwrap(), Some("2".to_string()));
        assert_eq!(repo.keys().await.unwrap(), vec!["currentUserId".to_string()]);
    }

    #[tokio::test]
    async fn test_load_json_states() {
        let (repo, _temp) = test_repo().await;

        let missing: Stored<BTreeMap<i64, Vec<i64>>> = repo.load_json("map").await.unwrap();
        assert_eq!(missing, Stored::Missing);

        let mut map = BTreeMap::new();
        map.insert(1_i64, vec![10_i64, 20]);
        repo.set("map", &serde_json::to_string(&map).unwrap())
            .await
            .unwrap();
        let loaded: Stored<BTreeMap<i64, Vec<i64>>> = repo.load_json("map").await.unwrap();
        assert_eq!(loaded, Stored::Value(map));

        repo.set("map", "{not json").await.unwrap();
        let corrupt: Stored<BTreeMap<i64, Vec<i64>>> = repo.load_json("map").await.unwrap();
        assert!(matches!(corrupt, Stored::Corrupt { ref raw, .. } if raw == "{not json"));
    }
}
