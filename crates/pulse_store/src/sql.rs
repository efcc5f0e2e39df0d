//! SQL implementation of the key-value store
//!
//! One table, `kv_store(key TEXT PRIMARY KEY, value TEXT NOT NULL)`, with JSON text values.

use crate::client::DbClient;
use crate::error::StoreError;
use crate::store::KvStore;
use pulse_common::services::BoxFuture;
use serde_json::Value;
use sqlx::Row;
use tracing::{debug, error, info};

#[derive(Debug, Clone)]
pub struct SqlKvStore {
    db_client: DbClient,
}

impl SqlKvStore {
    pub fn new(db_client: DbClient) -> Self {
        Self { db_client }
    }

    pub async fn init_schema(&self) -> Result<(), StoreError> {
        debug!("Initializing kv_store schema");

        let query = r#"
            CREATE TABLE IF NOT EXISTS kv_store (
                key TEXT PRIMARY KEY,
                value TEXT NOT NULL
            )
        "#;
        self.db_client.execute(query).await?;

        info!("kv_store schema initialized successfully");
        Ok(())
    }
}

/// Escapes LIKE wildcards so a key prefix matches literally (escape char is `\`).
fn like_pattern(prefix: &str) -> String {
    let mut pattern = String::with_capacity(prefix.len() + 1);
    for c in prefix.chars() {
        if matches!(c, '%' | '_' | '\\') {
            pattern.push('\\');
        }
        pattern.push(c);
    }
    pattern.push('%');
    pattern
}

fn decode(key: &str, raw: &str) -> Result<Value, StoreError> {
    serde_json::from_str(raw).map_err(|e| {
        error!("Stored value for {} is not valid JSON: {}", key, e);
        StoreError::Serialization(e)
    })
}

impl KvStore for SqlKvStore {
    fn get<'a>(&'a self, key: &'a str) -> BoxFuture<'a, Option<Value>, StoreError> {
        Box::pin(async move {
            debug!("sql get {}", key);
            let row = sqlx::query("SELECT value FROM kv_store WHERE key = $1")
                .bind(key)
                .fetch_optional(self.db_client.pool())
                .await
                .map_err(|e| {
                    error!("Failed to read key {}: {}", key, e);
                    StoreError::Query(e.to_string())
                })?;

            match row {
                Some(row) => {
                    let raw: String = row.try_get("value")?;
                    Ok(Some(decode(key, &raw)?))
                }
                None => Ok(None),
            }
        })
    }

    fn set<'a>(&'a self, key: &'a str, value: Value) -> BoxFuture<'a, (), StoreError> {
        Box::pin(async move {
            debug!("sql set {}", key);
            let raw = serde_json::to_string(&value)?;
            sqlx::query(
                r#"
                INSERT INTO kv_store (key, value) VALUES ($1, $2)
                ON CONFLICT(key) DO UPDATE SET value = excluded.value
                "#,
            )
            .bind(key)
            .bind(raw)
            .execute(self.db_client.pool())
            .await
            .map_err(|e| {
                error!("Failed to write key {}: {}", key, e);
                StoreError::Query(e.to_string())
            })?;
            Ok(())
        })
    }

    fn delete<'a>(&'a self, key: &'a str) -> BoxFuture<'a, bool, StoreError> {
        Box::pin(async move {
            debug!("sql delete {}", key);
            let result = sqlx::query("DELETE FROM kv_store WHERE key = $1")
                .bind(key)
                .execute(self.db_client.pool())
                .await
                .map_err(|e| {
                    error!("Failed to delete key {}: {}", key, e);
                    StoreError::Query(e.to_string())
                })?;
            Ok(result.rows_affected() > 0)
        })
    }

    fn scan_prefix<'a>(
        &'a self,
        prefix: &'a str,
    ) -> BoxFuture<'a, Vec<(String, Value)>, StoreError> {
        Box::pin(async move {
            debug!("sql scan {}", prefix);
            let rows = sqlx::query(
                r#"SELECT key, value FROM kv_store WHERE key LIKE $1 ESCAPE '\' ORDER BY key"#,
            )
            .bind(like_pattern(prefix))
            .fetch_all(self.db_client.pool())
            .await
            .map_err(|e| {
                error!("Failed to scan prefix {}: {}", prefix, e);
                StoreError::Query(e.to_string())
            })?;

            let mut found = Vec::with_capacity(rows.len());
            for row in rows {
                let key: String = row.try_get("key")?;
                // SQLite's LIKE ignores ASCII case.
                if !key.starts_with(prefix) {
                    continue;
                }
                let raw: String = row.try_get("value")?;
                let value = decode(&key, &raw)?;
                found.push((key, value));
            }
            Ok(found)
        })
    }
}
