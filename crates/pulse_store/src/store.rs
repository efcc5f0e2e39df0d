use pulse_common::services::BoxFuture;
use serde_json::Value;
use std::sync::Arc;

use crate::error::StoreError;

/// A durable map from string key to JSON document.
///
/// Each call is atomic on its own key; there are no transactions.
pub trait KvStore: Send + Sync {
    fn get<'a>(&'a self, key: &'a str) -> BoxFuture<'a, Option<Value>, StoreError>;

    /// Inserts or replaces the document under `key`.
    fn set<'a>(&'a self, key: &'a str, value: Value) -> BoxFuture<'a, (), StoreError>;

    /// Returns whether a document was removed.
    fn delete<'a>(&'a self, key: &'a str) -> BoxFuture<'a, bool, StoreError>;

    /// All entries whose key starts with `prefix`, ordered by key.
    fn scan_prefix<'a>(
        &'a self,
        prefix: &'a str,
    ) -> BoxFuture<'a, Vec<(String, Value)>, StoreError>;
}

pub type SharedStore = Arc<dyn KvStore>;
