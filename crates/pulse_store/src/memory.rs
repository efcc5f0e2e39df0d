use serde_json::Value;
use std::collections::BTreeMap;
use std::ops::Bound;
use tokio::sync::RwLock;
use tracing::trace;

use crate::error::StoreError;
use crate::store::KvStore;
use pulse_common::services::BoxFuture;

/// In-process store backed by an ordered map.
#[derive(Debug, Default)]
pub struct MemoryKvStore {
    entries: RwLock<BTreeMap<String, Value>>,
}

impl MemoryKvStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn len(&self) -> usize {
        self.entries.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.entries.read().await.is_empty()
    }
}

impl KvStore for MemoryKvStore {
    fn get<'a>(&'a self, key: &'a str) -> BoxFuture<'a, Option<Value>, StoreError> {
        Box::pin(async move {
            trace!("memory get {}", key);
            Ok(self.entries.read().await.get(key).cloned())
        })
    }

    fn set<'a>(&'a self, key: &'a str, value: Value) -> BoxFuture<'a, (), StoreError> {
        Box::pin(async move {
            trace!("memory set {}", key);
            self.entries.write().await.insert(key.to_string(), value);
            Ok(())
        })
    }

    fn delete<'a>(&'a self, key: &'a str) -> BoxFuture<'a, bool, StoreError> {
        Box::pin(async move {
            trace!("memory delete {}", key);
            Ok(self.entries.write().await.remove(key).is_some())
        })
    }

    fn scan_prefix<'a>(
        &'a self,
        prefix: &'a str,
    ) -> BoxFuture<'a, Vec<(String, Value)>, StoreError> {
        Box::pin(async move {
            let entries = self.entries.read().await;
            let found = entries
                .range::<str, _>((Bound::Included(prefix), Bound::Unbounded))
                .take_while(|(k, _)| k.starts_with(prefix))
                .map(|(k, v)| (k.clone(), v.clone()))
                .collect::<Vec<_>>();
            trace!("memory scan {} -> {} entries", prefix, found.len());
            Ok(found)
        })
    }
}
