//! serde conversions on top of [`KvStore`].

use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::error::StoreError;
use crate::store::KvStore;

pub async fn get_json<T: DeserializeOwned>(
    store: &dyn KvStore,
    key: &str,
) -> Result<Option<T>, StoreError> {
    match store.get(key).await? {
        Some(value) => Ok(Some(serde_json::from_value(value)?)),
        None => Ok(None),
    }
}

pub async fn put_json<T: Serialize + ?Sized>(
    store: &dyn KvStore,
    key: &str,
    value: &T,
) -> Result<(), StoreError> {
    let value = serde_json::to_value(value)?;
    store.set(key, value).await
}

/// Every document under `prefix`, decoded, in key order.
pub async fn scan_json<T: DeserializeOwned>(
    store: &dyn KvStore,
    prefix: &str,
) -> Result<Vec<T>, StoreError> {
    store
        .scan_prefix(prefix)
        .await?
        .into_iter()
        .map(|(_, value)| serde_json::from_value(value).map_err(StoreError::from))
        .collect()
}
