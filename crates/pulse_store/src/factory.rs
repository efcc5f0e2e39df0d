//! Chooses the store backend from configuration.

use crate::client::DbClient;
use crate::error::StoreError;
use crate::memory::MemoryKvStore;
use crate::sql::SqlKvStore;
use crate::store::SharedStore;
use pulse_config::AppConfig;
use std::sync::Arc;
use tracing::info;

#[derive(Debug, Clone, Default)]
pub struct StoreFactory;

impl StoreFactory {
    pub fn new() -> Self {
        Self
    }

    /// SQL store with its schema ensured when `database` is configured, memory store otherwise.
    pub async fn from_app_config(&self, config: &AppConfig) -> Result<SharedStore, StoreError> {
        match config.database.as_ref() {
            Some(db_config) => {
                let client = DbClient::from_config(db_config).await?;
                let store = SqlKvStore::new(client);
                store.init_schema().await?;
                info!("Using SQL key-value store");
                Ok(Arc::new(store))
            }
            None => {
                info!("No database configured, using in-memory key-value store");
                Ok(Arc::new(MemoryKvStore::new()))
            }
        }
    }
}
