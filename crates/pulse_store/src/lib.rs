//! Key-value storage for the Pulse backend.
//!
//! Every domain record is a JSON document under a string key. Two backends implement
//! [`KvStore`]:
//!
//! - [`MemoryKvStore`]: an ordered in-process map, used when no database is configured and in tests
//! - [`SqlKvStore`]: a single `kv_store` table behind an SQLx `Any` pool (SQLite by default)
//!
//! The store offers single-key atomicity only. Multi-key operations are ordered by callers.
//!
//! # Example
//!
//! ```rust,no_run
//! use pulse_store::{put_json, get_json, MemoryKvStore, KvStore};
//!
//! async fn demo() -> Result<(), pulse_store::StoreError> {
//!     let store = MemoryKvStore::new();
//!     put_json(&store, "user:1", &"hello").await?;
//!     let value: Option<String> = get_json(&store, "user:1").await?;
//!     assert_eq!(value.as_deref(), Some("hello"));
//!     Ok(())
//! }
//! ```

pub mod client;
pub mod error;
pub mod factory;
pub mod memory;
pub mod sql;
pub mod store;
pub mod typed;

pub use client::DbClient;
pub use error::StoreError;
pub use factory::StoreFactory;
pub use memory::MemoryKvStore;
pub use sql::SqlKvStore;
pub use store::{KvStore, SharedStore};
pub use typed::{get_json, put_json, scan_json};
