//! Error types for the key-value store

use pulse_common::PulseError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum StoreError {
    /// Error from SQLx
    #[error("Database error: {0}")]
    Sqlx(#[from] sqlx::Error),

    /// A stored document could not be (de)serialized
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Error with the database configuration
    #[error("Database configuration error: {0}")]
    Config(String),

    /// Error with database pool creation
    #[error("Database pool error: {0}")]
    Pool(String),

    /// Error with database query
    #[error("Database query error: {0}")]
    Query(String),
}

impl From<StoreError> for PulseError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::Config(msg) => PulseError::Config(msg),
            other => PulseError::Storage(other.to_string()),
        }
    }
}
