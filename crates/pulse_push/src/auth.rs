//! OAuth2 access tokens for the FCM HTTP v1 API.

use pulse_common::services::BoxFuture;
use std::path::Path;
use yup_oauth2::{read_service_account_key, ServiceAccountAuthenticator};

use crate::error::PushError;

pub const FCM_SCOPE: &str = "https://www.googleapis.com/auth/firebase.messaging";

/// Supplies bearer tokens for FCM requests.
pub trait TokenSource: Send + Sync {
    fn token(&self) -> BoxFuture<'_, String, PushError>;
}

/// Tokens minted from a Google service-account key file.
#[derive(Debug, Clone)]
pub struct ServiceAccountTokenSource {
    key_path: String,
}

impl ServiceAccountTokenSource {
    pub fn new(key_path: impl Into<String>) -> Self {
        Self {
            key_path: key_path.into(),
        }
    }
}

impl TokenSource for ServiceAccountTokenSource {
    fn token(&self) -> BoxFuture<'_, String, PushError> {
        Box::pin(async move {
            let sa_key = read_service_account_key(Path::new(&self.key_path))
                .await
                .map_err(|e| PushError::Auth(format!("Cannot read service account key: {e}")))?;

            let auth = ServiceAccountAuthenticator::builder(sa_key)
                .build()
                .await
                .map_err(|e| PushError::Auth(e.to_string()))?;

            let access = auth
                .token(&[FCM_SCOPE])
                .await
                .map_err(|e| PushError::Auth(e.to_string()))?;

            access
                .token()
                .map(str::to_string)
                .ok_or_else(|| PushError::Auth("No token available".to_string()))
        })
    }
}

/// A fixed token, for tests and local emulators.
#[derive(Debug, Clone)]
pub struct StaticTokenSource(pub String);

impl TokenSource for StaticTokenSource {
    fn token(&self) -> BoxFuture<'_, String, PushError> {
        let token = self.0.clone();
        Box::pin(async move { Ok(token) })
    }
}
