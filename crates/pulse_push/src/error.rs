use pulse_common::PulseError;
use pulse_store::StoreError;
use thiserror::Error;

/// Errors that can occur when delivering push messages
#[derive(Error, Debug)]
pub enum PushError {
    /// Error during authentication with Firebase
    #[error("Authentication error: {0}")]
    Auth(String),

    /// Error during HTTP request to the FCM API
    #[error("HTTP request error: {0}")]
    Request(#[from] reqwest::Error),

    /// Missing required configuration
    #[error("Missing configuration: {0}")]
    Config(String),

    /// Non-success answer from the FCM API
    #[error("FCM API error ({status}): {body}")]
    Api { status: u16, body: String },

    #[error(transparent)]
    Store(#[from] StoreError),
}

impl PushError {
    /// FCM answers 404 or 410 for tokens that will never work again.
    pub fn is_unregistered(&self) -> bool {
        matches!(self, PushError::Api { status: 404 | 410, .. })
    }
}

impl From<PushError> for PulseError {
    fn from(err: PushError) -> Self {
        match err {
            PushError::Config(msg) => PulseError::Config(msg),
            PushError::Store(e) => e.into(),
            other => pulse_common::external_service_error("fcm", other),
        }
    }
}
