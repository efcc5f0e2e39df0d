//! Service abstractions for external collaborators.
//!
//! The only collaborator the core talks to is push delivery. Keeping it behind a trait lets
//! the backend pick FCM or a no-op at startup and lets tests record what would be sent.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

use crate::error::PulseError;

/// Type alias for a boxed future that returns a Result
pub type BoxFuture<'a, T, E> = Pin<Box<dyn Future<Output = Result<T, E>> + Send + 'a>>;

/// A push message addressed to every device of one user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PushPayload {
    pub title: String,
    pub body: String,
    /// Collapses repeated notifications of the same kind on the device.
    pub tag: String,
    pub data: BTreeMap<String, String>,
}

/// Outcome of one fan-out to a user's devices.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PushReport {
    pub delivered: usize,
    pub failed: usize,
    pub revoked: usize,
}

/// Best-effort push delivery.
///
/// Callers treat every error as non-fatal: they log it and carry on.
pub trait PushService: Send + Sync {
    fn send_to_user<'a>(
        &'a self,
        user_id: &'a str,
        payload: PushPayload,
    ) -> BoxFuture<'a, PushReport, PulseError>;
}

pub type SharedPushService = Arc<dyn PushService>;

/// Used when push is disabled in configuration.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopPushService;

impl PushService for NoopPushService {
    fn send_to_user<'a>(
        &'a self,
        _user_id: &'a str,
        _payload: PushPayload,
    ) -> BoxFuture<'a, PushReport, PulseError> {
        Box::pin(async { Ok(PushReport::default()) })
    }
}

/// Test doubles. Public so other crates' tests can use them.
pub mod mock {
    use super::*;
    use std::sync::Mutex;

    /// Records every payload it is asked to send; optionally fails every call.
    #[derive(Debug, Default)]
    pub struct RecordingPushService {
        sent: Mutex<Vec<(String, PushPayload)>>,
        fail: bool,
    }

    impl RecordingPushService {
        pub fn new() -> Self {
            Self::default()
        }

        /// A service that records the attempt and then returns an external-service error.
        pub fn failing() -> Self {
            Self {
                sent: Mutex::new(Vec::new()),
                fail: true,
            }
        }

        pub fn sent(&self) -> Vec<(String, PushPayload)> {
            self.sent.lock().unwrap_or_else(|p| p.into_inner()).clone()
        }
    }

    impl PushService for RecordingPushService {
        fn send_to_user<'a>(
            &'a self,
            user_id: &'a str,
            payload: PushPayload,
        ) -> BoxFuture<'a, PushReport, PulseError> {
            Box::pin(async move {
                self.sent
                    .lock()
                    .unwrap_or_else(|p| p.into_inner())
                    .push((user_id.to_string(), payload));
                if self.fail {
                    return Err(crate::error::external_service_error(
                        "push",
                        "simulated delivery failure",
                    ));
                }
                Ok(PushReport {
                    delivered: 1,
                    ..PushReport::default()
                })
            })
        }
    }
}
