//! Notification fan-out for Aimo Pulse.
//!
//! Nudges and mood, message and doodle updates become a stored notification addressed to
//! the sender's partner plus a best-effort push. Callers send these separately from the
//! Today Card update they describe.

#[cfg(feature = "openapi")]
pub mod doc;
pub mod handlers;
pub mod keys;
pub mod models;
pub mod notifier;
pub mod push;
pub mod routes;

pub use handlers::NotifyState;
pub use models::{Notification, NotificationKind};
pub use notifier::NotificationService;
pub use routes::routes;

#[cfg(feature = "openapi")]
pub mod openapi {
    pub use crate::doc::NotifyApiDoc;
}
