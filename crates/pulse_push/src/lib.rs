//! Push delivery for Aimo Pulse.
//!
//! Devices register FCM tokens per user. [`FcmPushService`] implements the shared
//! `PushService` seam by sending to every active device of the receiver through the FCM
//! HTTP v1 API and revoking tokens FCM no longer recognises.

pub mod auth;
pub mod client;
#[cfg(feature = "openapi")]
pub mod doc;
pub mod error;
pub mod factory;
pub mod handlers;
pub mod keys;
pub mod models;
pub mod repository;
pub mod routes;
pub mod service;

pub use error::PushError;
pub use factory::push_service_from_config;
pub use handlers::PushState;
pub use models::DeviceRegistration;
pub use repository::DeviceRegistry;
pub use routes::routes;
pub use service::FcmPushService;

#[cfg(feature = "openapi")]
pub mod openapi {
    pub use crate::doc::PushApiDoc;
}
