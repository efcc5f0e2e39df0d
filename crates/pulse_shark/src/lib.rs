#[cfg(feature = "openapi")]
pub mod doc;
pub mod handlers;
pub mod keys;
pub mod models;
pub mod routes;
pub mod service;

pub use handlers::SharkState;
pub use models::{effective_status, SharkMode, SharkStatus};
pub use routes::routes;
pub use service::SharkModeService;

#[cfg(feature = "openapi")]
pub mod openapi {
    pub use crate::doc::SharkApiDoc;
}
