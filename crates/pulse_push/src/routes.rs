use axum::{routing::post, Router};
use std::sync::Arc;
use tracing::info;

use crate::handlers::{register_device_handler, unregister_device_handler, PushState};

pub fn routes(state: Arc<PushState>) -> Router {
    info!("Push routes initialized");

    Router::new()
        .route("/push/register-device", post(register_device_handler))
        .route("/push/unregister-device", post(unregister_device_handler))
        .with_state(state)
}
