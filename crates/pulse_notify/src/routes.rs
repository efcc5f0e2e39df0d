use axum::{
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use tracing::info;

use crate::handlers::{
    doodle_update_handler, list_handler, mark_read_handler, message_update_handler,
    mood_update_handler, nudge_handler, NotifyState,
};

pub fn routes(state: Arc<NotifyState>) -> Router {
    info!("Notification routes initialized");

    Router::new()
        .route("/notifications/nudge", post(nudge_handler))
        .route("/notifications/mood-update", post(mood_update_handler))
        .route("/notifications/message-update", post(message_update_handler))
        .route("/notifications/doodle-update", post(doodle_update_handler))
        .route("/notifications/{id}", get(list_handler))
        .route("/notifications/{id}/read", post(mark_read_handler))
        .with_state(state)
}
