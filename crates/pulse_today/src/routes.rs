use axum::{
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use tracing::info;

use crate::handlers::{
    get_today_handler, history_day_handler, history_handler, react_handler, update_today_handler,
    TodayState,
};

pub fn routes(state: Arc<TodayState>) -> Router {
    info!("Today routes initialized");

    Router::new()
        .route(
            "/today/{couple_id}",
            get(get_today_handler).post(update_today_handler),
        )
        .route("/today/{couple_id}/react", post(react_handler))
        .route("/history/{couple_id}", get(history_handler))
        .route("/history/{couple_id}/{date}", get(history_day_handler))
        .with_state(state)
}
