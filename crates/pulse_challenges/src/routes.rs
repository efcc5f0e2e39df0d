use axum::{
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use tracing::info;

use crate::handlers::{
    answer_daily_handler, challenge_history_handler, complete_challenge_handler,
    current_challenge_handler, current_daily_handler, daily_archive_handler, ChallengeState,
};

pub fn routes(state: Arc<ChallengeState>) -> Router {
    info!("Challenge routes initialized");

    Router::new()
        .route("/challenges/current/{couple_id}", get(current_challenge_handler))
        .route("/challenges/complete", post(complete_challenge_handler))
        .route("/challenges/history/{couple_id}", get(challenge_history_handler))
        .route("/daily-challenge/current/{couple_id}", get(current_daily_handler))
        .route("/daily-challenge/answer", post(answer_daily_handler))
        .route("/daily-challenge/archive/{couple_id}", get(daily_archive_handler))
        .with_state(state)
}
