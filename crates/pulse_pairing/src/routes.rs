use axum::{
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use tracing::info;

use crate::handlers::{
    create_user_handler, current_code_handler, generate_code_handler, get_couple_handler,
    get_user_handler, join_handler, login_handler, reset_password_handler, unpair_handler,
    PairingState,
};

/// Routes for users, pairing codes and couples.
pub fn routes(state: Arc<PairingState>) -> Router {
    info!("Pairing routes initialized");

    Router::new()
        .route("/users/create", post(create_user_handler))
        .route("/users/login", post(login_handler))
        .route("/users/reset-password", post(reset_password_handler))
        .route("/users/{user_id}", get(get_user_handler))
        .route("/pairing/generate", post(generate_code_handler))
        .route("/pairing/join", post(join_handler))
        .route("/pairing/{user_id}", get(current_code_handler))
        .route(
            "/couples/{user_id}",
            get(get_couple_handler).delete(unpair_handler),
        )
        .with_state(state)
}
