use axum::{
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use tracing::info;

use crate::handlers::{
    activate_handler, deactivate_handler, extend_handler, history_handler, reassurance_handler,
    status_handler, update_note_handler, SharkState,
};

pub fn routes(state: Arc<SharkState>) -> Router {
    info!("Shark mode routes initialized");

    Router::new()
        .route("/shark-mode/activate", post(activate_handler))
        .route("/shark-mode/extend", post(extend_handler))
        .route("/shark-mode/deactivate", post(deactivate_handler))
        .route("/shark-mode/update-note", post(update_note_handler))
        .route("/shark-mode/reassurance", post(reassurance_handler))
        .route("/shark-mode/status/{couple_id}", get(status_handler))
        .route("/shark-mode/history/{couple_id}", get(history_handler))
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::service::SharkModeService;
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use pulse_common::SystemClock;
    use pulse_pairing::CoupleDirectory;
    use pulse_store::{MemoryKvStore, SharedStore};
    use tower::ServiceExt;

    fn app() -> Router {
        let store: SharedStore = Arc::new(MemoryKvStore::new());
        let shark = SharkModeService::new(
            store.clone(),
            Arc::new(SystemClock),
            CoupleDirectory::new(store),
            7,
        );
        routes(Arc::new(SharkState { shark }))
    }

    #[tokio::test]
    async fn test_status_without_record_is_null() {
        let response = app()
            .oneshot(
                Request::builder()
                    .uri("/shark-mode/status/c1")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(json, serde_json::json!({ "sharkMode": null }));
    }

    #[tokio::test]
    async fn test_activate_out_of_range_is_400() {
        let response = app()
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/shark-mode/activate")
                    .header("content-type", "application/json")
                    .body(Body::from(
                        r#"{"coupleId":"c1","userId":"u1","durationDays":9}"#,
                    ))
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }
}
