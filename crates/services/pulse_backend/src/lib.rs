//! The Aimo Pulse HTTP application: every feature router nested under `/api`.

pub mod app_state;
pub mod service_factory;

use axum::http::HeaderValue;
use axum::Router;
use pulse_config::CorsConfig;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::warn;

pub use app_state::AppState;
pub use service_factory::PulseServiceFactory;

fn cors_layer(config: &CorsConfig) -> CorsLayer {
    let layer = CorsLayer::new().allow_methods(Any).allow_headers(Any);

    if config.allowed_origins.is_empty() || config.allowed_origins.iter().any(|o| o == "*") {
        return layer.allow_origin(AllowOrigin::any());
    }

    let origins: Vec<HeaderValue> = config
        .allowed_origins
        .iter()
        .filter_map(|origin| match HeaderValue::from_str(origin) {
            Ok(value) => Some(value),
            Err(_) => {
                warn!("Ignoring invalid CORS origin {:?}", origin);
                None
            }
        })
        .collect();
    layer.allow_origin(AllowOrigin::list(origins))
}

pub fn build_router(state: &AppState) -> Router {
    let api = Router::new()
        .merge(pulse_common::routes())
        .merge(pulse_pairing::routes(state.pairing.clone()))
        .merge(pulse_today::routes(state.today.clone()))
        .merge(pulse_notify::routes(state.notify.clone()))
        .merge(pulse_challenges::routes(state.challenges.clone()))
        .merge(pulse_shark::routes(state.shark.clone()))
        .merge(pulse_push::routes(state.push.clone()));

    #[allow(unused_mut)] // only mutated with the openapi feature
    let mut app = Router::new().nest("/api", api);

    #[cfg(feature = "openapi")]
    {
        app = app.merge(swagger_ui());
    }

    app.layer(cors_layer(&state.config.cors))
        .layer(TraceLayer::new_for_http())
}

#[cfg(feature = "openapi")]
fn swagger_ui() -> utoipa_swagger_ui::SwaggerUi {
    use tracing::info;
    use utoipa::OpenApi;
    use utoipa_swagger_ui::SwaggerUi;

    #[derive(OpenApi)]
    #[openapi(
        info(
            title = "Aimo Pulse API",
            version = "0.1.0",
            description = "Mood sharing for couples"
        ),
        servers((url = "/api", description = "Main API Prefix")),
    )]
    struct ApiDoc;

    let mut doc = ApiDoc::openapi();
    doc.merge(pulse_pairing::openapi::PairingApiDoc::openapi());
    doc.merge(pulse_today::openapi::TodayApiDoc::openapi());
    doc.merge(pulse_notify::openapi::NotifyApiDoc::openapi());
    doc.merge(pulse_challenges::openapi::ChallengeApiDoc::openapi());
    doc.merge(pulse_shark::openapi::SharkApiDoc::openapi());
    doc.merge(pulse_push::openapi::PushApiDoc::openapi());

    info!("Swagger UI available at /api/docs");
    SwaggerUi::new("/api/docs").url("/api/docs/openapi.json", doc)
}
