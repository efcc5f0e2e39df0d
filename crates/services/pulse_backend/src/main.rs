use pulse_backend::{build_router, AppState, PulseServiceFactory};
use pulse_config::load_config;
use std::error::Error;
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::info;

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    let config = Arc::new(load_config()?);
    let _log_guard = pulse_common::init_with_config(&config.logging);

    let factory = PulseServiceFactory::new(config.clone()).await?;
    let app = build_router(&AppState::new(&factory));

    let addr = format!("{}:{}", config.server.host, config.server.port);
    let listener = TcpListener::bind(&addr).await?;
    info!("Starting server at http://{}", addr);
    info!("API endpoints available at http://{}/api", addr);

    axum::serve(listener, app.into_make_service()).await?;
    Ok(())
}
