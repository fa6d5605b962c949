//! FundFlow Web Front End
//!
//! Axum server for the single-page analysis client.

pub mod routes;
pub mod state;

use axum::{
    routing::{get, post},
    Router,
};
use fundflow_core::AnalysisController;
use std::sync::Arc;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use state::AppState;

/// Create the application router.
pub fn create_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let api_routes = Router::new()
        .route("/state", get(routes::api::get_state))
        .with_state(state.clone());

    Router::new()
        .route("/", get(routes::page::index))
        .route("/analyze", post(routes::page::analyze))
        .route("/health", get(routes::api::health))
        .nest("/api", api_routes)
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}

/// Run the web server.
pub async fn run_server(controller: Arc<AnalysisController>, host: &str, port: u16) -> anyhow::Result<()> {
    let state = AppState::new(controller);
    let app = create_router(state);

    let listener = tokio::net::TcpListener::bind(format!("{}:{}", host, port)).await?;
    tracing::info!("Web server listening on http://{}:{}", host, port);

    axum::serve(listener, app).await?;
    Ok(())
}
