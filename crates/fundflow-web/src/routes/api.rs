//! JSON routes.

use axum::{extract::State, Json};
use fundflow_core::{render, PageView};

use crate::state::AppState;

/// GET /api/state - The current page view.
pub async fn get_state(State(state): State<AppState>) -> Json<PageView> {
    Json(render(&state.controller.state()))
}

/// GET /health - Liveness probe.
pub async fn health() -> &'static str {
    "ok"
}
