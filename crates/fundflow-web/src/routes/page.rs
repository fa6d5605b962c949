//! Single-page HTML handlers.
//!
//! The page is rendered server-side from the controller state on every
//! request. While an analysis is in flight the page refreshes itself.

use askama::Template;
use axum::{
    extract::State,
    http::StatusCode,
    response::{Html, IntoResponse, Redirect, Response},
    Form,
};
use fundflow_core::{render, view::PageView};
use serde::Deserialize;
use tracing::{debug, error};

use crate::state::AppState;

/// Seconds between page refreshes while busy.
const BUSY_REFRESH_SECS: u32 = 3;

// ============================================================
// TEMPLATES
// ============================================================

#[derive(Template)]
#[template(path = "index.html")]
struct IndexTemplate {
    title: &'static str,
    subtitle: &'static str,
    identifier: String,
    placeholder: &'static str,
    button_label: &'static str,
    button_disabled: bool,
    refresh_secs: Option<u32>,
    stages: Vec<StageLine>,
    error: Option<String>,
    result_html: Option<String>,
}

/// View model for one busy-indicator line.
struct StageLine {
    icon: &'static str,
    agent: &'static str,
    activity: &'static str,
}

impl IndexTemplate {
    fn from_view(view: PageView) -> Self {
        let stages = view
            .busy
            .as_ref()
            .map(|busy| {
                busy.stages
                    .iter()
                    .map(|stage| StageLine {
                        icon: stage.icon(),
                        agent: stage.agent(),
                        activity: stage.activity(),
                    })
                    .collect()
            })
            .unwrap_or_default();

        Self {
            title: view.title,
            subtitle: view.subtitle,
            identifier: view.input.value,
            placeholder: view.input.placeholder,
            button_label: view.action.label,
            button_disabled: view.action.disabled,
            refresh_secs: view.busy.map(|_| BUSY_REFRESH_SECS),
            stages,
            error: view.error.map(|e| e.message),
            result_html: view.result.map(|r| r.html),
        }
    }
}

// ============================================================
// REQUEST TYPES
// ============================================================

#[derive(Deserialize)]
pub struct AnalyzeForm {
    pub scheme_code: String,
}

// ============================================================
// HANDLERS
// ============================================================

/// GET / - Render the page from the current state.
pub async fn index(State(state): State<AppState>) -> Response {
    let page = IndexTemplate::from_view(render(&state.controller.state()));
    match page.render() {
        Ok(html) => Html(html).into_response(),
        Err(e) => {
            error!(error = %e, "Failed to render page");
            (StatusCode::INTERNAL_SERVER_ERROR, "Failed to render page").into_response()
        }
    }
}

/// POST /analyze - Apply the submitted identifier and start an analysis.
///
/// The start transition is applied before redirecting, so the page the
/// browser lands on already shows the busy view.
pub async fn analyze(State(state): State<AppState>, Form(form): Form<AnalyzeForm>) -> Redirect {
    let controller = &state.controller;
    controller.on_identifier_changed(form.scheme_code);

    match controller.begin_analysis() {
        Some(pending) => {
            debug!(request_id = %pending.request_id(), "Spawning analysis");
            tokio::spawn(pending.run());
        }
        None => debug!("Analysis already running, trigger ignored"),
    }

    Redirect::to("/")
}
