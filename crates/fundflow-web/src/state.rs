//! Application state.

use fundflow_core::AnalysisController;
use std::sync::Arc;

/// Application state shared across handlers.
#[derive(Clone)]
pub struct AppState {
    pub controller: Arc<AnalysisController>,
}

impl AppState {
    pub fn new(controller: Arc<AnalysisController>) -> Self {
        Self { controller }
    }
}
