//! Analysis lifecycle state.

use serde::{Deserialize, Serialize};

/// Scheme code shown in the input when the client starts (Axis Bluechip).
pub const DEFAULT_IDENTIFIER: &str = "120503";

/// Everything the page needs to render itself.
///
/// At most one of `result` and `error_message` is non-empty, and `busy` only
/// holds between dispatch and resolution of a request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnalysisState {
    pub identifier: String,
    pub busy: bool,
    pub result: String,
    pub error_message: String,
}

impl AnalysisState {
    pub fn new(identifier: impl Into<String>) -> Self {
        Self {
            identifier: identifier.into(),
            busy: false,
            result: String::new(),
            error_message: String::new(),
        }
    }

    /// Start phase: mark busy and clear the previous outcome.
    pub(crate) fn begin(&mut self) {
        self.busy = true;
        self.error_message.clear();
        self.result.clear();
    }

    pub(crate) fn succeed(&mut self, narrative: String) {
        self.error_message.clear();
        self.result = narrative;
    }

    pub(crate) fn fail(&mut self, message: &str) {
        self.result.clear();
        self.error_message = message.to_string();
    }

    pub(crate) fn finish(&mut self) {
        self.busy = false;
    }

    pub fn has_result(&self) -> bool {
        !self.result.is_empty()
    }

    pub fn has_error(&self) -> bool {
        !self.error_message.is_empty()
    }
}

impl Default for AnalysisState {
    fn default() -> Self {
        Self::new(DEFAULT_IDENTIFIER)
    }
}
