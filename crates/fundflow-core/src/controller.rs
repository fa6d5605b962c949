//! Analysis request lifecycle controller.
//!
//! Owns the [`AnalysisState`] and applies its transitions:
//!
//! 1. start: `busy = true`, previous result and error cleared
//! 2. one outbound call with the current identifier
//! 3. success: `result` = narrative
//! 4. failure: `error_message` = [`FAILURE_MESSAGE`], detail logged
//! 5. always: `busy = false`
//!
//! State is published through a `watch` channel so front ends can re-render
//! on every transition. A trigger while a request is outstanding is ignored,
//! so a late response can never overwrite a newer request's state.

use std::sync::Arc;

use tokio::sync::watch;
use tracing::{debug, info, info_span, warn, Instrument};
use uuid::Uuid;

use crate::backend::{AnalysisBackend, AnalysisRequest};
use crate::state::{AnalysisState, DEFAULT_IDENTIFIER};

/// The only failure text users ever see.
pub const FAILURE_MESSAGE: &str = "Analysis failed. Is the backend running?";

/// What happened to a trigger.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Dispatch {
    /// A request went out and has been resolved into the state.
    Completed,
    /// A request was already outstanding; nothing was sent.
    IgnoredWhileBusy,
}

/// Drives one analysis at a time against a backend.
pub struct AnalysisController {
    backend: Arc<dyn AnalysisBackend>,
    state: Arc<watch::Sender<AnalysisState>>,
}

impl AnalysisController {
    /// Controller with the default identifier in the input.
    pub fn new(backend: Arc<dyn AnalysisBackend>) -> Self {
        Self::with_identifier(backend, DEFAULT_IDENTIFIER)
    }

    pub fn with_identifier(backend: Arc<dyn AnalysisBackend>, identifier: impl Into<String>) -> Self {
        let (state, _rx) = watch::channel(AnalysisState::new(identifier));
        Self {
            backend,
            state: Arc::new(state),
        }
    }

    /// Snapshot of the current state.
    pub fn state(&self) -> AnalysisState {
        self.state.borrow().clone()
    }

    /// Receiver notified on every state transition.
    pub fn subscribe(&self) -> watch::Receiver<AnalysisState> {
        self.state.subscribe()
    }

    /// Replace the identifier. Never touches `busy`, `result` or `error_message`.
    pub fn on_identifier_changed(&self, value: impl Into<String>) {
        let value = value.into();
        self.state.send_modify(|state| state.identifier = value);
    }

    /// Run one analysis for the current identifier.
    ///
    /// Outcomes land in the state; the returned [`Dispatch`] only says whether
    /// a request was sent. Dropping the returned future mid-flight still
    /// clears `busy`.
    pub async fn on_analyze_requested(&self) -> Dispatch {
        match self.begin_analysis() {
            Some(pending) => {
                pending.run().await;
                Dispatch::Completed
            }
            None => Dispatch::IgnoredWhileBusy,
        }
    }

    /// Apply the start transition now and hand back the call to make.
    ///
    /// Returns `None` when a request is already outstanding. Front ends that
    /// must show the busy view before the call is polled (the web page
    /// redirects straight after triggering) spawn [`PendingAnalysis::run`].
    pub fn begin_analysis(&self) -> Option<PendingAnalysis> {
        let mut dispatched = None;
        self.state.send_if_modified(|state| {
            if state.busy {
                return false;
            }
            state.begin();
            dispatched = Some(state.identifier.clone());
            true
        });

        let Some(identifier) = dispatched else {
            debug!("Analysis already in flight, ignoring trigger");
            return None;
        };

        Some(PendingAnalysis {
            backend: self.backend.clone(),
            request_id: Uuid::new_v4(),
            request: AnalysisRequest::new(identifier),
            busy: BusyGuard {
                state: self.state.clone(),
                armed: true,
            },
        })
    }
}

/// A started analysis whose outbound call has not been made yet.
///
/// Dropping it at any point, before or during [`run`](Self::run), clears
/// `busy`.
pub struct PendingAnalysis {
    backend: Arc<dyn AnalysisBackend>,
    request_id: Uuid,
    request: AnalysisRequest,
    busy: BusyGuard,
}

impl PendingAnalysis {
    pub fn request_id(&self) -> Uuid {
        self.request_id
    }

    pub fn identifier(&self) -> &str {
        &self.request.identifier
    }

    /// Make the call and resolve its outcome into the state.
    pub async fn run(self) {
        let Self {
            backend,
            request_id,
            request,
            busy,
        } = self;
        let span = info_span!(
            "analysis",
            request_id = %request_id,
            identifier = %request.identifier
        );

        async move {
            info!("Dispatching analysis request");
            match backend.analyze(&request).await {
                Ok(response) => {
                    info!(chars = response.narrative.len(), "Analysis completed");
                    busy.resolve(|s| s.succeed(response.narrative));
                }
                Err(e) => {
                    warn!(kind = e.kind(), error = %e, "Analysis failed");
                    busy.resolve(|s| s.fail(FAILURE_MESSAGE));
                }
            }
        }
        .instrument(span)
        .await;
    }
}

/// Clears `busy` when the in-flight analysis goes away, however it goes.
struct BusyGuard {
    state: Arc<watch::Sender<AnalysisState>>,
    armed: bool,
}

impl BusyGuard {
    /// Publish the outcome and `busy = false` as a single transition.
    fn resolve(mut self, outcome: impl FnOnce(&mut AnalysisState)) {
        self.armed = false;
        self.state.send_modify(|state| {
            outcome(state);
            state.finish();
        });
    }
}

impl Drop for BusyGuard {
    fn drop(&mut self) {
        if self.armed {
            self.state.send_modify(AnalysisState::finish);
        }
    }
}
