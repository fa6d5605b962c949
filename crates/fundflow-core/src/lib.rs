//! FundFlow Core Library
//!
//! Lifecycle of a single fund analysis request: input handling, dispatch to
//! the analysis backend, in-flight status and the rendered page view.

pub mod backend;
pub mod config;
pub mod controller;
pub mod error;
pub mod markdown;
pub mod state;
pub mod view;

pub use backend::{AnalysisBackend, AnalysisRequest, AnalysisResponse, HttpBackend};
pub use config::FundflowConfig;
pub use controller::{AnalysisController, Dispatch, PendingAnalysis, FAILURE_MESSAGE};
pub use error::{BackendError, FundflowError, FundflowResult};
pub use state::{AnalysisState, DEFAULT_IDENTIFIER};
pub use view::{render, PageView};
