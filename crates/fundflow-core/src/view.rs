//! Page view derived from [`AnalysisState`].
//!
//! [`render`] is a pure function: the same state always yields the same view.
//! The busy, error and result sections are each gated on their own field.

use serde::Serialize;

use crate::markdown::{self, RichText};
use crate::state::AnalysisState;

pub const TITLE: &str = "Funds Advisor AI";
pub const SUBTITLE: &str = "Multi-Agent Mutual Fund Advisor";
pub const INPUT_PLACEHOLDER: &str = "Enter AMFI Code (e.g., 120503)";
pub const IDLE_LABEL: &str = "Analyze Fund";
pub const BUSY_LABEL: &str = "Agents Working...";

/// Stages the backend runs, in order, shown while a request is in flight.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PipelineStage {
    Scout,
    Quant,
    Advisor,
}

impl PipelineStage {
    pub const ALL: [PipelineStage; 3] = [Self::Scout, Self::Quant, Self::Advisor];

    pub fn agent(&self) -> &'static str {
        match self {
            Self::Scout => "Scout",
            Self::Quant => "Quant",
            Self::Advisor => "Advisor",
        }
    }

    pub fn icon(&self) -> &'static str {
        match self {
            Self::Scout => "📡",
            Self::Quant => "📊",
            Self::Advisor => "✍️",
        }
    }

    pub fn activity(&self) -> &'static str {
        match self {
            Self::Scout => "is fetching 3 years of data...",
            Self::Quant => "is calculating Alpha & Beta...",
            Self::Advisor => "is drafting your letter...",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct InputView {
    pub value: String,
    pub placeholder: &'static str,
    pub editable: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ActionView {
    pub label: &'static str,
    pub disabled: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BusyView {
    pub stages: Vec<PipelineStage>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ErrorView {
    pub message: String,
}

/// The narrative, both parsed and as HTML.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResultView {
    pub markdown: String,
    pub rich_text: RichText,
    pub html: String,
}

/// Everything a front end draws.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PageView {
    pub title: &'static str,
    pub subtitle: &'static str,
    pub input: InputView,
    pub action: ActionView,
    pub busy: Option<BusyView>,
    pub error: Option<ErrorView>,
    pub result: Option<ResultView>,
}

pub fn render(state: &AnalysisState) -> PageView {
    let busy = state.busy.then(|| BusyView {
        stages: PipelineStage::ALL.to_vec(),
    });

    let error = state.has_error().then(|| ErrorView {
        message: state.error_message.clone(),
    });

    let result = state.has_result().then(|| ResultView {
        markdown: state.result.clone(),
        rich_text: RichText::parse(&state.result),
        html: markdown::to_html(&state.result),
    });

    PageView {
        title: TITLE,
        subtitle: SUBTITLE,
        input: InputView {
            value: state.identifier.clone(),
            placeholder: INPUT_PLACEHOLDER,
            editable: true,
        },
        action: ActionView {
            label: if state.busy { BUSY_LABEL } else { IDLE_LABEL },
            disabled: state.busy,
        },
        busy,
        error,
        result,
    }
}
