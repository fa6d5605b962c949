//! Analysis backend collaborator.
//!
//! The backend runs the multi-agent pipeline (data scout, quant, advisor) and
//! answers with a Markdown recommendation letter. The client only knows the
//! request and response payloads below.

mod http;

pub use http::HttpBackend;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::BackendError;

/// Outbound payload for one analysis.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnalysisRequest {
    #[serde(rename = "scheme_code")]
    pub identifier: String,
}

impl AnalysisRequest {
    pub fn new(identifier: impl Into<String>) -> Self {
        Self {
            identifier: identifier.into(),
        }
    }
}

/// Successful response body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnalysisResponse {
    #[serde(rename = "result")]
    pub narrative: String,
}

/// Something that can run an analysis for an identifier.
#[async_trait]
pub trait AnalysisBackend: Send + Sync {
    async fn analyze(&self, request: &AnalysisRequest) -> Result<AnalysisResponse, BackendError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_wire_format() {
        let body = serde_json::to_value(AnalysisRequest::new("120503")).unwrap();
        assert_eq!(body, serde_json::json!({ "scheme_code": "120503" }));
    }

    #[test]
    fn test_response_wire_format() {
        let response: AnalysisResponse =
            serde_json::from_str(r#"{"result": "**Buy**"}"#).unwrap();
        assert_eq!(response.narrative, "**Buy**");
    }

    #[test]
    fn test_response_rejects_non_string_result() {
        assert!(serde_json::from_str::<AnalysisResponse>(r#"{"result": 42}"#).is_err());
        assert!(serde_json::from_str::<AnalysisResponse>(r#"{"detail": "x"}"#).is_err());
    }
}
