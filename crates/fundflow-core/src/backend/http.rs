//! HTTP client for the analysis backend.
//!
//! POSTs `{"scheme_code": ...}` as JSON to the configured endpoint and expects
//! `{"result": "..."}` back.

use std::time::Duration;

use async_trait::async_trait;
use tracing::debug;

use super::{AnalysisBackend, AnalysisRequest, AnalysisResponse};
use crate::config::BackendConfig;
use crate::error::{BackendError, FundflowResult};

/// How much of an error body is kept for diagnostics.
const MAX_ERROR_BODY: usize = 512;

/// Analysis backend reached over HTTP.
#[derive(Clone)]
pub struct HttpBackend {
    endpoint: String,
    client: reqwest::Client,
}

impl HttpBackend {
    /// Create a backend client for `endpoint` with a request timeout.
    pub fn new(endpoint: &str, timeout: Duration) -> FundflowResult<Self> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;

        Ok(Self {
            endpoint: endpoint.to_string(),
            client,
        })
    }

    pub fn from_config(config: &BackendConfig) -> FundflowResult<Self> {
        Self::new(&config.endpoint, config.timeout())
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// Check whether anything answers HTTP at the endpoint's host.
    ///
    /// Any response counts, including 404 and 405: only reachability matters.
    pub async fn health_check(&self) -> bool {
        let Ok(mut url) = reqwest::Url::parse(&self.endpoint) else {
            return false;
        };
        url.set_path("/");
        url.set_query(None);

        self.client.get(url).send().await.is_ok()
    }
}

#[async_trait]
impl AnalysisBackend for HttpBackend {
    async fn analyze(&self, request: &AnalysisRequest) -> Result<AnalysisResponse, BackendError> {
        let response = self
            .client
            .post(&self.endpoint)
            .json(request)
            .send()
            .await
            .map_err(BackendError::Transport)?;

        let status = response.status();
        if !status.is_success() {
            let mut body = response.text().await.unwrap_or_default();
            truncate_at_char_boundary(&mut body, MAX_ERROR_BODY);
            return Err(BackendError::Server {
                status: status.as_u16(),
                body,
            });
        }

        let body = response.text().await.map_err(BackendError::Transport)?;
        let parsed: AnalysisResponse = serde_json::from_str(&body)
            .map_err(|e| BackendError::malformed(format!("expected {{\"result\": string}}: {e}")))?;

        debug!(chars = parsed.narrative.len(), "Received analysis narrative");

        Ok(parsed)
    }
}

fn truncate_at_char_boundary(s: &mut String, max: usize) {
    if s.len() <= max {
        return;
    }
    let mut cut = max;
    while !s.is_char_boundary(cut) {
        cut -= 1;
    }
    s.truncate(cut);
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{http::StatusCode, routing::post, Json, Router};
    use std::net::SocketAddr;

    async fn spawn_server(app: Router) -> SocketAddr {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });
        addr
    }

    fn backend_for(addr: SocketAddr) -> HttpBackend {
        HttpBackend::new(&format!("http://{addr}/analyze"), Duration::from_secs(5)).unwrap()
    }

    #[tokio::test]
    async fn test_success_extracts_narrative() {
        let app = Router::new().route(
            "/analyze",
            post(|Json(body): Json<serde_json::Value>| async move {
                let code = body["scheme_code"].as_str().unwrap_or_default().to_string();
                Json(serde_json::json!({ "result": format!("# Report for {code}") }))
            }),
        );
        let backend = backend_for(spawn_server(app).await);

        let response = backend.analyze(&AnalysisRequest::new("120503")).await.unwrap();
        assert_eq!(response.narrative, "# Report for 120503");
    }

    #[tokio::test]
    async fn test_non_success_status_is_server_error() {
        let app = Router::new().route(
            "/analyze",
            post(|| async { (StatusCode::INTERNAL_SERVER_ERROR, "crew exploded") }),
        );
        let backend = backend_for(spawn_server(app).await);

        let err = backend.analyze(&AnalysisRequest::new("abc")).await.unwrap_err();
        match err {
            BackendError::Server { status, body } => {
                assert_eq!(status, 500);
                assert_eq!(body, "crew exploded");
            }
            other => panic!("expected server error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_missing_field_is_malformed() {
        let app = Router::new().route(
            "/analyze",
            post(|| async { Json(serde_json::json!({ "letter": "hi" })) }),
        );
        let backend = backend_for(spawn_server(app).await);

        let err = backend.analyze(&AnalysisRequest::new("120503")).await.unwrap_err();
        assert_eq!(err.kind(), "malformed_response");
    }

    #[tokio::test]
    async fn test_non_json_body_is_malformed() {
        let app = Router::new().route("/analyze", post(|| async { "plain text" }));
        let backend = backend_for(spawn_server(app).await);

        let err = backend.analyze(&AnalysisRequest::new("120503")).await.unwrap_err();
        assert_eq!(err.kind(), "malformed_response");
    }

    #[tokio::test]
    async fn test_connection_refused_is_transport_error() {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let backend = backend_for(addr);
        let err = backend.analyze(&AnalysisRequest::new("120503")).await.unwrap_err();
        assert_eq!(err.kind(), "transport");
        assert!(!backend.health_check().await);
    }

    #[tokio::test]
    async fn test_unreachable_backend_through_controller() {
        use crate::controller::{AnalysisController, FAILURE_MESSAGE};
        use std::sync::Arc;

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let controller = AnalysisController::new(Arc::new(backend_for(addr)));
        controller.on_analyze_requested().await;

        let state = controller.state();
        assert_eq!(state.error_message, FAILURE_MESSAGE);
        assert!(state.result.is_empty());
        assert!(!state.busy);
    }

    #[tokio::test]
    async fn test_health_check_accepts_any_response() {
        let app = Router::new().route("/analyze", post(|| async { "" }));
        let backend = backend_for(spawn_server(app).await);
        assert!(backend.health_check().await);
    }

    #[test]
    fn test_truncate_respects_char_boundaries() {
        let mut s = "ééé".to_string();
        truncate_at_char_boundary(&mut s, 3);
        assert_eq!(s, "é");
    }
}
