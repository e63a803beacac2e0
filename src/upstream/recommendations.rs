//! Client for the external recommendation service.
//!
//! Every call goes through the circuit gate: a timed-out call trips the
//! circuit and subsequent calls fail fast until the reset window elapses.

use std::sync::Arc;
use std::time::Duration;

use axum::body::Body;
use axum::http::Request;
use http_body_util::BodyExt;
use hyper_util::{
    client::legacy::{connect::HttpConnector, Client},
    rt::TokioExecutor,
};
use serde::{Deserialize, Serialize};

use crate::config::RecommendationsConfig;
use crate::resilience::{CircuitGate, GateConfig, GateError};
use crate::upstream::UpstreamError;

/// A related-book record as returned by the recommendation upstream.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct RecommendationRecord {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub authors: Vec<String>,
}

/// Gate-protected client for the recommendation upstream.
pub struct RecommendationsClient {
    client: Client<HttpConnector, Body>,
    address: String,
    gate: Arc<CircuitGate>,
}

impl RecommendationsClient {
    /// Create a client with a fresh gate in the Closed state.
    pub fn new(config: &RecommendationsConfig) -> Self {
        let client = Client::builder(TokioExecutor::new()).build(HttpConnector::new());
        let gate = Arc::new(CircuitGate::new(GateConfig {
            request_timeout: Duration::from_millis(config.request_timeout_ms),
            reset_window: Duration::from_secs(config.reset_window_secs),
        }));
        Self {
            client,
            address: config.address.clone(),
            gate,
        }
    }

    /// The gate guarding this upstream.
    pub fn gate(&self) -> &CircuitGate {
        &self.gate
    }

    /// Fetch the books related to `isbn` through the gate.
    ///
    /// An empty collection is a success outcome, distinct from any failure;
    /// the handler maps it to a no-content response.
    pub async fn related_books(
        &self,
        isbn: &str,
    ) -> Result<Vec<RecommendationRecord>, GateError<UpstreamError>> {
        self.gate.invoke(|| self.fetch(isbn)).await
    }

    async fn fetch(&self, isbn: &str) -> Result<Vec<RecommendationRecord>, UpstreamError> {
        let uri = format!("http://{}/recommendations/{}", self.address, isbn);
        let request = Request::builder()
            .method("GET")
            .uri(uri)
            .header("user-agent", "book-bff")
            .header("accept", "application/json")
            .body(Body::empty())?;

        let response = self.client.request(request).await?;
        let status = response.status();
        if !status.is_success() {
            return Err(UpstreamError::Status(status));
        }

        let bytes = response.into_body().collect().await?.to_bytes();
        let records = serde_json::from_slice(&bytes)?;
        Ok(records)
    }
}
