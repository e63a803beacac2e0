//! Client for the catalog (book service) backend.
//!
//! Plain forward with no gate: the catalog is an internal backend and its
//! error statuses are relayed to the caller rather than masked.

use axum::body::Body;
use axum::http::{Request, StatusCode};
use http_body_util::BodyExt;
use hyper_util::{
    client::legacy::{connect::HttpConnector, Client},
    rt::TokioExecutor,
};
use serde_json::Value;

use crate::config::CatalogConfig;
use crate::upstream::UpstreamError;

/// Client for book lookups against the catalog backend.
pub struct CatalogClient {
    client: Client<HttpConnector, Body>,
    address: String,
}

impl CatalogClient {
    pub fn new(config: &CatalogConfig) -> Self {
        let client = Client::builder(TokioExecutor::new()).build(HttpConnector::new());
        Self {
            client,
            address: config.address.clone(),
        }
    }

    /// Look up a book by ISBN. Returns the backend status together with the
    /// decoded JSON body (Null when the body is empty or not JSON).
    pub async fn book_by_isbn(&self, isbn: &str) -> Result<(StatusCode, Value), UpstreamError> {
        let uri = format!("http://{}/books/isbn/{}", self.address, isbn);
        let request = Request::builder()
            .method("GET")
            .uri(uri)
            .header("user-agent", "book-bff")
            .header("accept", "application/json")
            .body(Body::empty())?;

        let response = self.client.request(request).await?;
        let status = response.status();
        let bytes = response.into_body().collect().await?.to_bytes();
        let body = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
        Ok((status, body))
    }
}
