//! Upstream HTTP clients.
//!
//! # Data Flow
//! ```text
//! Handler
//!     → recommendations.rs (related-book lookups, behind the circuit gate)
//!     → catalog.rs (book lookups, plain forward to the book service)
//! ```
//!
//! # Design Decisions
//! - Each client owns a pooled hyper-util legacy client for its backend
//! - Only the recommendation upstream is gated; the catalog is a trusted
//!   internal backend whose error statuses are relayed to the caller
//! - Decode failures are upstream errors, distinct from timeouts

use axum::http::StatusCode;
use thiserror::Error;

pub mod catalog;
pub mod recommendations;

pub use catalog::CatalogClient;
pub use recommendations::{RecommendationRecord, RecommendationsClient};

/// Errors from a reachable upstream: connection failures, error statuses,
/// and malformed payloads. None of these affect the circuit gate.
#[derive(Debug, Error)]
pub enum UpstreamError {
    #[error("failed to build upstream request: {0}")]
    Request(#[from] axum::http::Error),

    #[error("upstream connection failed: {0}")]
    Connect(#[from] hyper_util::client::legacy::Error),

    #[error("failed to read upstream body: {0}")]
    Body(#[from] hyper::Error),

    #[error("upstream returned status {0}")]
    Status(StatusCode),

    #[error("upstream returned a malformed payload: {0}")]
    Decode(#[from] serde_json::Error),
}
