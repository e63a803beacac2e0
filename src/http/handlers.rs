//! Request handlers for the BFF surface.

use std::time::Instant;

use axum::{
    extract::{Path, State},
    http::{header, HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use serde_json::json;

use crate::http::adapt;
use crate::http::server::AppState;
use crate::observability::metrics;
use crate::resilience::GateError;

/// A related book as exposed to clients.
#[derive(Debug, Serialize)]
pub struct RelatedBook {
    pub id: String,
    pub title: String,
    pub contributors: Vec<String>,
}

/// `GET /books/{isbn}/related-books`
///
/// Calls the recommendation upstream through the circuit gate and maps each
/// gate outcome to a distinct status: non-empty success → 200, empty
/// success → 204, open circuit → 503, timeout → 504, any other upstream
/// failure → 500.
pub async fn related_books(
    State(state): State<AppState>,
    Path(isbn): Path<String>,
) -> Response {
    let start = Instant::now();

    let response = match state.recommendations.related_books(&isbn).await {
        Ok(records) if records.is_empty() => {
            tracing::debug!(isbn = %isbn, "No related books for ISBN");
            StatusCode::NO_CONTENT.into_response()
        }
        Ok(records) => {
            let body: Vec<RelatedBook> = records
                .into_iter()
                .map(|r| RelatedBook {
                    id: r.id,
                    title: r.title,
                    contributors: r.authors,
                })
                .collect();
            (StatusCode::OK, Json(body)).into_response()
        }
        Err(GateError::CircuitOpen) => {
            tracing::warn!(isbn = %isbn, "Related-books call rejected, circuit is open");
            message_response(StatusCode::SERVICE_UNAVAILABLE, "Circuit is open")
        }
        Err(GateError::Timeout(deadline)) => {
            tracing::warn!(isbn = %isbn, deadline = ?deadline, "Related-books call timed out");
            message_response(
                StatusCode::GATEWAY_TIMEOUT,
                "Request to external service timed out",
            )
        }
        Err(GateError::Upstream(err)) => {
            tracing::error!(isbn = %isbn, error = %err, "Recommendation upstream failed");
            message_response(
                StatusCode::INTERNAL_SERVER_ERROR,
                "An internal server error occurred",
            )
        }
    };

    metrics::record_request("GET", response.status().as_u16(), "related_books", start);
    response
}

/// `GET /books/isbn/{isbn}` and `GET /books/{isbn}`
///
/// Forwards the lookup to the catalog backend and relays its status. Mobile
/// clients (per User-Agent) get the adapted payload.
pub async fn book_by_isbn(
    State(state): State<AppState>,
    Path(isbn): Path<String>,
    headers: HeaderMap,
) -> Response {
    let start = Instant::now();

    let user_agent = headers
        .get(header::USER_AGENT)
        .and_then(|v| v.to_str().ok())
        .filter(|ua| !ua.is_empty());
    let response = match user_agent {
        None => message_response(StatusCode::BAD_REQUEST, "User-Agent missing"),
        Some(user_agent) => match state.catalog.book_by_isbn(&isbn).await {
            Ok((status, mut body)) if status.is_success() => {
                if adapt::is_mobile_device(user_agent) {
                    adapt::adapt_book_payload(&mut body);
                }
                (status, Json(body)).into_response()
            }
            Ok((status, _)) => {
                // Relay the backend status; the body is replaced with a plain
                // message so backend internals do not leak to clients.
                message_response(status, status.canonical_reason().unwrap_or("Error"))
            }
            Err(err) => {
                tracing::error!(isbn = %isbn, error = %err, "Catalog backend unreachable");
                message_response(StatusCode::INTERNAL_SERVER_ERROR, "Internal server error")
            }
        },
    };

    metrics::record_request("GET", response.status().as_u16(), "book_by_isbn", start);
    response
}

/// `GET /status` — liveness probe with uptime, outside the auth middleware.
pub async fn status(State(state): State<AppState>) -> Response {
    let uptime = state.started_at.elapsed().as_secs_f64();
    let timestamp = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or(0);

    Json(json!({
        "uptime": uptime,
        "message": "OK",
        "timestamp": timestamp,
    }))
    .into_response()
}

fn message_response(status: StatusCode, message: &str) -> Response {
    (status, Json(json!({ "message": message }))).into_response()
}
