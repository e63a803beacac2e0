//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for the BFF.
//! All types derive Serde traits for deserialization from config files.

use serde::{Deserialize, Serialize};

/// Root configuration for the book BFF.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct BffConfig {
    /// Listener configuration (bind address, connection limits).
    pub listener: ListenerConfig,

    /// JWT validation settings for the /books routes.
    pub auth: AuthConfig,

    /// Catalog (book service) backend.
    pub catalog: CatalogConfig,

    /// Recommendation upstream and its circuit gate.
    pub recommendations: RecommendationsConfig,

    /// Timeout configuration.
    pub timeouts: TimeoutConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,
}

/// Listener configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ListenerConfig {
    /// Bind address (e.g., "0.0.0.0:8002").
    pub bind_address: String,

    /// Maximum concurrent connections (backpressure).
    pub max_connections: usize,
}

impl Default for ListenerConfig {
    fn default() -> Self {
        Self {
            bind_address: "0.0.0.0:8002".to_string(),
            max_connections: 10_000,
        }
    }
}

/// JWT validation settings.
///
/// The token is decoded without signature verification; the check is a plain
/// claims inspection (known subject, unexpired, expected issuer).
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct AuthConfig {
    /// Enable JWT validation on the /books routes.
    pub enabled: bool,

    /// Required `iss` claim.
    pub issuer: String,

    /// Accepted `sub` claims.
    pub subjects: Vec<String>,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            issuer: "cmu.edu".to_string(),
            subjects: ["starlord", "gamora", "drax", "rocket", "groot"]
                .iter()
                .map(|s| s.to_string())
                .collect(),
        }
    }
}

/// Catalog (book service) backend configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct CatalogConfig {
    /// Backend address (e.g., "127.0.0.1:3001").
    pub address: String,
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            address: "127.0.0.1:3001".to_string(),
        }
    }
}

/// Recommendation upstream configuration, including the circuit gate
/// parameters (fixed at startup).
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct RecommendationsConfig {
    /// Upstream address (e.g., "127.0.0.1:4000").
    pub address: String,

    /// Deadline for a single upstream call in milliseconds. A call exceeding
    /// it is abandoned and trips the circuit.
    pub request_timeout_ms: u64,

    /// Minimum dwell time in the open state before a call is allowed through
    /// again, in seconds.
    pub reset_window_secs: u64,
}

impl Default for RecommendationsConfig {
    fn default() -> Self {
        Self {
            address: "127.0.0.1:4000".to_string(),
            request_timeout_ms: 3_000,
            reset_window_secs: 60,
        }
    }
}

/// Timeout configuration for inbound requests.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct TimeoutConfig {
    /// Connection establishment timeout in seconds.
    pub connect_secs: u64,

    /// Request timeout (total time for request/response) in seconds.
    pub request_secs: u64,
}

impl Default for TimeoutConfig {
    fn default() -> Self {
        Self {
            connect_secs: 5,
            request_secs: 30,
        }
    }
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,

    /// Enable metrics endpoint.
    pub metrics_enabled: bool,

    /// Metrics endpoint bind address.
    pub metrics_address: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            metrics_enabled: true,
            metrics_address: "0.0.0.0:9090".to_string(),
        }
    }
}
