//! Book BFF library.
//!
//! Backend-for-frontend for the bookstore: serves book lookups adapted per
//! client type and related-book recommendations fetched through a
//! circuit-gated call to the external recommendation service.

pub mod config;
pub mod http;
pub mod lifecycle;
pub mod observability;
pub mod resilience;
pub mod upstream;

pub use config::BffConfig;
pub use http::HttpServer;
pub use lifecycle::Shutdown;
pub use resilience::{CircuitGate, CircuitState, GateConfig, GateError};
