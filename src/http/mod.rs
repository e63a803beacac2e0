//! HTTP protocol handling subsystem.
//!
//! # Data Flow
//! ```text
//! TCP connection
//!     → server.rs (Axum setup, middleware layers)
//!     → request.rs (request ID)
//!     → middleware/auth.rs (JWT claims check)
//!     → handlers.rs (gate-protected related books, catalog forward, status)
//!     → adapt.rs (mobile response shaping)
//! ```

pub mod adapt;
pub mod handlers;
pub mod middleware;
pub mod request;
pub mod server;

pub use request::{RequestIdLayer, X_REQUEST_ID};
pub use server::HttpServer;
