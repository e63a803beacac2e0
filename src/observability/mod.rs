//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! All subsystems produce:
//!     → logging.rs (structured log events via tracing)
//!     → metrics.rs (counters, gauges, histograms)
//!
//! Consumers:
//!     → Log aggregation (stdout)
//!     → Metrics endpoint (Prometheus scrape)
//! ```
//!
//! # Design Decisions
//! - Structured logging with named fields; request ID flows through handlers
//! - Metric updates are cheap (atomic increments behind the macros)
//! - The metrics exporter is optional and runs on its own listener

pub mod logging;
pub mod metrics;
