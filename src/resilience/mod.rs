//! Resilience subsystem.
//!
//! # Data Flow
//! ```text
//! Request to recommendation upstream:
//!     → gate.rs admission (fail fast while the circuit is open)
//!     → upstream call under the request timeout
//!     → outcome classification (success / timeout / upstream error)
//!     → state transition (trip on timeout, recover after reset window)
//! ```
//!
//! # Design Decisions
//! - Every external call has a deadline; timeouts are non-negotiable
//! - The gate never retries; each failure is surfaced once to the caller
//! - One gate instance per process, injected into handlers, private state

pub mod gate;

pub use gate::{CircuitGate, CircuitState, GateConfig, GateError};
