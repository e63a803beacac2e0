//! Lifecycle management subsystem.
//!
//! # Data Flow
//! ```text
//! Shutdown (shutdown.rs):
//!     Signal received → Stop accepting → Drain connections → Exit
//! ```
//!
//! # Design Decisions
//! - Long-running tasks subscribe to one broadcast channel
//! - Circuit and gate state is in-memory only; a restart always begins with
//!   a closed circuit

pub mod shutdown;

pub use shutdown::Shutdown;
