//! Circuit gate protecting calls to the recommendation upstream.
//!
//! # States
//! - Closed: calls pass through to the upstream
//! - Open: calls fail fast without contacting the upstream
//!
//! # State Transitions
//! ```text
//! Closed → Open: an upstream call exceeds the request timeout
//! Open → Closed: reset window elapsed since opening (checked on the next call)
//! ```
//!
//! # Design Decisions
//! - One timeout trips the gate; recommendations are enrichment, not critical
//!   path, so the caller's latency budget wins over retrying a slow upstream
//! - No half-open probe: once the reset window elapses the next call goes
//!   through unconditionally, and a fresh timeout re-opens immediately
//! - Non-timeout upstream errors are surfaced but never trip the gate
//! - Calls rejected while open are never queued

use std::future::Future;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Mutex;
use std::time::Duration;

use thiserror::Error;
use tokio::time::{self, Instant};

use crate::observability::metrics;

/// Current mode of the gate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CircuitState {
    /// Calls pass through.
    Closed,
    /// Calls are rejected immediately.
    Open,
}

impl std::fmt::Display for CircuitState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CircuitState::Closed => write!(f, "closed"),
            CircuitState::Open => write!(f, "open"),
        }
    }
}

/// Gate configuration, fixed at construction.
#[derive(Debug, Clone)]
pub struct GateConfig {
    /// Deadline for a single upstream call.
    pub request_timeout: Duration,
    /// Minimum dwell time in Open before a call is allowed through again.
    pub reset_window: Duration,
}

impl Default for GateConfig {
    fn default() -> Self {
        Self {
            request_timeout: Duration::from_secs(3),
            reset_window: Duration::from_secs(60),
        }
    }
}

/// Failure modes surfaced to the caller. The gate never retries; every
/// failure is reported exactly once.
#[derive(Debug, Error)]
pub enum GateError<E> {
    /// The gate is open and the upstream was not contacted.
    #[error("circuit is open")]
    CircuitOpen,

    /// The upstream call exceeded the request timeout and was abandoned.
    #[error("upstream call exceeded {0:?}")]
    Timeout(Duration),

    /// The upstream was reached but errored or returned invalid data.
    /// Does not affect the circuit.
    #[error("upstream error: {0}")]
    Upstream(E),
}

/// Mutable gate state. Every read-modify-write happens under the mutex so
/// concurrent calls cannot double-open or lose a reset.
#[derive(Debug)]
struct GateState {
    state: CircuitState,
    /// Set iff `state == Open`.
    opened_at: Option<Instant>,
    /// Set by a timeout, cleared by a success or a recovery. While set,
    /// further timeouts do not re-stamp `opened_at`.
    timed_out_since_success: bool,
}

/// Circuit gate wrapping calls to a single upstream dependency.
///
/// One instance is created per process and shared across request handlers;
/// the circuit and the timeout marker are process-wide, not per-key.
#[derive(Debug)]
pub struct CircuitGate {
    config: GateConfig,
    state: Mutex<GateState>,
    /// Number of Closed → Open transitions since startup.
    trips: AtomicU64,
}

impl CircuitGate {
    /// Create a gate in the Closed state.
    pub fn new(config: GateConfig) -> Self {
        Self {
            config,
            state: Mutex::new(GateState {
                state: CircuitState::Closed,
                opened_at: None,
                timed_out_since_success: false,
            }),
            trips: AtomicU64::new(0),
        }
    }

    /// Run `call` through the gate.
    ///
    /// Rejects with [`GateError::CircuitOpen`] while the gate is open and the
    /// reset window has not elapsed; otherwise runs the call under the
    /// configured request timeout and classifies the outcome.
    pub async fn invoke<T, E, F, Fut>(&self, call: F) -> Result<T, GateError<E>>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<T, E>>,
    {
        if !self.admit() {
            return Err(GateError::CircuitOpen);
        }

        match time::timeout(self.config.request_timeout, call()).await {
            Ok(Ok(value)) => {
                self.record_success();
                Ok(value)
            }
            Ok(Err(err)) => Err(GateError::Upstream(err)),
            Err(_) => {
                self.record_timeout();
                Err(GateError::Timeout(self.config.request_timeout))
            }
        }
    }

    /// Current circuit state.
    pub fn state(&self) -> CircuitState {
        self.lock().state
    }

    /// Number of times the gate has opened since startup.
    pub fn trip_count(&self) -> u64 {
        self.trips.load(Ordering::Relaxed)
    }

    /// Admission check: recover if the reset window has elapsed. Returns
    /// false when the call must be rejected without contacting the upstream.
    fn admit(&self) -> bool {
        let mut guard = self.lock();
        if guard.state == CircuitState::Open {
            match guard.opened_at {
                Some(at) if at.elapsed() >= self.config.reset_window => {
                    guard.state = CircuitState::Closed;
                    guard.opened_at = None;
                    guard.timed_out_since_success = false;
                    tracing::info!(
                        reset_window_secs = self.config.reset_window.as_secs(),
                        "circuit closed after reset window, resuming upstream calls"
                    );
                    metrics::record_circuit_state(false);
                }
                _ => return false,
            }
        }
        true
    }

    fn record_timeout(&self) {
        let mut guard = self.lock();
        if guard.state == CircuitState::Closed && !guard.timed_out_since_success {
            guard.state = CircuitState::Open;
            guard.opened_at = Some(Instant::now());
            self.trips.fetch_add(1, Ordering::Relaxed);
            tracing::warn!(
                timeout_secs = self.config.request_timeout.as_secs_f64(),
                reset_window_secs = self.config.reset_window.as_secs(),
                "circuit opened after upstream timeout"
            );
            metrics::record_circuit_state(true);
        }
        guard.timed_out_since_success = true;
    }

    fn record_success(&self) {
        let mut guard = self.lock();
        guard.timed_out_since_success = false;
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, GateState> {
        // A poisoned lock still holds a valid state: every transition is a
        // set of plain assignments made under the guard.
        self.state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    #[cfg(test)]
    fn snapshot(&self) -> (CircuitState, Option<Instant>, bool) {
        let guard = self.lock();
        (guard.state, guard.opened_at, guard.timed_out_since_success)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::AtomicU32;
    use std::sync::Arc;

    fn gate(timeout_ms: u64, reset_secs: u64) -> CircuitGate {
        CircuitGate::new(GateConfig {
            request_timeout: Duration::from_millis(timeout_ms),
            reset_window: Duration::from_secs(reset_secs),
        })
    }

    fn assert_invariant(gate: &CircuitGate) {
        let (state, opened_at, _) = gate.snapshot();
        assert_eq!(opened_at.is_some(), state == CircuitState::Open);
    }

    async fn hang() -> Result<(), &'static str> {
        std::future::pending().await
    }

    #[tokio::test]
    async fn starts_closed() {
        let g = gate(100, 60);
        assert_eq!(g.state(), CircuitState::Closed);
        assert_eq!(g.trip_count(), 0);
        assert_invariant(&g);
    }

    #[tokio::test(start_paused = true)]
    async fn first_timeout_trips_open_and_reports_timeout() {
        let g = gate(100, 60);

        let res = g.invoke(|| hang()).await;
        assert!(matches!(res, Err(GateError::Timeout(_))));
        assert_eq!(g.state(), CircuitState::Open);
        assert_eq!(g.trip_count(), 1);
        assert_invariant(&g);
    }

    #[tokio::test(start_paused = true)]
    async fn open_gate_rejects_without_contacting_upstream() {
        let g = gate(100, 60);
        let _ = g.invoke(|| hang()).await;
        assert_eq!(g.state(), CircuitState::Open);

        let calls = AtomicU32::new(0);
        for _ in 0..5 {
            let res = g
                .invoke(|| {
                    calls.fetch_add(1, Ordering::SeqCst);
                    async { Ok::<_, &'static str>(()) }
                })
                .await;
            assert!(matches!(res, Err(GateError::CircuitOpen)));
        }
        assert_eq!(calls.load(Ordering::SeqCst), 0);
        assert_invariant(&g);
    }

    #[tokio::test(start_paused = true)]
    async fn recovers_after_reset_window_on_success() {
        let g = gate(100, 60);
        let _ = g.invoke(|| hang()).await;
        assert_eq!(g.state(), CircuitState::Open);

        time::advance(Duration::from_secs(61)).await;

        let res = g.invoke(|| async { Ok::<_, &'static str>(7) }).await;
        assert_eq!(res.unwrap(), 7);
        assert_eq!(g.state(), CircuitState::Closed);
        assert_eq!(g.trip_count(), 1);
        assert_invariant(&g);
    }

    #[tokio::test(start_paused = true)]
    async fn reopens_with_fresh_timestamp_when_recovery_call_times_out() {
        let g = gate(100, 60);
        let _ = g.invoke(|| hang()).await;
        let (_, first_opened, _) = g.snapshot();

        time::advance(Duration::from_secs(61)).await;

        // The post-window call is admitted unconditionally; no probe phase.
        let res = g.invoke(|| hang()).await;
        assert!(matches!(res, Err(GateError::Timeout(_))));
        assert_eq!(g.state(), CircuitState::Open);
        assert_eq!(g.trip_count(), 2);

        let (_, second_opened, _) = g.snapshot();
        assert!(second_opened.unwrap() > first_opened.unwrap());
        assert_invariant(&g);
    }

    #[tokio::test(start_paused = true)]
    async fn success_resets_timeout_marker_so_next_timeout_retrips() {
        let g = gate(100, 60);
        let _ = g.invoke(|| hang()).await;
        assert_eq!(g.trip_count(), 1);

        time::advance(Duration::from_secs(61)).await;
        let _ = g.invoke(|| async { Ok::<_, &'static str>(()) }).await;
        let (_, _, marker) = g.snapshot();
        assert!(!marker);

        // Marker cleared: a subsequent timeout is first-time again.
        let res = g.invoke(|| hang()).await;
        assert!(matches!(res, Err(GateError::Timeout(_))));
        assert_eq!(g.state(), CircuitState::Open);
        assert_eq!(g.trip_count(), 2);
        assert_invariant(&g);
    }

    #[tokio::test(start_paused = true)]
    async fn upstream_error_does_not_trip_the_gate() {
        let g = gate(100, 60);
        let res = g
            .invoke(|| async { Err::<(), _>("connection refused") })
            .await;
        assert!(matches!(res, Err(GateError::Upstream("connection refused"))));
        assert_eq!(g.state(), CircuitState::Closed);
        assert_eq!(g.trip_count(), 0);
        assert_invariant(&g);
    }

    #[tokio::test(start_paused = true)]
    async fn concurrent_timeouts_open_the_gate_exactly_once() {
        let g = Arc::new(gate(100, 60));

        let mut tasks = Vec::new();
        for _ in 0..8 {
            let g = g.clone();
            tasks.push(tokio::spawn(async move { g.invoke(|| hang()).await }));
        }

        for task in tasks {
            let res = task.await.unwrap();
            assert!(matches!(res, Err(GateError::Timeout(_))));
        }
        assert_eq!(g.state(), CircuitState::Open);
        assert_eq!(g.trip_count(), 1);
        assert_invariant(&g);
    }
}
