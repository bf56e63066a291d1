//! Admission Control Middleware
//!
//! In-process token bucket bounding the rate of accepted unary requests.
//! The bucket refills to capacity at fixed intervals; `allow` never blocks
//! and never performs I/O. Denied requests surface as 429 before any work
//! begins. The gate guards request admission only — live delivery is never
//! throttled here.

use std::time::Duration;

use axum::{
    extract::{Request, State},
    http::header,
    middleware::Next,
    response::{IntoResponse, Response},
};
use tokio::time::Instant;

use crate::shared::error::AppError;
use crate::startup::AppState;

struct GateState {
    tokens: u32,
    window_start: Instant,
}

/// Non-blocking token-bucket admission gate.
pub struct AdmissionGate {
    capacity: u32,
    refill_interval: Duration,
    state: parking_lot::Mutex<GateState>,
}

impl AdmissionGate {
    pub fn new(capacity: u32, refill_interval: Duration) -> Self {
        Self {
            capacity,
            refill_interval,
            state: parking_lot::Mutex::new(GateState {
                tokens: capacity,
                window_start: Instant::now(),
            }),
        }
    }

    /// Take one token if available. Fail-closed: a depleted bucket rejects
    /// immediately rather than queueing the caller.
    pub fn allow(&self) -> bool {
        let mut state = self.state.lock();
        let elapsed = state.window_start.elapsed();

        if elapsed >= self.refill_interval {
            // Refill to capacity, keeping window boundaries fixed. A zero
            // interval refills on every call, which disables throttling.
            if self.refill_interval.is_zero() {
                state.window_start = Instant::now();
            } else {
                let periods = (elapsed.as_nanos() / self.refill_interval.as_nanos()) as u32;
                state.window_start += self.refill_interval * periods;
            }
            state.tokens = self.capacity;
        }

        if state.tokens > 0 {
            state.tokens -= 1;
            true
        } else {
            false
        }
    }

    /// Tokens left in the current window.
    pub fn remaining(&self) -> u32 {
        self.state.lock().tokens
    }

    pub fn capacity(&self) -> u32 {
        self.capacity
    }
}

/// Admission middleware applied to every unary route.
pub async fn admission_middleware(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> Response {
    if !state.admission.allow() {
        tracing::warn!(path = %request.uri().path(), "Request rejected by admission gate");
        return AppError::AdmissionRejected.into_response();
    }

    let mut response = next.run(request).await;
    let headers = response.headers_mut();
    if let Ok(v) = header::HeaderValue::from_str(&state.admission.capacity().to_string()) {
        headers.insert("X-RateLimit-Limit", v);
    }
    if let Ok(v) = header::HeaderValue::from_str(&state.admission.remaining().to_string()) {
        headers.insert("X-RateLimit-Remaining", v);
    }
    response
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test(start_paused = true)]
    async fn admits_capacity_per_window_and_rejects_excess() {
        let gate = AdmissionGate::new(3, Duration::from_secs(60));

        for _ in 0..3 {
            assert!(gate.allow());
        }
        // Sustained load inside the window: everything else is rejected.
        for _ in 0..10 {
            assert!(!gate.allow());
        }

        tokio::time::advance(Duration::from_secs(60)).await;
        for _ in 0..3 {
            assert!(gate.allow());
        }
        assert!(!gate.allow());
    }

    #[tokio::test(start_paused = true)]
    async fn refill_skips_whole_missed_windows() {
        let gate = AdmissionGate::new(2, Duration::from_secs(1));
        assert!(gate.allow());
        assert!(gate.allow());

        // Several idle windows refill once, not cumulatively.
        tokio::time::advance(Duration::from_secs(10)).await;
        assert!(gate.allow());
        assert!(gate.allow());
        assert!(!gate.allow());
    }

    #[tokio::test(start_paused = true)]
    async fn zero_interval_admits_everything_without_panicking() {
        let gate = AdmissionGate::new(1, Duration::ZERO);
        for _ in 0..10 {
            assert!(gate.allow());
        }
    }

    #[tokio::test(start_paused = true)]
    async fn remaining_tracks_consumption() {
        let gate = AdmissionGate::new(5, Duration::from_secs(60));
        assert_eq!(gate.remaining(), 5);
        assert!(gate.allow());
        assert_eq!(gate.remaining(), 4);
    }
}
