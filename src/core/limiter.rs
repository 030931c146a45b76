//! Outbound request admission control
//!
//! A single fixed window shared by every request the process sends upstream,
//! regardless of caller identity. The window protects the project's free-tier
//! quota, not individual clients.

use std::time::{Duration, Instant};

use tokio::sync::Mutex;
use tracing::debug;

use crate::config::RateLimitConfig;

/// Outcome of one admission check.
#[derive(Debug, Clone)]
pub struct Admission {
    /// Whether the request may proceed upstream.
    pub allowed: bool,
    /// Requests admitted in the current window, this one included when
    /// allowed.
    pub count: u32,
    /// Configured ceiling.
    pub limit: u32,
    /// Admissions left in the current window.
    pub remaining: u32,
    /// Seconds until the window reopens; set only on rejection.
    pub retry_after_secs: Option<u64>,
}

#[derive(Debug)]
struct WindowState {
    count: u32,
    window_start: Instant,
}

/// Process-wide fixed-window limiter for outbound upstream calls.
#[derive(Debug)]
pub struct RequestLimiter {
    max_requests: u32,
    window: Duration,
    state: Mutex<WindowState>,
}

impl RequestLimiter {
    pub fn new(config: &RateLimitConfig) -> Self {
        Self::with_window(config.max_requests, Duration::from_secs(config.window_secs))
    }

    /// Build with an explicit window length.
    pub fn with_window(max_requests: u32, window: Duration) -> Self {
        Self {
            max_requests,
            window,
            state: Mutex::new(WindowState {
                count: 0,
                window_start: Instant::now(),
            }),
        }
    }

    /// Run the window reset, ceiling check and increment as one step.
    ///
    /// The whole sequence happens under a single lock acquisition with no
    /// await points in between, so concurrent requests cannot undercount
    /// against the ceiling.
    pub async fn check_and_admit(&self) -> Admission {
        let mut state = self.state.lock().await;
        let now = Instant::now();

        if now.duration_since(state.window_start) >= self.window {
            state.count = 0;
            state.window_start = now;
        }

        if state.count >= self.max_requests {
            let elapsed = now.duration_since(state.window_start);
            let retry_after = self.window.saturating_sub(elapsed).as_secs().max(1);
            debug!(
                count = state.count,
                limit = self.max_requests,
                retry_after_secs = retry_after,
                "request window is full"
            );
            return Admission {
                allowed: false,
                count: state.count,
                limit: self.max_requests,
                remaining: 0,
                retry_after_secs: Some(retry_after),
            };
        }

        state.count += 1;
        Admission {
            allowed: true,
            count: state.count,
            limit: self.max_requests,
            remaining: self.max_requests - state.count,
            retry_after_secs: None,
        }
    }
}
