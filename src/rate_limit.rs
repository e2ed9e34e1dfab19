//! Sliding-window rate limiting keyed by client identity
//!
//! Each identity owns an ordered window of admission timestamps. A check
//! prunes entries that have slid out of the window, then admits if a
//! slot remains. The prune + length-check + append sequence runs under a
//! single lock acquisition so two concurrent callers cannot both claim
//! the last slot.

use std::collections::{HashMap, VecDeque};
use std::sync::Mutex;
use std::time::{SystemTime, UNIX_EPOCH};

/// Outcome of a rate limit check
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RateDecision {
    /// The request is admitted
    Admitted,
    /// The request is rejected until a slot frees up
    Limited {
        /// Minimum wait in seconds before a new request could be admitted
        retry_after_secs: u64,
    },
}

impl RateDecision {
    /// Whether the request was admitted
    pub fn is_admitted(&self) -> bool {
        matches!(self, RateDecision::Admitted)
    }
}

/// Per-client sliding-window admission gate
///
/// A `max_requests` of zero or a zero-length window disables limiting
/// entirely and every check is admitted; this is an operational escape
/// hatch, not an error.
#[derive(Debug)]
pub struct RateLimiter {
    max_requests: usize,
    window_secs: u64,
    windows: Mutex<HashMap<String, VecDeque<f64>>>,
}

impl RateLimiter {
    /// Create a limiter admitting `max_requests` per identity per
    /// `window_secs` trailing window
    pub fn new(max_requests: usize, window_secs: u64) -> Self {
        Self {
            max_requests,
            window_secs,
            windows: Mutex::new(HashMap::new()),
        }
    }

    /// Check an identity against the limit at the current wall-clock time
    pub fn check(&self, identity: &str) -> RateDecision {
        let now = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_secs_f64())
            .unwrap_or(0.0);
        self.check_at(identity, now)
    }

    /// Check an identity against the limit at an explicit timestamp
    /// (seconds since an arbitrary epoch)
    pub fn check_at(&self, identity: &str, now: f64) -> RateDecision {
        if self.max_requests == 0 || self.window_secs == 0 {
            return RateDecision::Admitted;
        }

        let window_start = now - self.window_secs as f64;
        let mut windows = self.windows.lock().expect("mutex poisoned");
        let window = windows.entry(identity.to_string()).or_default();

        while window.front().is_some_and(|&t| t <= window_start) {
            window.pop_front();
        }

        if window.len() >= self.max_requests {
            // The wait hint is computed from the OLDEST surviving entry:
            // the minimum time until the window would admit again
            let oldest = window.front().copied().unwrap_or(now);
            let retry_after = (oldest + self.window_secs as f64 - now).floor() as i64;
            return RateDecision::Limited {
                retry_after_secs: retry_after.max(1) as u64,
            };
        }

        window.push_back(now);
        RateDecision::Admitted
    }
}
