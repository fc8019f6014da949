//! Bounded polling waits.
//!
//! Waiting here is a blocking retry loop: probe, sleep one poll interval,
//! probe again, until the probe yields a value or the budget runs out. The
//! sleep is clamped so the loop never overshoots its deadline by more than
//! one probe.

use crate::result::{ProbeError, ProbeResult};
use serde::{Deserialize, Serialize};
use std::time::{Duration, Instant};

/// Default wait budget per locate attempt (10 seconds)
pub const DEFAULT_WAIT_TIMEOUT_MS: u64 = 10_000;

/// Default polling interval (500ms)
pub const DEFAULT_POLL_INTERVAL_MS: u64 = 500;

/// Time allowed for one wait, and how often to re-probe within it
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct WaitBudget {
    /// Timeout in milliseconds
    pub timeout_ms: u64,
    /// Polling interval in milliseconds
    pub poll_interval_ms: u64,
}

impl Default for WaitBudget {
    fn default() -> Self {
        Self {
            timeout_ms: DEFAULT_WAIT_TIMEOUT_MS,
            poll_interval_ms: DEFAULT_POLL_INTERVAL_MS,
        }
    }
}

impl WaitBudget {
    /// Create a budget with default poll interval
    #[must_use]
    pub const fn new(timeout: Duration) -> Self {
        Self {
            timeout_ms: timeout.as_millis() as u64,
            poll_interval_ms: DEFAULT_POLL_INTERVAL_MS,
        }
    }

    /// Budget of whole seconds
    #[must_use]
    pub const fn from_secs(secs: u64) -> Self {
        Self {
            timeout_ms: secs.saturating_mul(1000),
            poll_interval_ms: DEFAULT_POLL_INTERVAL_MS,
        }
    }

    /// Set timeout in milliseconds
    #[must_use]
    pub const fn with_timeout(mut self, timeout_ms: u64) -> Self {
        self.timeout_ms = timeout_ms;
        self
    }

    /// Set polling interval in milliseconds
    #[must_use]
    pub const fn with_poll_interval(mut self, poll_interval_ms: u64) -> Self {
        self.poll_interval_ms = poll_interval_ms;
        self
    }

    /// Get timeout as Duration
    #[must_use]
    pub const fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }

    /// Get poll interval as Duration
    #[must_use]
    pub const fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms)
    }
}

/// Outcome of a successful wait
#[derive(Debug, Clone)]
pub struct WaitResult<T> {
    /// Value produced by the probe
    pub value: T,
    /// Time spent waiting
    pub elapsed: Duration,
    /// Number of probes made
    pub attempts: u32,
}

/// Poll `probe` until it returns `Some`, an error, or the budget elapses.
///
/// The probe always runs at least once, even with a zero budget. An `Err`
/// from the probe ends the wait immediately. Running out of time yields
/// [`ProbeError::Timeout`].
pub fn poll_until<T, F>(budget: &WaitBudget, mut probe: F) -> ProbeResult<WaitResult<T>>
where
    F: FnMut() -> ProbeResult<Option<T>>,
{
    let start = Instant::now();
    let deadline = start + budget.timeout();
    let mut attempts = 0;

    loop {
        attempts += 1;
        if let Some(value) = probe()? {
            return Ok(WaitResult {
                value,
                elapsed: start.elapsed(),
                attempts,
            });
        }

        let now = Instant::now();
        if now >= deadline {
            return Err(ProbeError::Timeout {
                ms: budget.timeout_ms,
            });
        }
        std::thread::sleep(budget.poll_interval().min(deadline - now));
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
mod tests {
    use super::*;
    use std::cell::Cell;

    mod wait_budget_tests {
        use super::*;

        #[test]
        fn test_default() {
            let budget = WaitBudget::default();
            assert_eq!(budget.timeout_ms, DEFAULT_WAIT_TIMEOUT_MS);
            assert_eq!(budget.poll_interval_ms, DEFAULT_POLL_INTERVAL_MS);
        }

        #[test]
        fn test_from_secs() {
            assert_eq!(WaitBudget::from_secs(10).timeout(), Duration::from_secs(10));
        }

        #[test]
        fn test_new_from_duration() {
            let budget = WaitBudget::new(Duration::from_millis(250));
            assert_eq!(budget.timeout_ms, 250);
        }

        #[test]
        fn test_builders() {
            let budget = WaitBudget::default()
                .with_timeout(100)
                .with_poll_interval(5);
            assert_eq!(budget.timeout(), Duration::from_millis(100));
            assert_eq!(budget.poll_interval(), Duration::from_millis(5));
        }
    }

    mod poll_until_tests {
        use super::*;

        fn fast(timeout_ms: u64) -> WaitBudget {
            WaitBudget::default()
                .with_timeout(timeout_ms)
                .with_poll_interval(1)
        }

        #[test]
        fn test_immediate_success() {
            let result = poll_until(&fast(50), || Ok(Some(7))).unwrap();
            assert_eq!(result.value, 7);
            assert_eq!(result.attempts, 1);
        }

        #[test]
        fn test_succeeds_after_retries() {
            let calls = Cell::new(0);
            let result = poll_until(&fast(1_000), || {
                calls.set(calls.get() + 1);
                Ok((calls.get() >= 3).then_some("ready"))
            })
            .unwrap();
            assert_eq!(result.value, "ready");
            assert_eq!(result.attempts, 3);
        }

        #[test]
        fn test_times_out() {
            let err = poll_until::<(), _>(&fast(20), || Ok(None)).unwrap_err();
            assert!(matches!(err, ProbeError::Timeout { ms: 20 }));
        }

        #[test]
        fn test_zero_budget_still_probes_once() {
            let calls = Cell::new(0);
            let err = poll_until::<(), _>(&fast(0), || {
                calls.set(calls.get() + 1);
                Ok(None)
            })
            .unwrap_err();
            assert!(matches!(err, ProbeError::Timeout { .. }));
            assert_eq!(calls.get(), 1);
        }

        #[test]
        fn test_error_stops_polling() {
            let calls = Cell::new(0);
            let err = poll_until::<(), _>(&fast(1_000), || {
                calls.set(calls.get() + 1);
                Err(ProbeError::session("gone"))
            })
            .unwrap_err();
            assert!(matches!(err, ProbeError::Session { .. }));
            assert_eq!(calls.get(), 1);
        }

        #[test]
        fn test_does_not_overshoot_deadline() {
            let budget = WaitBudget::default()
                .with_timeout(30)
                .with_poll_interval(10_000);
            let start = Instant::now();
            let _ = poll_until::<(), _>(&budget, || Ok(None));
            assert!(start.elapsed() < Duration::from_secs(5));
        }
    }
}
