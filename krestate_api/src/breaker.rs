//! Circuit breaker guarding upstream open-data endpoints.

use std::sync::Mutex;
use std::time::{Duration, Instant};

use crate::errors::FetchError;

/// How often a user-facing "temporarily blocked" notification may be
/// emitted while the circuit is open.
const NOTIFICATION_INTERVAL: Duration = Duration::from_secs(10);

/// Circuit breaker states.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CircuitState {
    /// Normal operation.
    Closed,
    /// Failing; reject requests until the recovery timeout elapses.
    Open,
    /// Cooling down; a single trial request probes recovery.
    HalfOpen,
}

/// Failure threshold and recovery timing for one upstream target.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BreakerConfig {
    /// Consecutive failures that open the circuit.
    pub failure_threshold: u32,
    /// Cooldown before a trial request is allowed through.
    pub recovery_timeout: Duration,
}

impl Default for BreakerConfig {
    fn default() -> Self {
        Self {
            failure_threshold: 5,
            recovery_timeout: Duration::from_secs(30),
        }
    }
}

#[derive(Debug)]
struct BreakerInner {
    state: CircuitState,
    failure_count: u32,
    last_failure: Option<Instant>,
    last_notification: Option<Instant>,
    probe_in_flight: bool,
}

impl Default for BreakerInner {
    fn default() -> Self {
        Self {
            state: CircuitState::Closed,
            failure_count: 0,
            last_failure: None,
            last_notification: None,
            probe_in_flight: false,
        }
    }
}

/// Thread-safe circuit breaker shared by all in-flight requests to one
/// upstream. State transitions happen only inside [`can_execute`],
/// [`record_success`], and [`record_failure`]; the breaker itself never
/// performs network calls and never panics.
///
/// [`can_execute`]: CircuitBreaker::can_execute
/// [`record_success`]: CircuitBreaker::record_success
/// [`record_failure`]: CircuitBreaker::record_failure
#[derive(Debug)]
pub struct CircuitBreaker {
    config: BreakerConfig,
    inner: Mutex<BreakerInner>,
}

impl Default for CircuitBreaker {
    fn default() -> Self {
        Self::new(BreakerConfig::default())
    }
}

impl CircuitBreaker {
    pub fn new(config: BreakerConfig) -> Self {
        Self {
            config,
            inner: Mutex::new(BreakerInner::default()),
        }
    }

    /// Check whether a request may proceed.
    ///
    /// In `Open`, the state advances to `HalfOpen` once the recovery
    /// timeout has elapsed since the last failure, and the caller becomes
    /// the single trial request. Further calls are rejected until that
    /// trial reports an outcome. Rejections emit at most one user-facing
    /// warning per 10-second window regardless of call volume.
    pub fn can_execute(&self) -> Result<(), FetchError> {
        let mut inner = self.lock();
        match inner.state {
            CircuitState::Closed => Ok(()),
            CircuitState::HalfOpen => {
                if inner.probe_in_flight {
                    Err(FetchError::CircuitOpen)
                } else {
                    inner.probe_in_flight = true;
                    Ok(())
                }
            }
            CircuitState::Open => {
                let elapsed = inner.last_failure.map(|at| at.elapsed());
                if elapsed.is_some_and(|e| e >= self.config.recovery_timeout) {
                    inner.state = CircuitState::HalfOpen;
                    inner.probe_in_flight = true;
                    tracing::info!(
                        failure_count = inner.failure_count,
                        recovery_timeout_secs = self.config.recovery_timeout.as_secs(),
                        "circuit breaker half-open, allowing trial request"
                    );
                    return Ok(());
                }

                let now = Instant::now();
                let notify = inner
                    .last_notification
                    .map_or(true, |at| now.duration_since(at) >= NOTIFICATION_INTERVAL);
                if notify {
                    inner.last_notification = Some(now);
                    let remaining = self
                        .config
                        .recovery_timeout
                        .saturating_sub(elapsed.unwrap_or_default());
                    tracing::warn!(
                        recovery_in_secs = remaining.as_secs(),
                        "API requests temporarily blocked due to repeated failures"
                    );
                }
                Err(FetchError::CircuitOpen)
            }
        }
    }

    /// Record a successful request, closing the circuit and clearing the
    /// failure count.
    pub fn record_success(&self) {
        let mut inner = self.lock();
        if inner.state == CircuitState::HalfOpen {
            tracing::info!(
                previous_failures = inner.failure_count,
                "circuit breaker recovered"
            );
        }
        inner.failure_count = 0;
        inner.state = CircuitState::Closed;
        inner.probe_in_flight = false;
    }

    /// Record a failed request. A failed half-open trial reopens the
    /// circuit immediately; reaching the threshold while closed opens it.
    pub fn record_failure(&self) {
        let mut inner = self.lock();
        inner.failure_count = inner.failure_count.saturating_add(1);
        inner.last_failure = Some(Instant::now());
        inner.probe_in_flight = false;

        if inner.state == CircuitState::HalfOpen {
            inner.state = CircuitState::Open;
            tracing::warn!(failure_count = inner.failure_count, "circuit breaker reopened");
        } else if inner.state == CircuitState::Closed
            && inner.failure_count >= self.config.failure_threshold
        {
            inner.state = CircuitState::Open;
            tracing::warn!(
                failure_count = inner.failure_count,
                threshold = self.config.failure_threshold,
                recovery_timeout_secs = self.config.recovery_timeout.as_secs(),
                "circuit breaker opened"
            );
        }
    }

    /// Current state.
    pub fn state(&self) -> CircuitState {
        self.lock().state
    }

    /// Consecutive failure count.
    pub fn failure_count(&self) -> u32 {
        self.lock().failure_count
    }

    /// Clear all failure history, returning to `Closed`. Used by tests and
    /// the configuration-reload path.
    pub fn reset(&self) {
        *self.lock() = BreakerInner::default();
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, BreakerInner> {
        self.inner.lock().unwrap_or_else(|e| e.into_inner())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fast_breaker(threshold: u32, recovery_ms: u64) -> CircuitBreaker {
        CircuitBreaker::new(BreakerConfig {
            failure_threshold: threshold,
            recovery_timeout: Duration::from_millis(recovery_ms),
        })
    }

    #[test]
    fn opens_after_threshold_failures() {
        let breaker = fast_breaker(5, 50);
        for _ in 0..4 {
            breaker.record_failure();
            assert_eq!(breaker.state(), CircuitState::Closed);
        }
        breaker.record_failure();
        assert_eq!(breaker.state(), CircuitState::Open);
        assert_eq!(breaker.can_execute(), Err(FetchError::CircuitOpen));
    }

    #[test]
    fn success_resets_failure_count() {
        let breaker = fast_breaker(3, 50);
        breaker.record_failure();
        breaker.record_failure();
        breaker.record_success();
        assert_eq!(breaker.failure_count(), 0);
        breaker.record_failure();
        breaker.record_failure();
        assert_eq!(breaker.state(), CircuitState::Closed);
    }

    #[test]
    fn half_open_allows_exactly_one_trial() {
        let breaker = fast_breaker(1, 5);
        breaker.record_failure();
        assert_eq!(breaker.state(), CircuitState::Open);

        std::thread::sleep(Duration::from_millis(10));

        // First poll becomes the trial; repeated polls are rejected until
        // the trial reports back.
        assert!(breaker.can_execute().is_ok());
        assert_eq!(breaker.state(), CircuitState::HalfOpen);
        assert_eq!(breaker.can_execute(), Err(FetchError::CircuitOpen));
        assert_eq!(breaker.can_execute(), Err(FetchError::CircuitOpen));

        breaker.record_success();
        assert_eq!(breaker.state(), CircuitState::Closed);
        assert!(breaker.can_execute().is_ok());
    }

    #[test]
    fn failed_trial_reopens_immediately() {
        let breaker = fast_breaker(1, 5);
        breaker.record_failure();
        std::thread::sleep(Duration::from_millis(10));
        assert!(breaker.can_execute().is_ok());

        breaker.record_failure();
        assert_eq!(breaker.state(), CircuitState::Open);
        assert_eq!(breaker.can_execute(), Err(FetchError::CircuitOpen));
    }

    #[test]
    fn blocked_while_cooldown_running() {
        let breaker = fast_breaker(1, 10_000);
        breaker.record_failure();
        assert_eq!(breaker.can_execute(), Err(FetchError::CircuitOpen));
        assert_eq!(breaker.state(), CircuitState::Open);
    }

    #[test]
    fn reset_clears_state() {
        let breaker = fast_breaker(1, 10_000);
        breaker.record_failure();
        assert_eq!(breaker.state(), CircuitState::Open);
        breaker.reset();
        assert_eq!(breaker.state(), CircuitState::Closed);
        assert_eq!(breaker.failure_count(), 0);
        assert!(breaker.can_execute().is_ok());
    }
}
