//! Configuration for synchronization runs.

use exsync_report::DiagnosticLevel;
use std::time::Duration;

/// Configuration for the synchronization engine.
#[derive(Debug, Clone)]
pub struct SyncConfig {
    /// Bound on concurrent binary uploads within one run.
    pub upload_workers: usize,
    /// Interval between status polls after commit.
    pub poll_interval: Duration,
    /// Maximum elapsed time spent polling before the outcome is reported
    /// as indeterminate.
    pub poll_timeout: Duration,
    /// Timeout for individual remote requests.
    pub request_timeout: Duration,
    /// Minimum level retained in the run's diagnostics.
    pub diagnostics_level: DiagnosticLevel,
    /// Retry behavior for retryable failures.
    pub retry: RetryConfig,
}

impl SyncConfig {
    /// Creates a configuration with default values.
    #[must_use]
    pub fn new() -> Self {
        Self {
            upload_workers: 4,
            poll_interval: Duration::from_millis(500),
            poll_timeout: Duration::from_secs(60),
            request_timeout: Duration::from_secs(30),
            diagnostics_level: DiagnosticLevel::Info,
            retry: RetryConfig::default(),
        }
    }

    /// Sets the upload worker bound (clamped to at least 1).
    #[must_use]
    pub fn with_upload_workers(mut self, workers: usize) -> Self {
        self.upload_workers = workers.max(1);
        self
    }

    /// Sets the poll interval.
    #[must_use]
    pub fn with_poll_interval(mut self, interval: Duration) -> Self {
        self.poll_interval = interval;
        self
    }

    /// Sets the poll timeout.
    #[must_use]
    pub fn with_poll_timeout(mut self, timeout: Duration) -> Self {
        self.poll_timeout = timeout;
        self
    }

    /// Sets the per-request timeout.
    #[must_use]
    pub fn with_request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = timeout;
        self
    }

    /// Sets the diagnostics level.
    #[must_use]
    pub fn with_diagnostics_level(mut self, level: DiagnosticLevel) -> Self {
        self.diagnostics_level = level;
        self
    }

    /// Sets the retry configuration.
    #[must_use]
    pub fn with_retry(mut self, retry: RetryConfig) -> Self {
        self.retry = retry;
        self
    }
}

impl Default for SyncConfig {
    fn default() -> Self {
        Self::new()
    }
}

/// Configuration for retry behavior.
#[derive(Debug, Clone)]
pub struct RetryConfig {
    /// Maximum number of attempts, including the first.
    pub max_attempts: u32,
    /// Delay before the first retry.
    pub initial_delay: Duration,
    /// Upper bound on the delay between retries.
    pub max_delay: Duration,
    /// Multiplier for exponential backoff.
    pub backoff_multiplier: f64,
}

impl RetryConfig {
    /// Creates a retry configuration.
    #[must_use]
    pub fn new(max_attempts: u32) -> Self {
        Self {
            max_attempts,
            initial_delay: Duration::from_millis(200),
            max_delay: Duration::from_secs(15),
            backoff_multiplier: 2.0,
        }
    }

    /// Creates a configuration that never retries.
    #[must_use]
    pub fn no_retry() -> Self {
        Self {
            max_attempts: 1,
            initial_delay: Duration::ZERO,
            max_delay: Duration::ZERO,
            backoff_multiplier: 1.0,
        }
    }

    /// Sets the initial delay.
    #[must_use]
    pub fn with_initial_delay(mut self, delay: Duration) -> Self {
        self.initial_delay = delay;
        self
    }

    /// Sets the maximum delay.
    #[must_use]
    pub fn with_max_delay(mut self, delay: Duration) -> Self {
        self.max_delay = delay;
        self
    }

    /// Calculates the backoff delay before the given attempt (0-indexed;
    /// attempt 0 has no delay).
    #[must_use]
    pub fn delay_for_attempt(&self, attempt: u32) -> Duration {
        if attempt == 0 {
            return Duration::ZERO;
        }
        let scaled = self.initial_delay.as_secs_f64()
            * self.backoff_multiplier.powi(attempt.saturating_sub(1) as i32);
        Duration::from_secs_f64(scaled.min(self.max_delay.as_secs_f64()))
    }
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self::new(3)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn config_builder() {
        let config = SyncConfig::new()
            .with_upload_workers(8)
            .with_poll_interval(Duration::from_millis(100))
            .with_poll_timeout(Duration::from_secs(5));

        assert_eq!(config.upload_workers, 8);
        assert_eq!(config.poll_interval, Duration::from_millis(100));
        assert_eq!(config.poll_timeout, Duration::from_secs(5));
    }

    #[test]
    fn worker_bound_is_at_least_one() {
        let config = SyncConfig::new().with_upload_workers(0);
        assert_eq!(config.upload_workers, 1);
    }

    #[test]
    fn backoff_grows_and_caps() {
        let retry = RetryConfig::new(5)
            .with_initial_delay(Duration::from_millis(100))
            .with_max_delay(Duration::from_millis(300));

        assert_eq!(retry.delay_for_attempt(0), Duration::ZERO);
        assert_eq!(retry.delay_for_attempt(1), Duration::from_millis(100));
        assert_eq!(retry.delay_for_attempt(2), Duration::from_millis(200));
        // Capped by max_delay.
        assert_eq!(retry.delay_for_attempt(4), Duration::from_millis(300));
    }

    #[test]
    fn no_retry_makes_one_attempt() {
        assert_eq!(RetryConfig::no_retry().max_attempts, 1);
    }
}
