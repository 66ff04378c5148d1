//! Retry policy configuration with optional exponential backoff

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use crate::config::{ConfigError, ConfigResult, ConfigValidator};
use crate::error::Error;

/// Predicate consulted after a failed attempt; receives the error and the
/// 1-based number of the attempt that failed.
pub type ShouldRetry = Arc<dyn Fn(&Error, u32) -> bool + Send + Sync>;

/// Retry policy configuration
#[derive(Clone)]
pub struct RetryPolicy {
    /// Maximum number of invocations, the first one included
    pub attempts: u32,
    /// Pause before the first retry
    pub delay: Option<Duration>,
    /// Growth factor applied to `delay` for each further retry
    pub backoff_multiplier: f64,
    /// Stops retrying early when it returns false
    pub should_retry: Option<ShouldRetry>,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            attempts: 3,
            delay: None,
            backoff_multiplier: 1.0,
            should_retry: None,
        }
    }
}

impl RetryPolicy {
    #[must_use]
    pub fn new(attempts: u32) -> Self {
        Self {
            attempts,
            ..Self::default()
        }
    }

    /// Single attempt only
    #[inline]
    #[must_use]
    pub fn no_retry() -> Self {
        Self::new(1)
    }

    #[must_use]
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    #[must_use]
    pub fn with_backoff(mut self, multiplier: f64) -> Self {
        self.backoff_multiplier = multiplier;
        self
    }

    #[must_use]
    pub fn with_should_retry<F>(mut self, predicate: F) -> Self
    where
        F: Fn(&Error, u32) -> bool + Send + Sync + 'static,
    {
        self.should_retry = Some(Arc::new(predicate));
        self
    }

    /// Pause before retry number `retry` (1-based): `delay * multiplier^(retry - 1)`.
    #[must_use]
    pub fn delay_for(&self, retry: u32) -> Duration {
        let Some(delay) = self.delay else {
            return Duration::ZERO;
        };
        if retry <= 1 {
            return delay;
        }
        let exponent = i32::try_from(retry - 1).unwrap_or(i32::MAX);
        let scaled = delay.as_secs_f64() * self.backoff_multiplier.powi(exponent);
        Duration::try_from_secs_f64(scaled).unwrap_or(Duration::MAX)
    }

    /// Cancellation is terminal; everything else defers to `should_retry`.
    #[must_use]
    pub fn is_retryable(&self, error: &Error, attempt: u32) -> bool {
        if error.is_cancel() {
            return false;
        }
        self.should_retry
            .as_ref()
            .is_none_or(|predicate| predicate(error, attempt))
    }

    /// Validate policy configuration for consistency
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidParameter` for zero attempts or a
    /// non-positive multiplier.
    pub fn validate(&self) -> ConfigResult<()> {
        if self.attempts == 0 {
            return Err(ConfigError::InvalidParameter("attempts must be at least 1".to_string()));
        }
        if self.backoff_multiplier <= 0.0 || !self.backoff_multiplier.is_finite() {
            return Err(ConfigError::InvalidParameter("backoff_multiplier must be positive".to_string()));
        }
        if let Some(delay) = self.delay
            && !delay.is_zero()
        {
            ConfigValidator::validate_timeout(delay, "delay")?;
        }
        Ok(())
    }
}

impl fmt::Debug for RetryPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RetryPolicy")
            .field("attempts", &self.attempts)
            .field("delay", &self.delay)
            .field("backoff_multiplier", &self.backoff_multiplier)
            .field("should_retry", &self.should_retry.is_some())
            .finish()
    }
}
