//! Retry policies with exponential backoff
//!
//! Decides which Graph failures are transient and how long to wait between
//! attempts. The schedule is deterministic; there is no jitter.

use std::time::Duration;

/// Configuration for retry behavior
#[derive(Debug, Clone, PartialEq)]
pub struct RetryConfig {
    pub max_attempts: u32,
    pub base_delay: Duration,
    pub max_delay: Duration,
    pub backoff_multiplier: f64,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_attempts: 6,
            base_delay: Duration::from_secs(2),
            max_delay: Duration::from_secs(30),
            backoff_multiplier: 1.8,
        }
    }
}

impl RetryConfig {
    /// Single attempt, no waiting
    pub fn disabled() -> Self {
        Self {
            max_attempts: 1,
            base_delay: Duration::ZERO,
            max_delay: Duration::ZERO,
            backoff_multiplier: 1.0,
        }
    }
}

/// Types of errors and their retry behavior
#[derive(Debug, Clone, PartialEq)]
pub enum RetryableError {
    /// Network-level errors (connection refused, timeout, DNS)
    Network,
    /// HTTP 429 Too Many Requests
    RateLimited,
    /// HTTP 500, 502, 503, 504
    ServerError(u16),
    /// Any other 4xx
    ClientError(u16),
    /// Anything else (other 5xx, unexpected 1xx/3xx)
    Unknown(u16),
}

impl RetryableError {
    /// Determine if this error type should be retried
    pub fn should_retry(&self) -> bool {
        match self {
            RetryableError::Network => true,
            RetryableError::RateLimited => true,
            RetryableError::ServerError(_) => true,
            RetryableError::ClientError(_) => false,
            RetryableError::Unknown(_) => false,
        }
    }

    /// Classify an HTTP status code into retry behavior
    pub fn from_status_code(status: u16) -> Self {
        match status {
            429 => RetryableError::RateLimited,
            500 | 502 | 503 | 504 => RetryableError::ServerError(status),
            400..=499 => RetryableError::ClientError(status),
            _ => RetryableError::Unknown(status),
        }
    }

    /// Classify a reqwest transport error
    pub fn from_reqwest_error(error: &reqwest::Error) -> Option<Self> {
        if error.is_timeout() || error.is_connect() || error.is_request() {
            Some(RetryableError::Network)
        } else {
            None
        }
    }
}

/// Parse a `Retry-After` hint. Only plain non-negative integers (seconds) are honored.
pub fn parse_retry_after(value: Option<&str>) -> Option<Duration> {
    let value = value?;
    if value.is_empty() || !value.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    value.parse::<u64>().ok().map(Duration::from_secs)
}

/// Retry policy that implements capped exponential backoff
#[derive(Debug, Clone)]
pub struct RetryPolicy {
    config: RetryConfig,
}

impl RetryPolicy {
    pub fn new(config: RetryConfig) -> Self {
        Self { config }
    }

    pub fn max_attempts(&self) -> u32 {
        self.config.max_attempts.max(1)
    }

    /// Whether another attempt is allowed after `attempt` (1-based) failed
    pub fn has_attempts_left(&self, attempt: u32) -> bool {
        attempt < self.max_attempts()
    }

    /// Backoff before the attempt following `attempt` (1-based)
    pub fn calculate_delay(&self, attempt: u32) -> Duration {
        let exponent = attempt.saturating_sub(1) as i32;
        let delay_secs = self.config.base_delay.as_secs_f64()
            * self.config.backoff_multiplier.powi(exponent);

        let cap = self.config.max_delay.as_secs_f64();
        Duration::from_secs_f64(delay_secs.min(cap))
    }

    /// Wait before the next attempt: the server hint wins over the backoff schedule
    pub fn wait_for(&self, attempt: u32, retry_after: Option<&str>) -> Duration {
        parse_retry_after(retry_after).unwrap_or_else(|| self.calculate_delay(attempt))
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::new(RetryConfig::default())
    }
}
