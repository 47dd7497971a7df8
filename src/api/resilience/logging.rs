//! Structured request logging with correlation tracking
//!
//! Each Graph GET gets a correlation id so that the retries and the final
//! outcome of one logical request can be followed in the log output.

use log::{debug, error, warn};
use std::time::{Duration, Instant};

/// Structured logger for API requests with correlation tracking
#[derive(Debug, Clone, Default)]
pub struct ApiLogger;

/// Context for a single logical request
#[derive(Debug, Clone)]
pub struct RequestContext {
    /// Unique correlation ID for this request
    pub correlation_id: String,
    /// HTTP method
    pub method: &'static str,
    /// Target URL
    pub url: String,
    /// Start time for elapsed tracking
    pub start_time: Instant,
}

impl RequestContext {
    pub fn elapsed(&self) -> Duration {
        self.start_time.elapsed()
    }
}

impl ApiLogger {
    pub fn new() -> Self {
        Self
    }

    /// Start tracking a new request
    pub fn start_request(&self, method: &'static str, url: &str) -> RequestContext {
        let context = RequestContext {
            correlation_id: uuid::Uuid::new_v4().to_string(),
            method,
            url: url.to_string(),
            start_time: Instant::now(),
        };

        debug!(
            "[{}] {} {} started",
            context.correlation_id, context.method, context.url
        );

        context
    }

    /// Log a transient failure that will be retried
    pub fn log_retry(
        &self,
        context: &RequestContext,
        reason: &str,
        attempt: u32,
        max_attempts: u32,
        wait: Duration,
    ) {
        warn!(
            "[{}] Transient {} on {}. attempt={}/{} waiting={:.2}s",
            context.correlation_id,
            reason,
            context.method,
            attempt,
            max_attempts,
            wait.as_secs_f64()
        );
    }

    /// Log a successful completion
    pub fn log_success(&self, context: &RequestContext, status: u16, attempts: u32) {
        debug!(
            "[{}] {} {} -> HTTP {} after {} attempt(s) in {:?}",
            context.correlation_id,
            context.method,
            context.url,
            status,
            attempts,
            context.elapsed()
        );
    }

    /// Log a terminal failure
    pub fn log_failure(&self, context: &RequestContext, message: &str, attempts: u32) {
        error!(
            "[{}] {} {} failed after {} attempt(s) in {:?}: {}",
            context.correlation_id,
            context.method,
            context.url,
            attempts,
            context.elapsed(),
            message
        );
    }
}
