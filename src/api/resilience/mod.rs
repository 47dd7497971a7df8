//! Resilience features for Graph requests
//!
//! Provides the retry policy and correlation-tracked request logging used by
//! the Graph client.

pub mod logging;
pub mod retry;

pub use logging::{ApiLogger, RequestContext};
pub use retry::{RetryConfig, RetryPolicy, RetryableError, parse_retry_after};
