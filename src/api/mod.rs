//! Microsoft Graph API plumbing
//!
//! Token acquisition, the retrying GET client, endpoint builders and the wire
//! models the sync pipeline consumes.

pub mod auth;
pub mod client;
pub mod constants;
pub mod models;
pub mod resilience;

pub use auth::{AccessToken, AuthManager, Credentials};
pub use client::GraphClient;
pub use models::{ODataPage, TableColumn, TableRow};
pub use resilience::{ApiLogger, RetryConfig, RetryPolicy, RetryableError};
