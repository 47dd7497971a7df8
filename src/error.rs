//! Error types for the table sync pipeline.
//!
//! Every condition the pipeline can diagnose on its own (bad configuration,
//! rejected credentials, unresolvable resources, empty tables) has a dedicated
//! variant and maps to exit code 2. Transport, I/O and JSON failures are
//! surfaced as-is and treated as unexpected (exit code 1).

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias using `SyncError`.
pub type SyncResult<T> = Result<T, SyncError>;

/// Exit code for a diagnosed fatal condition.
pub const EXIT_FATAL: i32 = 2;

/// Exit code for anything the pipeline did not anticipate.
pub const EXIT_UNEXPECTED: i32 = 1;

/// Errors that can abort a sync run.
#[derive(Debug, Error)]
pub enum SyncError {
    /// One or more mandatory environment variables are absent or blank.
    #[error("Missing required env vars: {}. Check secrets / workflow env mapping.", .0.join(", "))]
    MissingEnv(Vec<String>),

    /// An explicitly requested env file could not be loaded.
    #[error("Failed to load env file {path}: {message}")]
    EnvFile { path: PathBuf, message: String },

    /// The token endpoint answered with something other than 200.
    #[error("Token request failed: HTTP {status} - {body}")]
    TokenRequest { status: u16, body: String },

    /// The token endpoint answered 200 without an `access_token`.
    #[error("Token response missing access_token.")]
    MissingAccessToken,

    /// Graph answered with a status that is never retried.
    #[error("Graph GET failed: {url}\nHTTP {status} - {body}")]
    GraphStatus { url: String, status: u16, body: String },

    /// Every attempt hit a retriable status.
    #[error("Graph GET failed after {attempts} attempts: {url} (last HTTP {status})")]
    RetriesExhausted { url: String, attempts: u32, status: u16 },

    /// A resolution step returned a body without an `id`.
    #[error("Could not resolve {resource} id from response: {body}")]
    MissingId { resource: &'static str, body: String },

    /// The table column listing came back empty.
    #[error("No columns returned for table '{0}'. Check SP_TABLE_NAME (exact Excel table name).")]
    NoColumns(String),

    /// Pagination finished without a single row.
    #[error("Parsed 0 rows from table '{0}'. Possibly empty table or permission issue.")]
    NoRows(String),

    /// HTTP transport error.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// JSON parsing or serialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Filesystem error while writing the snapshot.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl SyncError {
    /// Process exit code for this error.
    pub fn exit_code(&self) -> i32 {
        match self {
            SyncError::Http(_) | SyncError::Json(_) | SyncError::Io(_) => EXIT_UNEXPECTED,
            _ => EXIT_FATAL,
        }
    }

    /// Whether the error is one of the diagnosed fatal conditions.
    pub fn is_diagnosed(&self) -> bool {
        self.exit_code() == EXIT_FATAL
    }
}

/// Cut a response body down to `max_chars` characters for diagnostics.
pub fn excerpt(body: &str, max_chars: usize) -> String {
    match body.char_indices().nth(max_chars) {
        Some((idx, _)) => body[..idx].to_string(),
        None => body.to_string(),
    }
}
