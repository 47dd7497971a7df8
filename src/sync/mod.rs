//! The table sync pipeline
//!
//! Token → site → drive item → columns → rows → normalized records →
//! snapshot. Each stage runs once, in order, and the snapshot is only written
//! after everything before it succeeded, so a failed run leaves the previous
//! snapshot untouched.

pub mod collector;
pub mod normalizer;
pub mod resolver;
pub mod snapshot;

use log::info;
use std::path::PathBuf;

use crate::api::{AuthManager, GraphClient, RetryConfig};
use crate::config::SyncConfig;
use crate::error::SyncResult;

pub use collector::RowCollector;
pub use normalizer::{FieldAliases, RawRow, StockRecord, normalize_rows};
pub use resolver::{ResolvedTable, ResourceResolver};
pub use snapshot::write_snapshot;

/// Knobs that do not come from the environment
#[derive(Debug, Clone, Default)]
pub struct RunOptions {
    /// Run everything except the final write
    pub dry_run: bool,
    pub retry: RetryConfig,
}

/// Outcome of a completed run
#[derive(Debug, Clone, PartialEq)]
pub struct SyncReport {
    pub rows_fetched: usize,
    pub records_written: usize,
    pub output_path: PathBuf,
    pub dry_run: bool,
}

/// Execute one full sync
pub async fn run(config: &SyncConfig, options: &RunOptions) -> SyncResult<SyncReport> {
    let auth = AuthManager::new(config.endpoints.login_base.clone())?;
    let token = auth.authenticate(&config.credentials).await?;

    let client = GraphClient::with_retry_policy(
        config.endpoints.graph_base.clone(),
        token,
        options.retry.clone(),
    )?;

    let table = ResourceResolver::new(&client).resolve(&config.table).await?;
    let rows = RowCollector::new(&client).collect(&table).await?;

    let aliases = FieldAliases::with_overrides(&config.overrides);
    let records = normalize_rows(&rows, &aliases);
    info!(
        "Normalized {} of {} rows ({} without SKU dropped)",
        records.len(),
        rows.len(),
        rows.len() - records.len()
    );

    let records_written = if options.dry_run {
        info!("Dry run: skipping write to {}", config.output_path.display());
        records.len()
    } else {
        write_snapshot(&config.output_path, records)?
    };

    Ok(SyncReport {
        rows_fetched: rows.len(),
        records_written,
        output_path: config.output_path.clone(),
        dry_run: options.dry_run,
    })
}
