use anyhow::Result;
use clap::Parser;
use log::{error, info};
use std::io::Write;
use std::path::PathBuf;

use graph_table_sync::config::{self, SyncConfig};
use graph_table_sync::error::{EXIT_UNEXPECTED, SyncError, SyncResult};
use graph_table_sync::sync::{self, RunOptions};

mod cli;

use cli::Cli;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    // Env file first so a RUST_LOG it sets reaches the logger
    let env_file = config::load_env_file(cli.env_file.as_deref());
    init_logger(cli.verbose);

    if let Err(err) = run(cli, env_file).await {
        let code = match err.downcast_ref::<SyncError>() {
            Some(sync_err) if sync_err.is_diagnosed() => {
                error!("{}", sync_err);
                sync_err.exit_code()
            }
            _ => {
                error!("Fatal error: {:?}", err);
                EXIT_UNEXPECTED
            }
        };
        std::process::exit(code);
    }
}

async fn run(cli: Cli, env_file: SyncResult<Option<PathBuf>>) -> Result<()> {
    info!("Starting graph-table-sync");

    if let Some(path) = env_file? {
        info!("Loaded environment from {}", path.display());
    }
    let config = SyncConfig::from_env()?.with_output_path(cli.output);

    let options = RunOptions {
        dry_run: cli.dry_run,
        ..RunOptions::default()
    };

    let report = sync::run(&config, &options).await?;
    info!(
        "DONE: {} rows fetched, {} items {} {}",
        report.rows_fetched,
        report.records_written,
        if report.dry_run { "would be written to" } else { "written to" },
        report.output_path.display()
    );

    Ok(())
}

/// Log to stderr as `<timestamp> | <LEVEL> | <message>`; `RUST_LOG` still wins
fn init_logger(verbose: bool) {
    let default_level = if verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_level))
        .format(|buf, record| {
            writeln!(
                buf,
                "{} | {} | {}",
                chrono::Local::now().format("%Y-%m-%d %H:%M:%S%.3f"),
                record.level(),
                record.args()
            )
        })
        .init();
}
