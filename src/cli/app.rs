use clap::Parser;
use std::path::PathBuf;

use graph_table_sync::config::DEFAULT_OUTPUT_PATH;

#[derive(Parser, Debug)]
#[command(name = "graph-table-sync")]
#[command(about = "Pull an Excel table from SharePoint via Microsoft Graph and write a JSON stock snapshot")]
pub struct Cli {
    /// Destination of the JSON snapshot
    #[arg(short, long, default_value = DEFAULT_OUTPUT_PATH)]
    pub output: PathBuf,

    /// Load environment variables from this file instead of ./.env
    #[arg(long)]
    pub env_file: Option<PathBuf>,

    /// Run the whole pipeline but do not write the snapshot
    #[arg(long)]
    pub dry_run: bool,

    /// Enable debug logging
    #[arg(short, long)]
    pub verbose: bool,
}
