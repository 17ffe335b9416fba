//! Cairn CLI
//!
//! Command-line interface for resolving scheduler jobs and discovering the
//! run sandboxes on a worker node.

mod commands;
mod config;

use anyhow::Result;
use clap::Parser;
use commands::{Commands, handle_command};
use config::Config;
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "cairn")]
#[command(about = "Cairn scheduler client tooling", long_about = None)]
struct Cli {
    /// JSON file mapping cluster names to scheduler URLs
    #[arg(long, env = "CAIRN_CLUSTERS_FILE", global = true)]
    clusters_file: Option<PathBuf>,

    /// Scheduler URL for clusters not listed in the clusters file
    #[arg(long, env = "CAIRN_SCHEDULER_URL", global = true)]
    scheduler_url: Option<String>,

    /// Log progress to stderr
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    init_logging(cli.verbose);

    let config = Config {
        clusters_file: cli.clusters_file,
        scheduler_url: cli.scheduler_url,
    };

    handle_command(cli.command, &config).await
}

/// Logs go to stderr so command output on stdout stays scriptable
fn init_logging(verbose: bool) {
    let default_filter = if verbose {
        "cairn=info,cairn_client=info,cairn_core=debug"
    } else {
        "cairn=warn,cairn_client=warn,cairn_core=warn"
    };

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default_filter.into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}
