//! Commands module
//!
//! Defines all CLI commands and their handlers.

mod job;
mod sandbox;

pub use job::JobCommands;
pub use sandbox::SandboxCommands;

use anyhow::Result;
use clap::Subcommand;

use crate::config::Config;

/// Top-level CLI commands
#[derive(Subcommand)]
pub enum Commands {
    /// Job lookup on a scheduler
    Job {
        #[command(subcommand)]
        command: JobCommands,
    },
    /// Sandbox discovery on a worker node
    Sandbox {
        #[command(subcommand)]
        command: SandboxCommands,
    },
}

/// Handle a CLI command
///
/// Routes the command to the appropriate handler module.
///
/// # Arguments
/// * `command` - The command to execute
/// * `config` - The CLI configuration
pub async fn handle_command(command: Commands, config: &Config) -> Result<()> {
    match command {
        Commands::Job { command } => job::handle_job_command(command, config).await,
        Commands::Sandbox { command } => sandbox::handle_sandbox_command(command),
    }
}
