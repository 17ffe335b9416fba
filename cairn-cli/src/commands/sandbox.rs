//! Sandbox command handlers
//!
//! Locates and lists the run sandboxes laid out on a worker node.

use anyhow::{Context, Result, anyhow};
use cairn_core::sandbox::{self, SandboxFilter, SandboxLocation};
use clap::Subcommand;
use colored::*;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Sandbox subcommands
#[derive(Subcommand)]
pub enum SandboxCommands {
    /// List run sandboxes
    List {
        /// Sandbox root to scan (defaults to the root enclosing the current directory)
        #[arg(long)]
        root: Option<PathBuf>,

        /// Only show sandboxes of this slave
        #[arg(long)]
        slave_id: Option<String>,

        /// Only show sandboxes of this framework
        #[arg(long)]
        framework_id: Option<String>,

        /// Only show sandboxes of this executor
        #[arg(long)]
        executor_id: Option<String>,

        /// Only show sandboxes of this run
        #[arg(long)]
        run_id: Option<String>,
    },
    /// Print the sandbox root enclosing a path
    Root {
        /// Path inside a sandbox (defaults to the current directory)
        path: Option<PathBuf>,
    },
}

/// Handle sandbox commands
pub fn handle_sandbox_command(command: SandboxCommands) -> Result<()> {
    match command {
        SandboxCommands::List {
            root,
            slave_id,
            framework_id,
            executor_id,
            run_id,
        } => {
            let root = match root {
                Some(root) => root,
                None => PathBuf::from(root_of(&current_dir()?)?),
            };
            let filter = SandboxFilter {
                slave_id,
                framework_id,
                executor_id,
                run_id,
            };
            list_sandboxes(&root, &filter);
            Ok(())
        }
        SandboxCommands::Root { path } => {
            let path = match path {
                Some(path) => path,
                None => current_dir()?,
            };
            println!("{}", root_of(&path)?);
            Ok(())
        }
    }
}

fn current_dir() -> Result<PathBuf> {
    std::env::current_dir().context("Failed to read current directory")
}

fn root_of(path: &Path) -> Result<String> {
    sandbox::find_root(path)
        .ok_or_else(|| anyhow!("{} is not inside a sandbox", path.display()))
}

fn list_sandboxes(root: &Path, filter: &SandboxFilter) {
    debug!("Scanning {} for sandboxes", root.display());
    let sandboxes: Vec<SandboxLocation> = sandbox::scan(root)
        .filter(|location| location.matches(filter))
        .collect();

    if sandboxes.is_empty() {
        println!(
            "{}",
            format!("No sandboxes found under {}.", root.display()).yellow()
        );
        return;
    }

    println!(
        "{}",
        format!("Found {} sandbox(es) under {}:", sandboxes.len(), root.display()).bold()
    );
    println!();
    for location in &sandboxes {
        print_sandbox(location);
    }
}

fn print_sandbox(location: &SandboxLocation) {
    println!("  {} {}", "▸".cyan(), location.to_string().bold());
    if let Ok(path) = location.path() {
        println!("    Path: {}", path.display().to_string().dimmed());
    }
    println!();
}
