//! Configuration module
//!
//! Handles CLI configuration: where the cluster registry lives and an
//! optional catch-all scheduler for clusters it does not list.

use anyhow::{Context, Result};
use cairn_client::ClusterRegistry;
use std::path::PathBuf;

/// CLI configuration
#[derive(Debug, Clone, Default)]
pub struct Config {
    /// Cluster registry file given explicitly; must exist when set
    pub clusters_file: Option<PathBuf>,

    /// Scheduler URL used for clusters missing from the registry
    pub scheduler_url: Option<String>,
}

impl Config {
    /// Build the cluster registry used as the client factory
    ///
    /// Without an explicit file, `~/.cairn/clusters.json` is read if present.
    pub fn registry(&self) -> Result<ClusterRegistry> {
        let registry = match &self.clusters_file {
            Some(path) => ClusterRegistry::load(path)
                .with_context(|| format!("Failed to load clusters from {}", path.display()))?,
            None => match default_clusters_file().filter(|p| p.is_file()) {
                Some(path) => ClusterRegistry::load(&path)
                    .with_context(|| format!("Failed to load clusters from {}", path.display()))?,
                None => ClusterRegistry::default(),
            },
        };

        match &self.scheduler_url {
            Some(url) => registry
                .with_fallback_url(url.as_str())
                .context("Invalid scheduler URL"),
            None => Ok(registry),
        }
    }
}

fn default_clusters_file() -> Option<PathBuf> {
    std::env::var_os("HOME").map(|home| PathBuf::from(home).join(".cairn").join("clusters.json"))
}
