//! Cluster registry
//!
//! Maps cluster names to scheduler endpoints and builds a [`SchedulerClient`]
//! for a cluster on demand. Loaded from a JSON document:
//!
//! ```json
//! {"clusters": [{"name": "west", "scheduler_url": "http://scheduler.west:8081"}]}
//! ```

use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::Path;
use tracing::debug;

use crate::SchedulerClient;
use crate::error::{ClientError, Result};

/// A named cluster and the scheduler serving it
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cluster {
    pub name: String,
    pub scheduler_url: String,
}

#[derive(Deserialize)]
struct ClusterFile {
    #[serde(default)]
    clusters: Vec<Cluster>,
}

/// Known clusters, used as the cluster-to-client factory
#[derive(Debug, Clone, Default)]
pub struct ClusterRegistry {
    clusters: Vec<Cluster>,
    /// Scheduler used for clusters missing from the registry
    fallback_url: Option<String>,
}

impl ClusterRegistry {
    /// Build a registry, validating names and URLs
    pub fn new(clusters: Vec<Cluster>) -> Result<Self> {
        let mut seen = HashSet::new();
        for cluster in &clusters {
            if cluster.name.is_empty() {
                return Err(ClientError::InvalidConfig(
                    "cluster name cannot be empty".to_string(),
                ));
            }
            if !seen.insert(cluster.name.as_str()) {
                return Err(ClientError::InvalidConfig(format!(
                    "cluster '{}' is defined more than once",
                    cluster.name
                )));
            }
            check_url(&cluster.scheduler_url)?;
        }

        Ok(Self {
            clusters,
            fallback_url: None,
        })
    }

    /// Parse a registry from its JSON representation
    pub fn from_json(json: &str) -> Result<Self> {
        let file: ClusterFile = serde_json::from_str(json)
            .map_err(|e| ClientError::InvalidConfig(format!("malformed cluster file: {}", e)))?;
        Self::new(file.clusters)
    }

    /// Load a registry from a JSON file
    pub fn load(path: &Path) -> Result<Self> {
        let json = std::fs::read_to_string(path).map_err(|e| {
            ClientError::InvalidConfig(format!("cannot read {}: {}", path.display(), e))
        })?;
        let registry = Self::from_json(&json)?;
        debug!(
            "Loaded {} cluster(s) from {}",
            registry.clusters.len(),
            path.display()
        );
        Ok(registry)
    }

    /// Serve clusters missing from the registry with the scheduler at `url`
    pub fn with_fallback_url(mut self, url: impl Into<String>) -> Result<Self> {
        let url = url.into();
        check_url(&url)?;
        self.fallback_url = Some(url);
        Ok(self)
    }

    /// All registered clusters
    pub fn clusters(&self) -> &[Cluster] {
        &self.clusters
    }

    /// Look up a cluster by name
    pub fn get(&self, name: &str) -> Option<&Cluster> {
        self.clusters.iter().find(|c| c.name == name)
    }

    /// Build a scheduler client for `cluster`
    ///
    /// # Errors
    /// Returns [`ClientError::NotFound`] if the cluster is unknown and no
    /// fallback scheduler is configured.
    pub fn client(&self, cluster: &str) -> Result<SchedulerClient> {
        let url = match (self.get(cluster), &self.fallback_url) {
            (Some(known), _) => &known.scheduler_url,
            (None, Some(fallback)) => fallback,
            (None, None) => {
                return Err(ClientError::NotFound(format!("cluster '{}'", cluster)));
            }
        };

        Ok(SchedulerClient::new(cluster, url.as_str()))
    }
}

fn check_url(url: &str) -> Result<()> {
    if !url.starts_with("http://") && !url.starts_with("https://") {
        return Err(ClientError::InvalidConfig(format!(
            "scheduler url '{}' must start with http:// or https://",
            url
        )));
    }
    Ok(())
}
