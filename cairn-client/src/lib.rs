//! Cairn scheduler client
//!
//! A small, type-safe HTTP client for querying a Cairn scheduler, plus the
//! client-side logic that turns user-supplied job references into
//! fully-qualified [`JobKey`]s.
//!
//! # Example
//!
//! ```no_run
//! use cairn_client::{ClusterRegistry, resolver};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let registry = ClusterRegistry::load("clusters.json".as_ref())?;
//!     let args = vec!["west/www-data/prod/hello".to_string()];
//!
//!     let resolved = resolver::resolve(&args, None, |cluster| registry.client(cluster)).await?;
//!     println!("Resolved {}", resolved.key);
//!     Ok(())
//! }
//! ```

pub mod cluster;
pub mod error;
mod jobs;
pub mod resolver;

// Re-export commonly used types
pub use cairn_core::domain::job::JobKey;
pub use cluster::{Cluster, ClusterRegistry};
pub use error::{ClientError, Result};
pub use jobs::JobQuery;

use reqwest::Client;
use serde::de::DeserializeOwned;

/// HTTP client for one cluster's scheduler API
#[derive(Debug, Clone)]
pub struct SchedulerClient {
    /// Name of the cluster this scheduler serves
    cluster: String,
    /// Base URL of the scheduler (e.g., "http://localhost:8081")
    base_url: String,
    /// HTTP client instance
    client: Client,
}

impl SchedulerClient {
    /// Create a new scheduler client
    ///
    /// # Arguments
    /// * `cluster` - Name of the cluster the scheduler serves
    /// * `base_url` - The base URL of the scheduler API
    ///
    /// # Example
    /// ```
    /// use cairn_client::SchedulerClient;
    ///
    /// let client = SchedulerClient::new("west", "http://localhost:8081");
    /// ```
    pub fn new(cluster: impl Into<String>, base_url: impl Into<String>) -> Self {
        Self::with_client(cluster, base_url, Client::new())
    }

    /// Create a new scheduler client with a custom HTTP client
    ///
    /// This allows you to configure timeouts, proxies, TLS settings, etc.
    pub fn with_client(
        cluster: impl Into<String>,
        base_url: impl Into<String>,
        client: Client,
    ) -> Self {
        let base_url = base_url.into();
        Self {
            cluster: cluster.into(),
            base_url: base_url.trim_end_matches('/').to_string(),
            client,
        }
    }

    /// Get the base URL of the scheduler
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    // =============================================================================
    // Response Handlers
    // =============================================================================

    /// Handle an API response and deserialize JSON
    ///
    /// This method checks the status code and returns an appropriate error if
    /// the request failed, or deserializes the response body if successful.
    async fn handle_response<T: DeserializeOwned>(&self, response: reqwest::Response) -> Result<T> {
        let status = response.status();

        if !status.is_success() {
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(ClientError::api_error(status.as_u16(), error_text));
        }

        response
            .json()
            .await
            .map_err(|e| ClientError::ParseError(format!("Failed to parse JSON response: {}", e)))
    }
}
