//! Job query endpoints

use async_trait::async_trait;
use cairn_core::dto::job::GetJobsResponse;
use tracing::debug;

use crate::SchedulerClient;
use crate::error::{ClientError, Result};

/// Read-only job queries against a single cluster's scheduler
///
/// This is the only scheduler capability the resolver needs, which keeps it
/// testable without a live scheduler.
#[async_trait]
pub trait JobQuery: Send + Sync {
    /// Name of the cluster the queries are answered for
    fn cluster(&self) -> &str;

    /// Fetch every job configuration owned by `role`
    ///
    /// Transport and HTTP failures are returned as errors; a failure reported
    /// inside the response envelope is returned as-is for the caller to check.
    async fn get_jobs(&self, role: &str) -> Result<GetJobsResponse>;
}

#[async_trait]
impl JobQuery for SchedulerClient {
    fn cluster(&self) -> &str {
        &self.cluster
    }

    async fn get_jobs(&self, role: &str) -> Result<GetJobsResponse> {
        if role.is_empty() {
            return Err(ClientError::InvalidRequest("role must not be empty".to_string()));
        }

        let url = format!("{}/api/jobs", self.base_url);
        debug!("Querying jobs for role {} on {}", role, url);

        let response = self
            .client
            .get(&url)
            .query(&[("role", role)])
            .send()
            .await?;

        self.handle_response(response).await
    }
}
