//! Job command handlers
//!
//! Resolves job references and lists the jobs a role owns.

use anyhow::{Context, Result, anyhow, bail};
use cairn_client::resolver::{self, ResolveError, Resolved};
use cairn_client::{ClientError, ClusterRegistry, JobQuery, SchedulerClient};
use cairn_core::dto::job::JobConfiguration;
use clap::Subcommand;
use colored::*;

use crate::config::Config;

/// Job subcommands
#[derive(Subcommand)]
pub enum JobCommands {
    /// Resolve a job reference to its fully-qualified key
    Resolve {
        /// CLUSTER/ROLE/ENV/NAME [CONFIG], or ROLE NAME together with --cluster
        #[arg(num_args = 0..=2)]
        args: Vec<String>,

        /// Cluster used by the ROLE NAME form
        #[arg(long)]
        cluster: Option<String>,
    },
    /// List the job configurations owned by a role
    List {
        /// Role owning the jobs
        role: String,

        /// Cluster to query
        #[arg(long)]
        cluster: String,
    },
}

/// Handle job commands
///
/// # Arguments
/// * `command` - The job command to execute
/// * `config` - The CLI configuration
pub async fn handle_job_command(command: JobCommands, config: &Config) -> Result<()> {
    let registry = config.registry()?;

    match command {
        JobCommands::Resolve { args, cluster } => {
            let resolved = resolver::resolve(&args, cluster.as_deref(), |c| registry.client(c))
                .await
                .map_err(|e| match e {
                    ResolveError::Client(e) => with_known_clusters(e, &registry),
                    other => other.into(),
                })?;
            print_resolved(&resolved);
            Ok(())
        }
        JobCommands::List { role, cluster } => {
            let client = registry
                .client(&cluster)
                .map_err(|e| with_known_clusters(e, &registry))?;
            list_jobs(&client, &role).await
        }
    }
}

/// Name the registered clusters when a cluster lookup fails
fn with_known_clusters(err: ClientError, registry: &ClusterRegistry) -> anyhow::Error {
    if !err.is_not_found() || registry.clusters().is_empty() {
        return err.into();
    }

    let names: Vec<&str> = registry.clusters().iter().map(|c| c.name.as_str()).collect();
    anyhow!("{} (known clusters: {})", err, names.join(", "))
}

/// List all job configurations of a role
async fn list_jobs(client: &SchedulerClient, role: &str) -> Result<()> {
    let response = client
        .get_jobs(role)
        .await
        .with_context(|| format!("Failed to fetch jobs for role {}", role))?;

    if !response.is_ok() {
        bail!(
            "Scheduler responded with {}: {}",
            response.response_code,
            response.message
        );
    }

    let configs = response.configs();
    if configs.is_empty() {
        println!("{}", format!("No jobs found for role {}.", role).yellow());
    } else {
        println!(
            "{}",
            format!("Found {} job(s) for role {}:", configs.len(), role).bold()
        );
        println!();
        for job in configs {
            print_job_summary(client.cluster(), job);
        }
    }

    Ok(())
}

fn print_resolved(resolved: &Resolved<SchedulerClient>) {
    println!("{}", resolved.key.to_string().cyan());
    if let Some(path) = &resolved.config_path {
        println!("  Config:    {}", path.dimmed());
    }
    println!("  Scheduler: {}", resolved.client.base_url().dimmed());
}

fn print_job_summary(cluster: &str, job: &JobConfiguration) {
    println!(
        "  {} {}/{}/{}/{}",
        "▸".cyan(),
        cluster,
        job.key.role,
        job.key.environment,
        job.key.name.bold()
    );
    println!("    Instances: {}", job.instance_count);
    if let Some(owner) = &job.owner {
        println!("    Owner:     {}", owner.dimmed());
    }
    println!();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unknown_cluster_lists_known_clusters() {
        let registry = ClusterRegistry::from_json(
            r#"{"clusters": [{"name": "west", "scheduler_url": "http://west"}]}"#,
        )
        .unwrap();
        let err = registry.client("north").unwrap_err();

        let message = with_known_clusters(err, &registry).to_string();
        assert!(message.contains("cluster 'north'"));
        assert!(message.contains("known clusters: west"));
    }

    #[test]
    fn test_other_errors_pass_through() {
        let registry = ClusterRegistry::default();
        let err = ClientError::api_error(503, "down");

        let message = with_known_clusters(err, &registry).to_string();
        assert!(!message.contains("known clusters"));
    }
}
