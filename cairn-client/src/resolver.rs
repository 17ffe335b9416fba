//! Job key resolver
//!
//! Turns the positional arguments of a job command into exactly one
//! fully-qualified [`JobKey`]. A canonical `cluster/role/environment/name`
//! path is used as given; the legacy `role [name]` form is resolved by asking
//! the scheduler which environments the job exists in.

use cairn_core::domain::job::JobKey;
use cairn_core::dto::job::ResponseCode;
use std::collections::BTreeSet;
use thiserror::Error;
use tracing::{error, info, warn};

use crate::error::ClientError;
use crate::jobs::JobQuery;

/// Reasons a job reference could not be resolved
#[derive(Debug, Error)]
pub enum ResolveError {
    #[error("job path is required")]
    MissingArgument,

    #[error("cluster is required")]
    MissingCluster,

    #[error("{0}")]
    Validation(String),

    #[error("scheduler responded with {code}: {message}")]
    SchedulerResponse { code: ResponseCode, message: String },

    #[error("No jobs found")]
    NoMatch,

    #[error(
        "Multiple jobs match ({}) - disambiguate by using the CLUSTER/ROLE/ENV/NAME form",
        join_keys(.0)
    )]
    AmbiguousMatch(Vec<JobKey>),

    #[error(transparent)]
    Client(#[from] ClientError),
}

fn join_keys(keys: &[JobKey]) -> String {
    keys.iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(",")
}

/// A possibly incomplete job reference as typed by a user
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct JobReference {
    pub role: Option<String>,
    pub environment: Option<String>,
    pub name: Option<String>,
}

impl JobReference {
    /// Whether the scheduler must be asked to complete this reference
    pub fn is_ambiguous(&self) -> bool {
        [&self.role, &self.environment, &self.name]
            .iter()
            .any(|part| part.as_deref().is_none_or(str::is_empty))
    }
}

/// Outcome of [`resolve`]
#[derive(Debug)]
pub struct Resolved<C> {
    /// Client for the cluster the job lives in
    pub client: C,
    /// The fully-qualified job key
    pub key: JobKey,
    /// Config file given after a canonical job path
    pub config_path: Option<String>,
}

/// Resolve command arguments into a client, a job key and an optional config path
///
/// `args` is `[job_path]` or `[job_path, config_or_name]`. A canonical job path
/// is returned without contacting the scheduler. Otherwise `args` is read as
/// `role [name]` on `cluster` and disambiguated with one `get_jobs` query.
///
/// # Arguments
/// * `args` - Positional arguments of the command
/// * `cluster` - Cluster option, required for the legacy form
/// * `client_factory` - Builds a client for a cluster name
///
/// # Errors
/// Returns an error if:
/// - No arguments were given, or the legacy form lacks a cluster
/// - The role or name is missing
/// - The scheduler query fails or reports failure
/// - Zero or several jobs match
pub async fn resolve<C, F>(
    args: &[String],
    cluster: Option<&str>,
    client_factory: F,
) -> Result<Resolved<C>, ResolveError>
where
    C: JobQuery,
    F: FnOnce(&str) -> Result<C, ClientError>,
{
    let Some(job_path) = args.first() else {
        return Err(ResolveError::MissingArgument);
    };

    match JobKey::from_path(job_path) {
        Ok(key) => {
            let client = client_factory(&key.cluster)?;
            return Ok(Resolved {
                client,
                key,
                config_path: args.get(1).cloned(),
            });
        }
        Err(e) => {
            warn!(
                "Failed to parse job path ({}), falling back to compatibility mode",
                e
            );
        }
    }

    // The legacy form has no room for a config file.
    let reference = JobReference {
        role: Some(job_path.clone()),
        environment: None,
        name: args.get(1).cloned(),
    };

    let cluster = cluster
        .filter(|c| !c.is_empty())
        .ok_or(ResolveError::MissingCluster)?;
    let client = client_factory(cluster)?;
    let key = disambiguate(&client, reference).await?;

    Ok(Resolved {
        client,
        key,
        config_path: None,
    })
}

/// Resolve `reference` to a single job on the client's cluster
///
/// Complete references are returned as keys directly. Incomplete ones are
/// matched by name against every job of the role; exactly one match is
/// required.
pub async fn disambiguate<C>(client: &C, reference: JobReference) -> Result<JobKey, ResolveError>
where
    C: JobQuery + ?Sized,
{
    let ambiguous = reference.is_ambiguous();
    let JobReference {
        role,
        environment,
        name,
    } = reference;

    let role = role
        .filter(|r| !r.is_empty())
        .ok_or_else(|| ResolveError::Validation("role is required".to_string()))?;
    let name = name
        .filter(|n| !n.is_empty())
        .ok_or_else(|| ResolveError::Validation("name is required".to_string()))?;

    if !ambiguous {
        let environment = environment.unwrap_or_default();
        return JobKey::new(client.cluster(), role, environment, name)
            .map_err(|e| ResolveError::Validation(e.to_string()));
    }

    warn!("Job ambiguously specified - querying the scheduler to disambiguate");

    let mut matches = query_matches(client, &role, &name).await?.into_iter();

    match (matches.next(), matches.next()) {
        (None, _) => Err(ResolveError::NoMatch),
        (Some(key), None) => {
            info!("Found job {}", key);
            Ok(key)
        }
        (Some(first), Some(second)) => {
            let mut candidates = vec![first, second];
            candidates.extend(matches);
            Err(ResolveError::AmbiguousMatch(candidates))
        }
    }
}

/// Keys of all jobs owned by `role` whose name is `name`
async fn query_matches<C>(
    client: &C,
    role: &str,
    name: &str,
) -> Result<BTreeSet<JobKey>, ResolveError>
where
    C: JobQuery + ?Sized,
{
    let response = client.get_jobs(role).await?;

    if !response.is_ok() {
        error!(
            "Scheduler rejected job query for role {}: {} {}",
            role, response.response_code, response.message
        );
        return Err(ResolveError::SchedulerResponse {
            code: response.response_code,
            message: response.message,
        });
    }

    Ok(response
        .configs()
        .iter()
        .filter(|config| config.key.name == name)
        .filter_map(|config| {
            let key = &config.key;
            JobKey::new(client.cluster(), &key.role, &key.environment, &key.name)
                .inspect_err(|e| {
                    warn!(
                        "Ignoring job {}/{}/{} reported by the scheduler: {}",
                        key.role, key.environment, key.name, e
                    );
                })
                .ok()
        })
        .collect())
}
