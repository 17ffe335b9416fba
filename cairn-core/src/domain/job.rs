//! Job domain types

use thiserror::Error;

/// Errors produced while parsing a canonical job path
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum JobKeyError {
    /// The path did not split into cluster/role/environment/name
    #[error("job path '{0}' is not of the form CLUSTER/ROLE/ENV/NAME")]
    MalformedPath(String),

    /// One of the parts is empty or contains characters outside [A-Za-z0-9_.-]
    #[error("invalid {part} '{value}' in job path")]
    InvalidPart { part: &'static str, value: String },
}

/// Fully-qualified identifier of a scheduled job
///
/// Every field is non-empty. Displayed (and parsed) as
/// `cluster/role/environment/name`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct JobKey {
    pub cluster: String,
    pub role: String,
    pub environment: String,
    pub name: String,
}

impl JobKey {
    /// Create a job key, validating every part
    pub fn new(
        cluster: impl Into<String>,
        role: impl Into<String>,
        environment: impl Into<String>,
        name: impl Into<String>,
    ) -> Result<Self, JobKeyError> {
        let key = Self {
            cluster: cluster.into(),
            role: role.into(),
            environment: environment.into(),
            name: name.into(),
        };

        if key.cluster.is_empty() {
            return Err(JobKeyError::InvalidPart {
                part: "cluster",
                value: key.cluster,
            });
        }
        check_identifier("role", &key.role)?;
        check_identifier("environment", &key.environment)?;
        check_identifier("name", &key.name)?;

        Ok(key)
    }

    /// Parse a canonical `cluster/role/environment/name` path
    pub fn from_path(path: &str) -> Result<Self, JobKeyError> {
        let parts: Vec<&str> = path.split('/').collect();
        match parts.as_slice() {
            [cluster, role, environment, name] => Self::new(*cluster, *role, *environment, *name),
            _ => Err(JobKeyError::MalformedPath(path.to_string())),
        }
    }
}

impl std::fmt::Display for JobKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}/{}/{}/{}",
            self.cluster, self.role, self.environment, self.name
        )
    }
}

impl std::str::FromStr for JobKey {
    type Err = JobKeyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_path(s)
    }
}

fn check_identifier(part: &'static str, value: &str) -> Result<(), JobKeyError> {
    let valid = !value.is_empty()
        && value
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | '-' | '.'));

    if valid {
        Ok(())
    } else {
        Err(JobKeyError::InvalidPart {
            part,
            value: value.to_string(),
        })
    }
}
