//! Scheduler job query DTOs

use serde::{Deserialize, Serialize};

/// Outcome code carried by every scheduler response envelope
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ResponseCode {
    Ok,
    InvalidRequest,
    Error,
    Warning,
    AuthFailed,
}

impl std::fmt::Display for ResponseCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ResponseCode::Ok => write!(f, "OK"),
            ResponseCode::InvalidRequest => write!(f, "INVALID_REQUEST"),
            ResponseCode::Error => write!(f, "ERROR"),
            ResponseCode::Warning => write!(f, "WARNING"),
            ResponseCode::AuthFailed => write!(f, "AUTH_FAILED"),
        }
    }
}

/// Role/environment/name triple identifying a job configuration within a cluster
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JobConfigKey {
    pub role: String,
    pub environment: String,
    pub name: String,
}

/// Job configuration as reported by the scheduler
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JobConfiguration {
    pub key: JobConfigKey,
    #[serde(default)]
    pub owner: Option<String>,
    #[serde(default)]
    pub instance_count: u32,
}

/// Payload of a successful `getJobs` call
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GetJobsResult {
    pub configs: Vec<JobConfiguration>,
}

/// Response envelope of the scheduler's `getJobs` query
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GetJobsResponse {
    pub response_code: ResponseCode,
    #[serde(default)]
    pub message: String,
    #[serde(default)]
    pub result: Option<GetJobsResult>,
}

impl GetJobsResponse {
    /// Build a successful response carrying `configs`
    pub fn ok(configs: Vec<JobConfiguration>) -> Self {
        Self {
            response_code: ResponseCode::Ok,
            message: String::new(),
            result: Some(GetJobsResult { configs }),
        }
    }

    /// Whether the envelope reports success
    pub fn is_ok(&self) -> bool {
        self.response_code == ResponseCode::Ok
    }

    /// Configurations in the response, empty if the envelope carries none
    pub fn configs(&self) -> &[JobConfiguration] {
        self.result
            .as_ref()
            .map(|r| r.configs.as_slice())
            .unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deserialize_envelope() {
        let json = r#"{
            "response_code": "OK",
            "message": "",
            "result": {
                "configs": [
                    {"key": {"role": "www-data", "environment": "prod", "name": "hello"}, "instance_count": 3}
                ]
            }
        }"#;

        let resp: GetJobsResponse = serde_json::from_str(json).unwrap();
        assert!(resp.is_ok());
        assert_eq!(resp.configs().len(), 1);
        assert_eq!(resp.configs()[0].key.environment, "prod");
        assert_eq!(resp.configs()[0].instance_count, 3);
        assert_eq!(resp.configs()[0].owner, None);
    }

    #[test]
    fn test_failed_envelope_without_result() {
        let json = r#"{"response_code": "AUTH_FAILED", "message": "denied"}"#;

        let resp: GetJobsResponse = serde_json::from_str(json).unwrap();
        assert!(!resp.is_ok());
        assert!(resp.configs().is_empty());
        assert_eq!(resp.response_code.to_string(), "AUTH_FAILED");
    }
}
