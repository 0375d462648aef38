use serde::{Deserialize, Serialize};
use std::fmt;

/// Correlation token shared by every subtask derived from one external task.
///
/// Generated once by the node that receives the task and passed unchanged to
/// every peer, so logs and responses on both hops can be joined on it.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct RequestId(pub String);

impl RequestId {
    /// Fresh random 128-bit (UUID v4) identifier.
    pub fn new() -> Self {
        Self(uuid::Uuid::new_v4().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for RequestId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for RequestId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<String> for RequestId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

/// Body of `POST /task`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct TaskRequest {
    pub task_data: String,
}

/// Body of `POST /subtask`, one per peer per task.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct SubtaskRequest {
    pub subtask_data: String,
    pub request_id: RequestId,
}

impl SubtaskRequest {
    /// Suffix appended to the task payload to form each subtask payload.
    pub const PART_SUFFIX: &'static str = "-part";

    /// Build the subtask sent to every peer for `task_data`.
    pub fn derive(task_data: &str, request_id: RequestId) -> Self {
        Self {
            subtask_data: format!("{}{}", task_data, Self::PART_SUFFIX),
            request_id,
        }
    }
}

/// Reply to `POST /subtask`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct SubtaskResponse {
    pub processed: String,
    pub request_id: RequestId,
}

/// What one peer produced for one request: its reply, or why there is none.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub enum PeerOutcome {
    Success(SubtaskResponse),
    Failure { error: String },
}

impl PeerOutcome {
    pub fn failure(error: impl Into<String>) -> Self {
        PeerOutcome::Failure {
            error: error.into(),
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, PeerOutcome::Success(_))
    }

    pub fn error(&self) -> Option<&str> {
        match self {
            PeerOutcome::Success(_) => None,
            PeerOutcome::Failure { error } => Some(error),
        }
    }
}

/// Reply to `POST /task`: one outcome per peer, in peer registry order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct AggregateResult {
    pub request_id: RequestId,
    pub node: String,
    pub aggregated_results: Vec<PeerOutcome>,
}

impl AggregateResult {
    pub fn succeeded(&self) -> usize {
        self.aggregated_results
            .iter()
            .filter(|o| o.is_success())
            .count()
    }

    pub fn failed(&self) -> usize {
        self.aggregated_results.len() - self.succeeded()
    }
}
