use itertools::Itertools;
use serde::Serialize;
use serde_json::json;
use storyflow_common::{SubmissionId, SubmissionStatus, UserId};

use crate::domain::repository::RepositoryError;

/// One unmet precondition of a target status
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldError {
    pub field: &'static str,
    pub message: String,
}

impl FieldError {
    pub fn required(field: &'static str) -> Self {
        Self {
            field,
            message: format!("{field} required"),
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum WorkflowError {
    #[error("invalid status transition from {from} to {to}")]
    InvalidTransition {
        from: SubmissionStatus,
        to: SubmissionStatus,
    },
    #[error("submission is incomplete: {}", .0.iter().map(|e| &e.message).join(", "))]
    InvariantViolation(Vec<FieldError>),
    #[error("{0}")]
    Forbidden(String),
    #[error("submission {0} not found")]
    NotFound(SubmissionId),
    #[error("user {0} not found")]
    UnknownUser(UserId),
    #[error("{0}")]
    Validation(String),
    #[error("version mismatch: expected {expected}, found {actual}")]
    VersionConflict { expected: i32, actual: i32 },
    #[error("bulk operation aborted at submission {submission_id}: {cause}")]
    BulkAborted {
        submission_id: SubmissionId,
        cause: Box<WorkflowError>,
    },
    #[error(transparent)]
    Repository(#[from] RepositoryError),
}

impl WorkflowError {
    /// Machine readable context for callers that show errors per item or per field
    pub fn details(&self) -> Option<serde_json::Value> {
        match self {
            WorkflowError::InvalidTransition { from, to } => Some(json!({
                "currentStatus": from,
                "targetStatus": to,
            })),
            WorkflowError::InvariantViolation(errors) => Some(json!(errors)),
            WorkflowError::VersionConflict { expected, actual } => Some(json!({
                "expectedVersion": expected,
                "currentVersion": actual,
            })),
            WorkflowError::BulkAborted {
                submission_id,
                cause,
            } => Some(json!({
                "submissionId": submission_id,
                "error": cause.to_string(),
                "details": cause.details(),
            })),
            _ => None,
        }
    }
}
