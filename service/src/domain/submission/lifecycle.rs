use std::fmt::{Display, Formatter};

use chrono::{DateTime, Utc};
use serde::Serialize;
use storyflow_common::{SubmissionId, SubmissionStatus, UserId};
use uuid::Uuid;

/// Audit row for one committed status change. Never updated or deleted.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkflowTransition {
    pub id: Uuid,
    pub submission_id: SubmissionId,
    pub from_status: SubmissionStatus,
    pub to_status: SubmissionStatus,
    pub performed_by: UserId,
    pub reason: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AuditEventType {
    ReviewerAssigned,
    SubmissionDeleted,
    BulkOperation,
}

impl AuditEventType {
    pub fn as_str(&self) -> &'static str {
        match self {
            AuditEventType::ReviewerAssigned => "REVIEWER_ASSIGNED",
            AuditEventType::SubmissionDeleted => "SUBMISSION_DELETED",
            AuditEventType::BulkOperation => "BULK_OPERATION",
        }
    }
}

impl Display for AuditEventType {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Audit row for operations that are not status changes (assignments,
/// deletions, and one summary row per bulk call). Append-only.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AuditEvent {
    pub id: Uuid,
    pub event_type: AuditEventType,
    pub submission_id: Option<SubmissionId>,
    pub actor_id: UserId,
    pub action: String,
    pub reason: Option<String>,
    pub metadata: serde_json::Value,
    pub created_at: DateTime<Utc>,
}

impl AuditEvent {
    pub fn new(
        event_type: AuditEventType,
        submission_id: Option<SubmissionId>,
        actor_id: UserId,
        action: impl Into<String>,
        reason: Option<String>,
        metadata: serde_json::Value,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            event_type,
            submission_id,
            actor_id,
            action: action.into(),
            reason,
            metadata,
            created_at: Utc::now(),
        }
    }
}
