use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use storyflow_common::{SubmissionId, SubmissionStatus, UserId};

use crate::domain::submission::{Priority, Submission};

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateSubmissionRequest {
    pub title: String,
    pub content: String,
    pub summary: Option<String>,
    pub author_name: Option<String>,
    pub priority: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateSubmissionRequest {
    pub action: String,
    pub notes: Option<String>,
    pub rejection_reason: Option<String>,
    pub expected_version: Option<i32>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmissionResponse {
    pub id: SubmissionId,
    pub title: String,
    pub content: String,
    pub summary: Option<String>,
    pub author_id: UserId,
    pub author_name: String,
    pub status: SubmissionStatus,
    pub priority: Priority,
    pub version: i32,
    pub reviewer_id: Option<UserId>,
    pub assigned_at: Option<DateTime<Utc>>,
    pub reviewed_by: Option<UserId>,
    pub reviewed_at: Option<DateTime<Utc>>,
    pub review_notes: Option<String>,
    pub coordinator_id: Option<UserId>,
    pub coordinator_approved_at: Option<DateTime<Utc>>,
    pub coordinator_notes: Option<String>,
    pub admin_id: Option<UserId>,
    pub admin_approved_at: Option<DateTime<Utc>>,
    pub admin_notes: Option<String>,
    pub published_at: Option<DateTime<Utc>>,
    pub archived_at: Option<DateTime<Utc>>,
    pub rejection_reason: Option<String>,
    pub revision_requested: bool,
    pub revision_count: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<Submission> for SubmissionResponse {
    fn from(value: Submission) -> Self {
        Self {
            id: value.id,
            title: value.title,
            content: value.content,
            summary: value.summary,
            author_id: value.author_id,
            author_name: value.author_name,
            status: value.status,
            priority: value.priority,
            version: value.version,
            reviewer_id: value.reviewer_id,
            assigned_at: value.assigned_at,
            reviewed_by: value.reviewed_by,
            reviewed_at: value.reviewed_at,
            review_notes: value.review_notes,
            coordinator_id: value.coordinator_id,
            coordinator_approved_at: value.coordinator_approved_at,
            coordinator_notes: value.coordinator_notes,
            admin_id: value.admin_id,
            admin_approved_at: value.admin_approved_at,
            admin_notes: value.admin_notes,
            published_at: value.published_at,
            archived_at: value.archived_at,
            rejection_reason: value.rejection_reason,
            revision_requested: value.revision_requested,
            revision_count: value.revision_count,
            created_at: value.created_at,
            updated_at: value.updated_at,
        }
    }
}
