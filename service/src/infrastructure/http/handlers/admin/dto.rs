use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use storyflow_common::{SubmissionId, SubmissionStatus};

use crate::domain::submission::{Priority, Submission};
use crate::domain::workflow::bulk::{BulkItemResult, BulkReport, BulkSummary};

fn skip_invalid_default() -> bool {
    true
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BulkOperationRequest {
    pub book_ids: Vec<String>,
    pub operation: String,
    pub target_status: Option<String>,
    pub assignee_id: Option<String>,
    pub reason: Option<String>,
    #[serde(default)]
    pub dry_run: bool,
    #[serde(default = "skip_invalid_default")]
    pub skip_invalid: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BulkOperationResponse {
    pub dry_run: bool,
    pub summary: BulkSummaryResponse,
    pub results: Vec<BulkItemResponse>,
    pub message: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BulkSummaryResponse {
    pub total: usize,
    pub succeeded: usize,
    pub failed: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BulkItemResponse {
    pub id: SubmissionId,
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
}

impl From<BulkSummary> for BulkSummaryResponse {
    fn from(value: BulkSummary) -> Self {
        Self {
            total: value.total,
            succeeded: value.succeeded,
            failed: value.failed,
        }
    }
}

impl From<BulkItemResult> for BulkItemResponse {
    fn from(value: BulkItemResult) -> Self {
        Self {
            id: value.id,
            success: value.success,
            error: value.error,
            details: value.details,
        }
    }
}

impl From<BulkReport> for BulkOperationResponse {
    fn from(report: BulkReport) -> Self {
        let message = report.message();
        Self {
            dry_run: report.dry_run,
            summary: report.summary.into(),
            results: report.results.into_iter().map(Into::into).collect(),
            message,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OverdueParams {
    pub as_of: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OverdueResponse {
    pub review_overdue: Vec<OverdueSubmission>,
    pub revision_overdue: Vec<OverdueSubmission>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OverdueSubmission {
    pub id: SubmissionId,
    pub title: String,
    pub author_name: String,
    pub status: SubmissionStatus,
    pub priority: Priority,
    pub revision_count: i32,
    pub updated_at: DateTime<Utc>,
    pub waiting_hours: i64,
}

impl OverdueSubmission {
    pub fn new(submission: Submission, now: DateTime<Utc>) -> Self {
        Self {
            waiting_hours: (now - submission.updated_at).num_hours(),
            id: submission.id,
            title: submission.title,
            author_name: submission.author_name,
            status: submission.status,
            priority: submission.priority,
            revision_count: submission.revision_count,
            updated_at: submission.updated_at,
        }
    }
}
