use serde::{Deserialize, Serialize};
use storyflow_common::SubmissionStatus;

use crate::domain::submission::{Priority, lifecycle::WorkflowTransition};
use crate::domain::workflow::guidance::{PossibleAction, WorkflowProgress};
use crate::infrastructure::http::handlers::submissions::dto::SubmissionResponse;

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateStatusRequest {
    pub status: String,
    pub reason: Option<String>,
    pub notes: Option<String>,
    pub priority: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateStatusResponse {
    pub submission: SubmissionResponse,
    pub next_steps: &'static [&'static str],
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StatusInfoResponse {
    pub current_status: SubmissionStatus,
    pub priority: Priority,
    pub status_history: Vec<WorkflowTransition>,
    pub possible_actions: Vec<PossibleAction>,
    pub workflow_progress: WorkflowProgress,
}
