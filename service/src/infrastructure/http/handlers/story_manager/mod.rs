use axum::extract::{Path, State};
use axum::http::StatusCode;
use storyflow_common::{Role, SubmissionId, SubmissionStatus};

use crate::domain::AppState;
use crate::domain::submission::Priority;
use crate::domain::workflow::{TransitionRequest, guidance};
use crate::infrastructure::http::actor::CurrentUser;
use crate::infrastructure::http::api::{ApiError, ApiSuccess};
use crate::infrastructure::http::handlers::parse_id;
use crate::infrastructure::http::jsonbody::JsonBody;

pub mod dto;

use dto::{StatusInfoResponse, UpdateStatusRequest, UpdateStatusResponse};

const STORY_MANAGERS: &[Role] = &[Role::StoryManager, Role::Admin];

fn require_story_manager(user: &CurrentUser) -> Result<(), ApiError> {
    if user.has_role(STORY_MANAGERS) {
        Ok(())
    } else {
        Err(ApiError::Forbidden(
            "Story Manager access required".to_string(),
        ))
    }
}

pub async fn update_status<S: AppState>(
    Path(id): Path<String>,
    State(state): State<S>,
    user: CurrentUser,
    JsonBody(body): JsonBody<UpdateStatusRequest>,
) -> Result<ApiSuccess<UpdateStatusResponse>, ApiError> {
    require_story_manager(&user)?;
    let id: SubmissionId = parse_id(&id)?;

    let status: SubmissionStatus = body
        .status
        .trim()
        .parse()
        .map_err(|e: storyflow_common::UnknownVariant| ApiError::bad_request(e.to_string()))?;
    let priority = body
        .priority
        .as_deref()
        .map(str::parse::<Priority>)
        .transpose()
        .map_err(|e| ApiError::bad_request(e.to_string()))?;

    let request = TransitionRequest::to_status(id, status, user.actor())
        .with_reason(body.reason)
        .with_notes(body.notes)
        .with_priority(priority);

    let outcome = state.workflow().execute(request).await?;
    let next_steps = guidance::next_steps(outcome.submission.status);

    Ok(ApiSuccess::new(
        StatusCode::OK,
        UpdateStatusResponse {
            submission: outcome.submission.into(),
            next_steps,
        },
    ))
}

pub async fn status_info<S: AppState>(
    Path(id): Path<String>,
    State(state): State<S>,
    user: CurrentUser,
) -> Result<ApiSuccess<StatusInfoResponse>, ApiError> {
    require_story_manager(&user)?;
    let id: SubmissionId = parse_id(&id)?;

    let overview = state.workflow().overview(id, &user.actor()).await?;

    Ok(ApiSuccess::new(
        StatusCode::OK,
        StatusInfoResponse {
            current_status: overview.submission.status,
            priority: overview.submission.priority,
            status_history: overview.history,
            possible_actions: overview.possible_actions,
            workflow_progress: overview.progress,
        },
    ))
}
