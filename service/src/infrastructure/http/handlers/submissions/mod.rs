use axum::extract::{Path, State};
use axum::http::{HeaderMap, StatusCode};
use storyflow_common::SubmissionId;

use crate::domain::AppState;
use crate::domain::submission::{NewSubmission, Priority};
use crate::domain::workflow::{
    TransitionRequest, action::Action, idempotency::IdempotencyKey,
};
use crate::infrastructure::http::actor::CurrentUser;
use crate::infrastructure::http::api::{ApiError, ApiSuccess};
use crate::infrastructure::http::handlers::parse_id;
use crate::infrastructure::http::jsonbody::JsonBody;

pub mod dto;

use dto::{CreateSubmissionRequest, SubmissionResponse, UpdateSubmissionRequest};

pub const IDEMPOTENCY_KEY_HEADER: &str = "idempotency-key";

pub async fn create_submission<S: AppState>(
    State(state): State<S>,
    user: CurrentUser,
    JsonBody(body): JsonBody<CreateSubmissionRequest>,
) -> Result<ApiSuccess<SubmissionResponse>, ApiError> {
    let priority = match body.priority.as_deref() {
        Some(raw) => raw
            .parse::<Priority>()
            .map_err(|e| ApiError::bad_request(e.to_string()))?,
        None => Priority::default(),
    };

    let author = &user.0;
    let new = NewSubmission {
        title: body.title.trim().to_string(),
        content: body.content,
        summary: body.summary,
        author_id: author.id,
        author_name: body
            .author_name
            .map(|name| name.trim().to_string())
            .filter(|name| !name.is_empty())
            .unwrap_or_else(|| author.name.clone()),
        priority,
    };

    let submission = state.workflow().create_draft(new).await?;
    Ok(ApiSuccess::new(StatusCode::CREATED, submission.into()))
}

pub async fn find_submission<S: AppState>(
    Path(id): Path<String>,
    State(state): State<S>,
    user: CurrentUser,
) -> Result<ApiSuccess<SubmissionResponse>, ApiError> {
    let id: SubmissionId = parse_id(&id)?;
    let submission = state.workflow().find(id).await?;

    if submission.author_id != user.0.id && !user.0.role.is_staff() {
        return Err(ApiError::Forbidden(
            "only the author and staff can see this submission".to_string(),
        ));
    }

    Ok(ApiSuccess::new(StatusCode::OK, submission.into()))
}

pub async fn update_submission<S: AppState>(
    Path(id): Path<String>,
    State(state): State<S>,
    user: CurrentUser,
    headers: HeaderMap,
    JsonBody(body): JsonBody<UpdateSubmissionRequest>,
) -> Result<ApiSuccess<SubmissionResponse>, ApiError> {
    let id: SubmissionId = parse_id(&id)?;
    let action: Action = body.action.parse()?;

    let idempotency_key = headers
        .get(IDEMPOTENCY_KEY_HEADER)
        .map(|value| {
            value
                .to_str()
                .map_err(|e| e.to_string())
                .and_then(|raw| IdempotencyKey::try_new(raw).map_err(|e| e.to_string()))
                .map_err(|e| ApiError::bad_request(format!("invalid idempotency key: {e}")))
        })
        .transpose()?;

    let request = TransitionRequest::for_action(id, action, user.actor())
        .with_notes(body.notes)
        .with_rejection_reason(body.rejection_reason)
        .with_expected_version(body.expected_version)
        .with_idempotency_key(idempotency_key);

    let outcome = state.workflow().execute(request).await?;
    Ok(ApiSuccess::new(StatusCode::OK, outcome.submission.into()))
}
