use axum::extract::State;
use axum::http::StatusCode;
use chrono::Utc;
use storyflow_common::{SubmissionId, SubmissionStatus, UnknownVariant, UserId};

use crate::domain::AppState;
use crate::domain::workflow::bulk::{BulkOperation, BulkRequest};
use crate::infrastructure::http::actor::CurrentUser;
use crate::infrastructure::http::api::{ApiError, ApiSuccess};
use crate::infrastructure::http::handlers::parse_id;
use crate::infrastructure::http::jsonbody::JsonBody;
use crate::infrastructure::http::querystring::QueryString;

pub mod dto;

use dto::{
    BulkOperationRequest, BulkOperationResponse, OverdueParams, OverdueResponse, OverdueSubmission,
};

pub async fn bulk_operation<S: AppState>(
    State(state): State<S>,
    user: CurrentUser,
    JsonBody(body): JsonBody<BulkOperationRequest>,
) -> Result<ApiSuccess<BulkOperationResponse>, ApiError> {
    let ids = body
        .book_ids
        .iter()
        .map(|raw| parse_id::<SubmissionId>(raw))
        .collect::<Result<Vec<_>, _>>()?;

    let target_status = body
        .target_status
        .as_deref()
        .map(|raw| raw.trim().parse::<SubmissionStatus>())
        .transpose()
        .map_err(|e: UnknownVariant| ApiError::bad_request(e.to_string()))?;
    let assignee_id = body
        .assignee_id
        .as_deref()
        .map(parse_id::<UserId>)
        .transpose()?;

    let operation = BulkOperation::from_parts(&body.operation, target_status, assignee_id)?;
    let request = BulkRequest {
        ids,
        operation,
        reason: body.reason.filter(|reason| !reason.trim().is_empty()),
        dry_run: body.dry_run,
        skip_invalid: body.skip_invalid,
    };

    let report = state.workflow().bulk(&user.actor(), request).await?;
    Ok(ApiSuccess::new(StatusCode::OK, report.into()))
}

pub async fn overdue_submissions<S: AppState>(
    State(state): State<S>,
    user: CurrentUser,
    QueryString(params): QueryString<OverdueParams>,
) -> Result<ApiSuccess<OverdueResponse>, ApiError> {
    if !user.0.role.is_staff() {
        return Err(ApiError::Forbidden("staff access required".to_string()));
    }

    let now = params.as_of.unwrap_or_else(Utc::now);
    let report = state.workflow().overdue(now).await?;

    let to_response = |submissions: Vec<_>| {
        submissions
            .into_iter()
            .map(|submission| OverdueSubmission::new(submission, now))
            .collect()
    };

    Ok(ApiSuccess::new(
        StatusCode::OK,
        OverdueResponse {
            review_overdue: to_response(report.review_overdue),
            revision_overdue: to_response(report.revision_overdue),
        },
    ))
}
