use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;
use serde_json::Value;

use crate::domain::repository::RepositoryError;
use crate::domain::workflow::error::WorkflowError;

// ApiSucess is a wrapper around a response that includes a status code.

#[derive(Debug, Clone)]
pub struct ApiSuccess<T: Serialize>(StatusCode, Json<T>);

impl<T: Serialize> ApiSuccess<T> {
    pub(crate) fn new(status: StatusCode, data: T) -> Self {
        ApiSuccess(status, Json(data))
    }
}

impl<T: Serialize> IntoResponse for ApiSuccess<T> {
    fn into_response(self) -> Response {
        (self.0, self.1).into_response()
    }
}

// ApiError is a wrapper around a response that includes a status code.

#[derive(Debug, Clone, PartialEq)]
pub enum ApiError {
    InternalServerError(String),
    BadRequest(String, Option<Value>),
    Unauthorized(String),
    Forbidden(String),
    NotFound(String),
    ConflictWithServerState(String, Option<Value>),
    UnprocessableEntity(String, Option<Value>),
}

impl ApiError {
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::BadRequest(message.into(), None)
    }
}

impl From<anyhow::Error> for ApiError {
    fn from(e: anyhow::Error) -> Self {
        Self::InternalServerError(e.to_string())
    }
}

impl From<RepositoryError> for ApiError {
    fn from(value: RepositoryError) -> Self {
        match value {
            RepositoryError::NotFound => Self::NotFound("entity not found".to_string()),
            RepositoryError::UniqueViolation(cause) => Self::ConflictWithServerState(cause, None),
            RepositoryError::DatabaseError(cause) => {
                tracing::error!("{:?}", cause);
                Self::InternalServerError("Database server error".to_string())
            }
        }
    }
}

impl From<WorkflowError> for ApiError {
    fn from(error: WorkflowError) -> Self {
        let details = error.details();
        let message = error.to_string();
        match error {
            WorkflowError::InvalidTransition { .. }
            | WorkflowError::Validation(_)
            | WorkflowError::BulkAborted { .. } => Self::BadRequest(message, details),
            WorkflowError::Forbidden(_) => Self::Forbidden(message),
            WorkflowError::NotFound(_) | WorkflowError::UnknownUser(_) => Self::NotFound(message),
            WorkflowError::VersionConflict { .. } => {
                Self::ConflictWithServerState(message, details)
            }
            WorkflowError::InvariantViolation(_) => Self::UnprocessableEntity(message, details),
            WorkflowError::Repository(cause) => Self::from(cause),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        use ApiError::*;

        let (status, message, details) = match self {
            InternalServerError(e) => {
                tracing::error!("{}", e);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal server error".to_string(),
                    None,
                )
            }
            BadRequest(message, details) => (StatusCode::BAD_REQUEST, message, details),
            Unauthorized(message) => (StatusCode::UNAUTHORIZED, message, None),
            Forbidden(message) => (StatusCode::FORBIDDEN, message, None),
            NotFound(message) => (StatusCode::NOT_FOUND, message, None),
            ConflictWithServerState(message, details) => (StatusCode::CONFLICT, message, details),
            UnprocessableEntity(message, details) => {
                (StatusCode::UNPROCESSABLE_ENTITY, message, details)
            }
        };

        if status.is_client_error() {
            tracing::warn!("request rejected with {}: {}", status, message);
        }

        (
            status,
            Json(ApiResponseBody::new_error(status, message, details)),
        )
            .into_response()
    }
}

// Generic response structure shared by all API responses.

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ApiResponseBody<T: Serialize + PartialEq> {
    pub status_code: u16,
    pub data: T,
}

impl ApiResponseBody<ApiErrorData> {
    pub fn new_error(status_code: StatusCode, message: String, details: Option<Value>) -> Self {
        Self {
            status_code: status_code.as_u16(),
            data: ApiErrorData { message, details },
        }
    }
}

/// The response data format for all error responses.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ApiErrorData {
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<Value>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use storyflow_common::{SubmissionId, SubmissionStatus};

    use crate::domain::workflow::error::FieldError;

    fn status_of(error: WorkflowError) -> StatusCode {
        ApiError::from(error).into_response().status()
    }

    #[test]
    fn each_failure_has_its_own_status() {
        assert_eq!(
            status_of(WorkflowError::InvalidTransition {
                from: SubmissionStatus::Draft,
                to: SubmissionStatus::Published,
            }),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            status_of(WorkflowError::InvariantViolation(vec![FieldError::required("title")])),
            StatusCode::UNPROCESSABLE_ENTITY
        );
        assert_eq!(
            status_of(WorkflowError::Forbidden("no".to_string())),
            StatusCode::FORBIDDEN
        );
        assert_eq!(
            status_of(WorkflowError::NotFound(SubmissionId::generate())),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            status_of(WorkflowError::VersionConflict { expected: 1, actual: 2 }),
            StatusCode::CONFLICT
        );
        assert_eq!(
            status_of(WorkflowError::Repository(RepositoryError::DatabaseError(
                "connection reset".to_string()
            ))),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn database_details_stay_on_the_server() {
        let body = ApiError::from(RepositoryError::DatabaseError("password=secret".to_string()));
        assert_eq!(
            body,
            ApiError::InternalServerError("Database server error".to_string())
        );
    }
}
