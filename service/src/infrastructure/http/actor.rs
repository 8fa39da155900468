use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use storyflow_common::{Role, UserId};

use crate::domain::AppState;
use crate::domain::repository::SubmissionRepository;
use crate::domain::submission::{Actor, User};
use crate::infrastructure::http::api::ApiError;

/// Set by the authenticating proxy in front of the service
pub const USER_ID_HEADER: &str = "x-user-id";

/// The caller of a request, resolved against the users table
#[derive(Debug, Clone)]
pub struct CurrentUser(pub User);

impl CurrentUser {
    pub fn actor(&self) -> Actor {
        Actor::from(&self.0)
    }

    pub fn has_role(&self, roles: &[Role]) -> bool {
        roles.contains(&self.0.role)
    }
}

impl<S: AppState> FromRequestParts<S> for CurrentUser {
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let raw = parts
            .headers
            .get(USER_ID_HEADER)
            .and_then(|value| value.to_str().ok())
            .ok_or_else(|| ApiError::Unauthorized(format!("missing {USER_ID_HEADER} header")))?;

        let id: UserId = raw
            .parse()
            .map_err(|_| ApiError::Unauthorized(format!("invalid {USER_ID_HEADER} header")))?;

        let user = state
            .repository()
            .find_user(id)
            .await?
            .filter(|user| user.role != Role::System)
            .ok_or_else(|| ApiError::Unauthorized(format!("unknown user {id}")))?;

        tracing::debug!("request by {} ({})", user.id, user.role);
        Ok(CurrentUser(user))
    }
}
