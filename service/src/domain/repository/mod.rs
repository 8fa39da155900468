use std::future::Future;

use chrono::{DateTime, Utc};
use storyflow_common::{SubmissionId, SubmissionStatus, UserId};

use crate::domain::submission::{
    NewSubmission, Submission, User,
    lifecycle::{AuditEvent, WorkflowTransition},
};
use crate::domain::workflow::{StatusChange, error::WorkflowError};

/// Storage port of the workflow: submissions, their audit trail and the users
/// acting on them.
pub trait SubmissionRepository: Clone + Send + Sync + 'static {
    /// Find a user by id
    fn find_user(
        &self,
        id: UserId,
    ) -> impl Future<Output = Result<Option<User>, RepositoryError>> + Send;

    /// Create a new submission in DRAFT
    fn create(
        &self,
        submission: NewSubmission,
    ) -> impl Future<Output = Result<Submission, RepositoryError>> + Send;

    /// Find single submission by id
    fn find_by_id(
        &self,
        id: SubmissionId,
    ) -> impl Future<Output = Result<Option<Submission>, RepositoryError>> + Send;

    /// Lock the submission, let `plan` decide the change against the locked
    /// row, then write the new row and its transition record together.
    ///
    /// `plan` receives the time read after the lock is held, so transitions of
    /// one submission are stamped in commit order. Either both writes become
    /// visible or neither does. Errors returned by `plan` abort the change
    /// unchanged; a missing row is `WorkflowError::NotFound`.
    fn apply_transition<F>(
        &self,
        id: SubmissionId,
        plan: F,
    ) -> impl Future<Output = Result<StatusChange, WorkflowError>> + Send
    where
        F: FnOnce(&Submission, DateTime<Utc>) -> Result<StatusChange, WorkflowError> + Send;

    /// Transition records of one submission, in the order they were committed
    fn history(
        &self,
        id: SubmissionId,
    ) -> impl Future<Output = Result<Vec<WorkflowTransition>, RepositoryError>> + Send;

    /// Set the assigned reviewer and record `event` in the same transaction
    fn assign_reviewer(
        &self,
        id: SubmissionId,
        reviewer: UserId,
        event: AuditEvent,
    ) -> impl Future<Output = Result<Submission, RepositoryError>> + Send;

    /// Remove the submission and record `event` in the same transaction.
    /// Its transition records are kept.
    fn delete(
        &self,
        id: SubmissionId,
        event: AuditEvent,
    ) -> impl Future<Output = Result<(), RepositoryError>> + Send;

    /// Append an audit event that is not tied to a row change
    fn record_event(
        &self,
        event: AuditEvent,
    ) -> impl Future<Output = Result<(), RepositoryError>> + Send;

    /// Submissions sitting in `status` with the given revision flag whose last
    /// update is older than `updated_before`, oldest first
    fn find_stale(
        &self,
        status: SubmissionStatus,
        revision_requested: bool,
        updated_before: DateTime<Utc>,
    ) -> impl Future<Output = Result<Vec<Submission>, RepositoryError>> + Send;
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RepositoryError {
    #[error("entity not found")]
    NotFound,
    #[error("unique constraint violated: {0}")]
    UniqueViolation(String),
    #[error("database error: {0}")]
    DatabaseError(String),
}
