pub mod action;
pub mod bulk;
pub mod error;
pub mod guidance;
pub mod idempotency;
pub mod notification;
pub mod table;
pub mod validator;

use std::time::Duration;

use chrono::{DateTime, TimeDelta, Utc};
use serde::Deserialize;
use storyflow_common::{SubmissionId, SubmissionStatus, UserId};
use tracing::{info, warn};
use uuid::Uuid;

use crate::domain::repository::SubmissionRepository;
use crate::domain::submission::{
    Actor, NewSubmission, Priority, Submission, lifecycle::WorkflowTransition,
};

use action::Action;
use error::WorkflowError;
use guidance::StatusOverview;
use idempotency::{IdempotencyCache, IdempotencyKey};
use notification::{Notification, NotificationDispatcher};
use table::Channel;

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct WorkflowSettings {
    pub bulk_max_items: usize,
    pub idempotency_window_seconds: u64,
    pub idempotency_capacity: u64,
    pub review_deadline_hours: i64,
    pub revision_deadline_days: i64,
}

impl Default for WorkflowSettings {
    fn default() -> Self {
        Self {
            bulk_max_items: 100,
            idempotency_window_seconds: 5,
            idempotency_capacity: 10_000,
            review_deadline_hours: 48,
            revision_deadline_days: 7,
        }
    }
}

/// Where a request wants the submission to go
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Target {
    Status(SubmissionStatus),
    /// Resolved against the status of the locked row
    Action(Action),
}

impl Target {
    fn resolve(&self, from: SubmissionStatus) -> Result<SubmissionStatus, WorkflowError> {
        match self {
            Target::Status(status) => Ok(*status),
            Target::Action(action) => action.resolve(from),
        }
    }
}

#[derive(Debug, Clone)]
pub struct TransitionRequest {
    pub submission_id: SubmissionId,
    pub target: Target,
    pub actor: Actor,
    pub reason: Option<String>,
    pub notes: Option<String>,
    pub rejection_reason: Option<String>,
    pub priority: Option<Priority>,
    pub expected_version: Option<i32>,
    pub idempotency_key: Option<IdempotencyKey>,
    pub channel: Channel,
}

impl TransitionRequest {
    pub fn new(submission_id: SubmissionId, target: Target, actor: Actor) -> Self {
        Self {
            submission_id,
            target,
            actor,
            reason: None,
            notes: None,
            rejection_reason: None,
            priority: None,
            expected_version: None,
            idempotency_key: None,
            channel: Channel::Direct,
        }
    }

    pub fn to_status(submission_id: SubmissionId, status: SubmissionStatus, actor: Actor) -> Self {
        Self::new(submission_id, Target::Status(status), actor)
    }

    pub fn for_action(submission_id: SubmissionId, action: Action, actor: Actor) -> Self {
        Self::new(submission_id, Target::Action(action), actor)
    }

    pub fn with_reason(mut self, reason: Option<String>) -> Self {
        self.reason = non_blank(reason);
        self
    }

    pub fn with_notes(mut self, notes: Option<String>) -> Self {
        self.notes = non_blank(notes);
        self
    }

    pub fn with_rejection_reason(mut self, rejection_reason: Option<String>) -> Self {
        self.rejection_reason = non_blank(rejection_reason);
        self
    }

    pub fn with_priority(mut self, priority: Option<Priority>) -> Self {
        self.priority = priority;
        self
    }

    pub fn with_expected_version(mut self, expected_version: Option<i32>) -> Self {
        self.expected_version = expected_version;
        self
    }

    pub fn with_idempotency_key(mut self, key: Option<IdempotencyKey>) -> Self {
        self.idempotency_key = key;
        self
    }

    pub fn via(mut self, channel: Channel) -> Self {
        self.channel = channel;
        self
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
}

/// A decided change: the submission as it will be stored and its transition row
#[derive(Debug, Clone, PartialEq)]
pub struct StatusChange {
    pub submission: Submission,
    pub transition: WorkflowTransition,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TransitionOutcome {
    pub submission: Submission,
    pub transition: WorkflowTransition,
    /// served from the idempotency cache, nothing was written
    pub replayed: bool,
}

/// Decide the change `request` makes to `current`, without side effects.
///
/// Runs against the locked row, so every check here sees the latest state.
pub fn plan(
    current: &Submission,
    request: &TransitionRequest,
    now: DateTime<Utc>,
) -> Result<StatusChange, WorkflowError> {
    if let Some(expected) = request.expected_version {
        if expected != current.version {
            return Err(WorkflowError::VersionConflict {
                expected,
                actual: current.version,
            });
        }
    }

    let from = current.status;
    let to = request.target.resolve(from)?;
    table::authorize(current, to, &request.actor, request.channel)?;

    let actor = request.actor.id;
    let notes = request.notes.clone();
    let mut next = current.clone();

    match to {
        SubmissionStatus::Reviewed => {
            stamp_review(&mut next, actor, notes, now);
            next.revision_requested = false;
        }
        SubmissionStatus::PendingReview
            if matches!(from, SubmissionStatus::PendingReview | SubmissionStatus::Reviewed) =>
        {
            next.revision_requested = true;
            next.revision_count += 1;
            next.review_notes = notes.or(next.review_notes);
        }
        SubmissionStatus::PendingReview => {
            next.revision_requested = false;
            next.rejection_reason = None;
        }
        SubmissionStatus::ApprovedCoordinator => {
            next.coordinator_id = Some(actor);
            next.coordinator_approved_at = Some(now);
            next.coordinator_notes = notes.or(next.coordinator_notes);
        }
        SubmissionStatus::Published => {
            next.admin_id = Some(actor);
            next.admin_approved_at = Some(now);
            next.admin_notes = notes.or(next.admin_notes);
            next.published_at = Some(now);
        }
        SubmissionStatus::Rejected => {
            next.rejection_reason = request
                .rejection_reason
                .clone()
                .or_else(|| request.reason.clone())
                .or(next.rejection_reason);
            next.revision_requested = false;
            match from {
                SubmissionStatus::PendingReview | SubmissionStatus::Reviewed => {
                    stamp_review(&mut next, actor, notes, now)
                }
                SubmissionStatus::PendingCoordinator | SubmissionStatus::ApprovedCoordinator => {
                    next.coordinator_id = Some(actor);
                    next.coordinator_notes = notes.or(next.coordinator_notes);
                }
                SubmissionStatus::PendingAdmin => {
                    next.admin_id = Some(actor);
                    next.admin_notes = notes.or(next.admin_notes);
                }
                _ => {}
            }
        }
        SubmissionStatus::Archived => {
            next.archived_at = Some(now);
        }
        SubmissionStatus::Draft
        | SubmissionStatus::PendingCoordinator
        | SubmissionStatus::PendingAdmin => {}
    }

    if let Some(priority) = request.priority {
        next.priority = priority;
    }
    next.status = to;
    next.version = current.version + 1;
    next.updated_at = now;

    let errors = validator::validate(to, &next);
    if !errors.is_empty() {
        return Err(WorkflowError::InvariantViolation(errors));
    }

    let reason = request
        .reason
        .clone()
        .or_else(|| match to {
            SubmissionStatus::Rejected => next.rejection_reason.clone(),
            _ => None,
        })
        .or_else(|| request.notes.clone())
        .unwrap_or_else(|| format!("Status updated to {to}"));

    let transition = WorkflowTransition {
        id: Uuid::new_v4(),
        submission_id: current.id,
        from_status: from,
        to_status: to,
        performed_by: actor,
        reason,
        created_at: now,
    };

    Ok(StatusChange {
        submission: next,
        transition,
    })
}

fn stamp_review(next: &mut Submission, actor: UserId, notes: Option<String>, now: DateTime<Utc>) {
    next.reviewed_by = Some(actor);
    next.reviewed_at = Some(now);
    next.review_notes = notes.or(next.review_notes.take());
}

/// Submissions that have waited longer than the configured deadlines
#[derive(Debug, Clone, Default, PartialEq)]
pub struct OverdueReport {
    pub review_overdue: Vec<Submission>,
    pub revision_overdue: Vec<Submission>,
}

/// Entry point of every workflow operation
#[derive(Clone)]
pub struct WorkflowEngine<R, N> {
    repository: R,
    notifier: N,
    idempotency: IdempotencyCache,
    settings: WorkflowSettings,
}

impl<R, N> WorkflowEngine<R, N>
where
    R: SubmissionRepository,
    N: NotificationDispatcher,
{
    pub fn new(repository: R, notifier: N, settings: WorkflowSettings) -> Self {
        let idempotency = IdempotencyCache::new(
            Duration::from_secs(settings.idempotency_window_seconds),
            settings.idempotency_capacity,
        );
        Self {
            repository,
            notifier,
            idempotency,
            settings,
        }
    }

    pub fn settings(&self) -> &WorkflowSettings {
        &self.settings
    }

    pub fn repository(&self) -> &R {
        &self.repository
    }

    pub async fn create_draft(&self, new: NewSubmission) -> Result<Submission, WorkflowError> {
        let submission = self.repository.create(new).await?;
        info!(
            "submission {} created in {} by {}",
            submission.id, submission.status, submission.author_id
        );
        Ok(submission)
    }

    pub async fn find(&self, id: SubmissionId) -> Result<Submission, WorkflowError> {
        self.repository
            .find_by_id(id)
            .await?
            .ok_or(WorkflowError::NotFound(id))
    }

    /// Apply one transition atomically, then notify the author.
    pub async fn execute(
        &self,
        request: TransitionRequest,
    ) -> Result<TransitionOutcome, WorkflowError> {
        if let Some(key) = &request.idempotency_key {
            if let Some(outcome) = self
                .idempotency
                .get(request.actor.id, request.submission_id, key)
                .await
            {
                return Ok(TransitionOutcome {
                    replayed: true,
                    ..outcome
                });
            }
        }

        let change = self
            .repository
            .apply_transition(request.submission_id, |current, now| {
                plan(current, &request, now)
            })
            .await?;

        info!(
            "submission {} moved from {} to {} by {}",
            change.submission.id,
            change.transition.from_status,
            change.transition.to_status,
            change.transition.performed_by
        );

        self.notify(&change).await;

        let outcome = TransitionOutcome {
            submission: change.submission,
            transition: change.transition,
            replayed: false,
        };

        if let Some(key) = request.idempotency_key {
            self.idempotency
                .insert(request.actor.id, request.submission_id, key, outcome.clone())
                .await;
        }

        Ok(outcome)
    }

    /// Run every check `execute` would run against the current row, write nothing.
    pub async fn preview(
        &self,
        request: &TransitionRequest,
    ) -> Result<StatusChange, WorkflowError> {
        let current = self.find(request.submission_id).await?;
        plan(&current, request, Utc::now())
    }

    pub async fn history(
        &self,
        id: SubmissionId,
    ) -> Result<Vec<WorkflowTransition>, WorkflowError> {
        Ok(self.repository.history(id).await?)
    }

    /// Current status, trail and what `actor` can do next
    pub async fn overview(
        &self,
        id: SubmissionId,
        actor: &Actor,
    ) -> Result<StatusOverview, WorkflowError> {
        let submission = self.find(id).await?;
        let history = self.repository.history(id).await?;
        Ok(StatusOverview::new(submission, history, actor))
    }

    pub async fn overdue(&self, now: DateTime<Utc>) -> Result<OverdueReport, WorkflowError> {
        let review_cutoff = now - TimeDelta::hours(self.settings.review_deadline_hours);
        let revision_cutoff = now - TimeDelta::days(self.settings.revision_deadline_days);

        let review_overdue = self
            .repository
            .find_stale(SubmissionStatus::PendingReview, false, review_cutoff)
            .await?;
        let revision_overdue = self
            .repository
            .find_stale(SubmissionStatus::PendingReview, true, revision_cutoff)
            .await?;

        Ok(OverdueReport {
            review_overdue,
            revision_overdue,
        })
    }

    async fn notify(&self, change: &StatusChange) {
        let Some(notification) =
            Notification::for_transition(&change.submission, &change.transition)
        else {
            return;
        };

        if let Err(error) = self.notifier.dispatch(notification).await {
            warn!(
                "notification for submission {} failed: {:#}",
                change.submission.id, error
            );
        }
    }
}
