use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use chrono::{DateTime, Utc};
use storyflow_common::{Role, SubmissionId, SubmissionStatus, UserId};
use uuid::Uuid;

use crate::domain::repository::{RepositoryError, SubmissionRepository};
use crate::domain::submission::{
    NewSubmission, Priority, Submission, User,
    lifecycle::{AuditEvent, WorkflowTransition},
};
use crate::domain::workflow::{
    StatusChange, WorkflowEngine, WorkflowSettings, error::WorkflowError,
    notification::{Notification, NotificationDispatcher},
};

pub fn user_with_role(role: Role) -> User {
    let id = UserId::generate();
    User {
        id,
        name: format!("{} {}", role, &id.to_string()[..8]),
        email: format!("{id}@storyflow.test"),
        role,
    }
}

/// A complete submission sitting in `status`, written by `author`
pub fn sample_submission(author: &User, status: SubmissionStatus) -> Submission {
    let mut submission = Submission::draft(
        NewSubmission {
            title: "The Kite That Flew Home".to_string(),
            content: "Once upon a windy morning a red kite slipped its string.".to_string(),
            summary: Some("A kite finds its way back".to_string()),
            author_id: author.id,
            author_name: "Amara K.".to_string(),
            priority: Priority::Medium,
        },
        Utc::now(),
    );
    submission.status = status;
    if status == SubmissionStatus::Rejected {
        submission.rejection_reason = Some("Needs a stronger ending".to_string());
    }
    submission
}

pub fn transition_of(
    submission: &Submission,
    from: SubmissionStatus,
    to: SubmissionStatus,
) -> WorkflowTransition {
    WorkflowTransition {
        id: Uuid::new_v4(),
        submission_id: submission.id,
        from_status: from,
        to_status: to,
        performed_by: UserId::generate(),
        reason: format!("Status updated to {to}"),
        created_at: Utc::now(),
    }
}

#[derive(Default)]
struct Store {
    users: HashMap<UserId, User>,
    submissions: HashMap<SubmissionId, Submission>,
    transitions: Vec<WorkflowTransition>,
    events: Vec<AuditEvent>,
}

/// Repository kept in memory. A single lock guards everything, so each
/// operation is all-or-nothing just like a database transaction.
#[derive(Clone, Default)]
pub struct InMemoryRepository {
    store: Arc<Mutex<Store>>,
}

impl InMemoryRepository {
    pub fn add_user(&self, role: Role) -> User {
        let user = user_with_role(role);
        self.store
            .lock()
            .unwrap()
            .users
            .insert(user.id, user.clone());
        user
    }

    pub fn insert(&self, submission: Submission) -> Submission {
        self.store
            .lock()
            .unwrap()
            .submissions
            .insert(submission.id, submission.clone());
        submission
    }

    pub fn stored(&self, id: SubmissionId) -> Option<Submission> {
        self.store.lock().unwrap().submissions.get(&id).cloned()
    }

    pub fn transitions(&self) -> Vec<WorkflowTransition> {
        self.store.lock().unwrap().transitions.clone()
    }

    pub fn events(&self) -> Vec<AuditEvent> {
        self.store.lock().unwrap().events.clone()
    }
}

impl SubmissionRepository for InMemoryRepository {
    async fn find_user(&self, id: UserId) -> Result<Option<User>, RepositoryError> {
        Ok(self.store.lock().unwrap().users.get(&id).cloned())
    }

    async fn create(&self, submission: NewSubmission) -> Result<Submission, RepositoryError> {
        Ok(self.insert(Submission::draft(submission, Utc::now())))
    }

    async fn find_by_id(&self, id: SubmissionId) -> Result<Option<Submission>, RepositoryError> {
        Ok(self.stored(id))
    }

    async fn apply_transition<F>(
        &self,
        id: SubmissionId,
        plan: F,
    ) -> Result<StatusChange, WorkflowError>
    where
        F: FnOnce(&Submission, DateTime<Utc>) -> Result<StatusChange, WorkflowError> + Send,
    {
        let mut store = self.store.lock().unwrap();
        let current = store
            .submissions
            .get(&id)
            .ok_or(WorkflowError::NotFound(id))?;
        let change = plan(current, Utc::now())?;
        store.submissions.insert(id, change.submission.clone());
        store.transitions.push(change.transition.clone());
        Ok(change)
    }

    async fn history(&self, id: SubmissionId) -> Result<Vec<WorkflowTransition>, RepositoryError> {
        let store = self.store.lock().unwrap();
        let mut history: Vec<_> = store
            .transitions
            .iter()
            .filter(|transition| transition.submission_id == id)
            .cloned()
            .collect();
        // stable, so equal stamps keep insertion order
        history.sort_by_key(|transition| transition.created_at);
        Ok(history)
    }

    async fn assign_reviewer(
        &self,
        id: SubmissionId,
        reviewer: UserId,
        event: AuditEvent,
    ) -> Result<Submission, RepositoryError> {
        let mut store = self.store.lock().unwrap();
        let submission = store
            .submissions
            .get_mut(&id)
            .ok_or(RepositoryError::NotFound)?;
        submission.reviewer_id = Some(reviewer);
        submission.assigned_at = Some(event.created_at);
        let updated = submission.clone();
        store.events.push(event);
        Ok(updated)
    }

    async fn delete(&self, id: SubmissionId, event: AuditEvent) -> Result<(), RepositoryError> {
        let mut store = self.store.lock().unwrap();
        store
            .submissions
            .remove(&id)
            .ok_or(RepositoryError::NotFound)?;
        store.events.push(event);
        Ok(())
    }

    async fn record_event(&self, event: AuditEvent) -> Result<(), RepositoryError> {
        self.store.lock().unwrap().events.push(event);
        Ok(())
    }

    async fn find_stale(
        &self,
        status: SubmissionStatus,
        revision_requested: bool,
        updated_before: DateTime<Utc>,
    ) -> Result<Vec<Submission>, RepositoryError> {
        let store = self.store.lock().unwrap();
        let mut stale: Vec<_> = store
            .submissions
            .values()
            .filter(|submission| {
                submission.status == status
                    && submission.revision_requested == revision_requested
                    && submission.updated_at < updated_before
            })
            .cloned()
            .collect();
        stale.sort_by_key(|submission| submission.updated_at);
        Ok(stale)
    }
}

/// Keeps every notification it is asked to send
#[derive(Clone, Default)]
pub struct RecordingNotifier {
    sent: Arc<Mutex<Vec<Notification>>>,
}

impl RecordingNotifier {
    pub fn sent(&self) -> Vec<Notification> {
        self.sent.lock().unwrap().clone()
    }
}

impl NotificationDispatcher for RecordingNotifier {
    async fn dispatch(&self, notification: Notification) -> Result<(), anyhow::Error> {
        self.sent.lock().unwrap().push(notification);
        Ok(())
    }
}

/// Fails every delivery
#[derive(Clone, Copy, Default)]
pub struct FailingNotifier;

impl NotificationDispatcher for FailingNotifier {
    async fn dispatch(&self, _notification: Notification) -> Result<(), anyhow::Error> {
        Err(anyhow::anyhow!("mail relay unreachable"))
    }
}

pub fn engine_with<N: NotificationDispatcher>(
    notifier: N,
) -> (WorkflowEngine<InMemoryRepository, N>, InMemoryRepository, N) {
    let repository = InMemoryRepository::default();
    let engine =
        WorkflowEngine::new(repository.clone(), notifier.clone(), WorkflowSettings::default());
    (engine, repository, notifier)
}
