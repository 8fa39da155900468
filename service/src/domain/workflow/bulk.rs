use chrono::{DateTime, Utc};
use itertools::Itertools;
use serde::Serialize;
use serde_json::{Value, json};
use storyflow_common::{Role, SubmissionId, SubmissionStatus, UserId};
use tracing::{info, warn};

use crate::domain::repository::{RepositoryError, SubmissionRepository};
use crate::domain::submission::{
    Actor, User,
    lifecycle::{AuditEvent, AuditEventType},
};
use crate::domain::workflow::{
    TransitionRequest, WorkflowEngine, error::WorkflowError,
    notification::NotificationDispatcher, plan, table::Channel,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BulkOperation {
    Transition(SubmissionStatus),
    Assign(UserId),
    Archive,
    Delete,
}

impl BulkOperation {
    /// Combine the operation name with the parameter it needs
    pub fn from_parts(
        operation: &str,
        target_status: Option<SubmissionStatus>,
        assignee_id: Option<UserId>,
    ) -> Result<Self, WorkflowError> {
        match operation.trim() {
            "transition" => target_status.map(BulkOperation::Transition).ok_or_else(|| {
                WorkflowError::Validation("targetStatus is required for transition".to_string())
            }),
            "assign" => assignee_id.map(BulkOperation::Assign).ok_or_else(|| {
                WorkflowError::Validation("assigneeId is required for assign".to_string())
            }),
            "archive" => Ok(BulkOperation::Archive),
            "delete" => Ok(BulkOperation::Delete),
            other => Err(WorkflowError::Validation(format!(
                "invalid operation '{other}'"
            ))),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            BulkOperation::Transition(_) => "transition",
            BulkOperation::Assign(_) => "assign",
            BulkOperation::Archive => "archive",
            BulkOperation::Delete => "delete",
        }
    }

    fn default_reason(&self) -> &'static str {
        match self {
            BulkOperation::Transition(_) => "Bulk operation: transition",
            BulkOperation::Assign(_) => "Bulk operation: assign",
            BulkOperation::Archive => "Bulk archive operation",
            BulkOperation::Delete => "Bulk delete operation",
        }
    }
}

#[derive(Debug, Clone)]
pub struct BulkRequest {
    pub ids: Vec<SubmissionId>,
    pub operation: BulkOperation,
    pub reason: Option<String>,
    pub dry_run: bool,
    pub skip_invalid: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BulkItemResult {
    pub id: SubmissionId,
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<Value>,
}

impl BulkItemResult {
    fn succeeded(id: SubmissionId, details: Value) -> Self {
        Self {
            id,
            success: true,
            error: None,
            details: Some(details),
        }
    }

    fn failed(id: SubmissionId, error: &WorkflowError) -> Self {
        Self {
            id,
            success: false,
            error: Some(error.to_string()),
            details: error.details(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct BulkSummary {
    pub total: usize,
    pub succeeded: usize,
    pub failed: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BulkReport {
    pub dry_run: bool,
    pub summary: BulkSummary,
    pub results: Vec<BulkItemResult>,
}

impl BulkReport {
    fn new(dry_run: bool, results: Vec<BulkItemResult>) -> Self {
        let succeeded = results.iter().filter(|result| result.success).count();
        let summary = BulkSummary {
            total: results.len(),
            succeeded,
            failed: results.len() - succeeded,
        };
        Self {
            dry_run,
            summary,
            results,
        }
    }

    pub fn message(&self) -> String {
        let BulkSummary {
            succeeded, failed, ..
        } = self.summary;
        if self.dry_run {
            format!("Dry run completed: {succeeded} would succeed, {failed} would fail")
        } else {
            format!("Bulk operation completed: {succeeded} succeeded, {failed} failed")
        }
    }
}

fn missing(id: SubmissionId) -> impl Fn(RepositoryError) -> WorkflowError {
    move |error| match error {
        RepositoryError::NotFound => WorkflowError::NotFound(id),
        other => WorkflowError::Repository(other),
    }
}

impl<R, N> WorkflowEngine<R, N>
where
    R: SubmissionRepository,
    N: NotificationDispatcher,
{
    /// Apply one operation to a list of submissions and report per item.
    ///
    /// With `skip_invalid` every item stands alone. Without it all items are
    /// checked before the first write, and the first failure aborts the batch.
    /// Every call leaves exactly one `BulkOperation` audit event behind.
    pub async fn bulk(
        &self,
        actor: &Actor,
        request: BulkRequest,
    ) -> Result<BulkReport, WorkflowError> {
        let ids = self.authorize_bulk(actor, &request)?;
        let assignee = match request.operation {
            BulkOperation::Assign(assignee_id) => Some(self.assignee(assignee_id).await?),
            _ => None,
        };
        let assignee = assignee.as_ref();
        let now = Utc::now();

        let mut results = Vec::with_capacity(ids.len());
        let mut aborted = None;

        if request.dry_run || !request.skip_invalid {
            for id in &ids {
                match self.check_item(actor, *id, &request, assignee, now).await {
                    Ok(details) => results.push(BulkItemResult::succeeded(*id, details)),
                    Err(error) => {
                        results.push(BulkItemResult::failed(*id, &error));
                        if !request.skip_invalid {
                            aborted = Some((*id, error));
                            break;
                        }
                    }
                }
            }
        }

        if !request.dry_run && aborted.is_none() {
            results.clear();
            for id in &ids {
                match self.apply_item(actor, *id, &request, assignee).await {
                    Ok(details) => results.push(BulkItemResult::succeeded(*id, details)),
                    Err(error) => {
                        results.push(BulkItemResult::failed(*id, &error));
                        if !request.skip_invalid {
                            aborted = Some((*id, error));
                            break;
                        }
                    }
                }
            }
        }

        let report = BulkReport::new(request.dry_run, results);
        self.record_bulk(actor, &request, &ids, &report, aborted.is_some())
            .await?;

        info!(
            "bulk {} by {}: {} of {} succeeded{}",
            request.operation.as_str(),
            actor.id,
            report.summary.succeeded,
            report.summary.total,
            if request.dry_run { " (dry run)" } else { "" }
        );

        match aborted {
            Some((submission_id, cause)) => Err(WorkflowError::BulkAborted {
                submission_id,
                cause: Box::new(cause),
            }),
            None => Ok(report),
        }
    }

    /// Check caller, bounds and parameters; returns the ids without duplicates.
    fn authorize_bulk(
        &self,
        actor: &Actor,
        request: &BulkRequest,
    ) -> Result<Vec<SubmissionId>, WorkflowError> {
        if !actor.role.is_staff() {
            return Err(WorkflowError::Forbidden(format!(
                "role {} may not run bulk operations",
                actor.role
            )));
        }
        if request.operation == BulkOperation::Delete && actor.role != Role::Admin {
            return Err(WorkflowError::Forbidden(
                "only admins can perform bulk delete operations".to_string(),
            ));
        }

        // the bound applies to the list as sent, before duplicates collapse
        let max = self.settings.bulk_max_items;
        if request.ids.is_empty() {
            return Err(WorkflowError::Validation("bookIds must not be empty".to_string()));
        }
        if request.ids.len() > max {
            return Err(WorkflowError::Validation(format!(
                "at most {max} submissions per bulk operation"
            )));
        }
        Ok(request.ids.iter().copied().unique().collect())
    }

    async fn assignee(&self, id: UserId) -> Result<User, WorkflowError> {
        let user = self
            .repository
            .find_user(id)
            .await?
            .ok_or(WorkflowError::UnknownUser(id))?;
        if !user.role.is_staff() {
            return Err(WorkflowError::Validation(format!(
                "user with role {} cannot be assigned as reviewer",
                user.role
            )));
        }
        Ok(user)
    }

    fn bulk_transition(
        &self,
        actor: &Actor,
        id: SubmissionId,
        to: SubmissionStatus,
        request: &BulkRequest,
    ) -> TransitionRequest {
        let reason = request
            .reason
            .clone()
            .unwrap_or_else(|| request.operation.default_reason().to_string());
        TransitionRequest::to_status(id, to, *actor)
            .with_reason(Some(reason))
            .via(Channel::Bulk)
    }

    async fn check_item(
        &self,
        actor: &Actor,
        id: SubmissionId,
        request: &BulkRequest,
        assignee: Option<&User>,
        now: DateTime<Utc>,
    ) -> Result<Value, WorkflowError> {
        let current = self.find(id).await?;

        match (request.operation, assignee) {
            (BulkOperation::Transition(to), _) => {
                plan(&current, &self.bulk_transition(actor, id, to, request), now)?;
                Ok(json!({
                    "wouldTransition": true,
                    "from": current.status,
                    "to": to,
                }))
            }
            (BulkOperation::Archive, _) => {
                let to = SubmissionStatus::Archived;
                plan(&current, &self.bulk_transition(actor, id, to, request), now)?;
                Ok(json!({
                    "wouldArchive": true,
                    "from": current.status,
                }))
            }
            (BulkOperation::Assign(_), Some(assignee)) => Ok(json!({
                "wouldAssign": true,
                "assigneeId": assignee.id,
                "assigneeName": assignee.name,
            })),
            (BulkOperation::Assign(assignee_id), None) => {
                Err(WorkflowError::UnknownUser(assignee_id))
            }
            (BulkOperation::Delete, _) => Ok(json!({
                "wouldDelete": true,
                "title": current.title,
            })),
        }
    }

    async fn apply_item(
        &self,
        actor: &Actor,
        id: SubmissionId,
        request: &BulkRequest,
        assignee: Option<&User>,
    ) -> Result<Value, WorkflowError> {
        match (request.operation, assignee) {
            (BulkOperation::Transition(to), _) => {
                let outcome = self.execute(self.bulk_transition(actor, id, to, request)).await?;
                Ok(json!({
                    "from": outcome.transition.from_status,
                    "to": outcome.transition.to_status,
                }))
            }
            (BulkOperation::Archive, _) => {
                let to = SubmissionStatus::Archived;
                let outcome = self.execute(self.bulk_transition(actor, id, to, request)).await?;
                Ok(json!({
                    "from": outcome.transition.from_status,
                    "archivedAt": outcome.submission.archived_at,
                }))
            }
            (BulkOperation::Assign(_), Some(assignee)) => {
                let event = AuditEvent::new(
                    AuditEventType::ReviewerAssigned,
                    Some(id),
                    actor.id,
                    "ASSIGN_REVIEWER",
                    request.reason.clone(),
                    json!({
                        "assigneeId": assignee.id,
                        "assigneeName": assignee.name,
                        "bulkOperation": true,
                    }),
                );
                self.repository
                    .assign_reviewer(id, assignee.id, event)
                    .await
                    .map_err(missing(id))?;
                Ok(json!({
                    "assigneeId": assignee.id,
                    "assigneeName": assignee.name,
                }))
            }
            (BulkOperation::Assign(assignee_id), None) => {
                Err(WorkflowError::UnknownUser(assignee_id))
            }
            (BulkOperation::Delete, _) => {
                let current = self.find(id).await?;
                let reason = request
                    .reason
                    .clone()
                    .unwrap_or_else(|| request.operation.default_reason().to_string());
                let event = AuditEvent::new(
                    AuditEventType::SubmissionDeleted,
                    Some(id),
                    actor.id,
                    "DELETE",
                    Some(reason),
                    json!({
                        "bulkOperation": true,
                        "title": current.title,
                        "status": current.status,
                    }),
                );
                self.repository.delete(id, event).await.map_err(missing(id))?;
                Ok(json!({ "deleted": true }))
            }
        }
    }

    async fn record_bulk(
        &self,
        actor: &Actor,
        request: &BulkRequest,
        ids: &[SubmissionId],
        report: &BulkReport,
        aborted: bool,
    ) -> Result<(), WorkflowError> {
        let (target_status, assignee_id) = match request.operation {
            BulkOperation::Transition(to) => (Some(to), None),
            BulkOperation::Archive => (Some(SubmissionStatus::Archived), None),
            BulkOperation::Assign(assignee_id) => (None, Some(assignee_id)),
            BulkOperation::Delete => (None, None),
        };

        let event = AuditEvent::new(
            AuditEventType::BulkOperation,
            None,
            actor.id,
            request.operation.as_str().to_uppercase(),
            request.reason.clone(),
            json!({
                "operation": request.operation.as_str(),
                "targetStatus": target_status,
                "assigneeId": assignee_id,
                "dryRun": request.dry_run,
                "skipInvalid": request.skip_invalid,
                "aborted": aborted,
                "total": report.summary.total,
                "succeeded": report.summary.succeeded,
                "failed": report.summary.failed,
                "ids": ids,
            }),
        );

        if let Err(error) = self.repository.record_event(event).await {
            warn!("failed to record bulk {} event: {}", request.operation.as_str(), error);
            return Err(error.into());
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::{RecordingNotifier, engine_with, sample_submission};

    fn request(ids: Vec<SubmissionId>, operation: BulkOperation) -> BulkRequest {
        BulkRequest {
            ids,
            operation,
            reason: None,
            dry_run: false,
            skip_invalid: true,
        }
    }

    #[test]
    fn operation_needs_its_parameter() {
        assert!(matches!(
            BulkOperation::from_parts("transition", None, None),
            Err(WorkflowError::Validation(_))
        ));
        assert!(matches!(
            BulkOperation::from_parts("assign", None, None),
            Err(WorkflowError::Validation(_))
        ));
        assert!(matches!(
            BulkOperation::from_parts("explode", None, None),
            Err(WorkflowError::Validation(_))
        ));
        assert_eq!(
            BulkOperation::from_parts("archive", None, None).unwrap(),
            BulkOperation::Archive
        );
    }

    #[tokio::test]
    async fn skip_invalid_keeps_going_past_a_bad_item() {
        let (engine, repository, _) = engine_with(RecordingNotifier::default());
        let author = repository.add_user(Role::Writer);
        let manager = repository.add_user(Role::StoryManager);

        let ids: Vec<_> = (0..10)
            .map(|index| {
                let status = if index == 4 {
                    SubmissionStatus::Draft
                } else {
                    SubmissionStatus::PendingReview
                };
                repository.insert(sample_submission(&author, status)).id
            })
            .collect();

        let report = engine
            .bulk(
                &Actor::from(&manager),
                request(ids.clone(), BulkOperation::Transition(SubmissionStatus::Reviewed)),
            )
            .await
            .unwrap();

        assert_eq!(report.summary, BulkSummary { total: 10, succeeded: 9, failed: 1 });
        assert!(!report.results[4].success);
        assert!(report.results[4].error.is_some());
        for (index, id) in ids.iter().enumerate() {
            let expected = if index == 4 {
                SubmissionStatus::Draft
            } else {
                SubmissionStatus::Reviewed
            };
            assert_eq!(repository.stored(*id).map(|s| s.status), Some(expected));
        }
        assert_eq!(repository.transitions().len(), 9);
    }

    #[tokio::test]
    async fn dry_run_writes_only_the_summary_event() {
        let (engine, repository, _) = engine_with(RecordingNotifier::default());
        let author = repository.add_user(Role::Writer);
        let admin = repository.add_user(Role::Admin);
        let reviewer = repository.add_user(Role::StoryManager);

        let first = repository.insert(sample_submission(&author, SubmissionStatus::PendingAdmin));
        let second = repository.insert(sample_submission(&author, SubmissionStatus::Draft));
        let ids = vec![first.id, second.id];

        let operations = [
            BulkOperation::Transition(SubmissionStatus::Published),
            BulkOperation::Assign(reviewer.id),
            BulkOperation::Archive,
            BulkOperation::Delete,
        ];

        for operation in operations {
            let report = engine
                .bulk(
                    &Actor::from(&admin),
                    BulkRequest {
                        dry_run: true,
                        ..request(ids.clone(), operation)
                    },
                )
                .await
                .unwrap();
            assert!(report.dry_run);
        }

        assert_eq!(repository.stored(first.id), Some(first));
        assert_eq!(repository.stored(second.id), Some(second));
        assert!(repository.transitions().is_empty());

        let events = repository.events();
        assert_eq!(events.len(), 4);
        assert!(events.iter().all(|event| event.event_type == AuditEventType::BulkOperation));
    }

    #[tokio::test]
    async fn dry_run_previews_each_item() {
        let (engine, repository, _) = engine_with(RecordingNotifier::default());
        let author = repository.add_user(Role::Writer);
        let publisher = repository.add_user(Role::ContentAdmin);
        let ready = repository.insert(sample_submission(&author, SubmissionStatus::PendingAdmin));
        let early = repository.insert(sample_submission(&author, SubmissionStatus::Draft));

        let report = engine
            .bulk(
                &Actor::from(&publisher),
                BulkRequest {
                    dry_run: true,
                    ..request(
                        vec![ready.id, early.id],
                        BulkOperation::Transition(SubmissionStatus::Published),
                    )
                },
            )
            .await
            .unwrap();

        assert_eq!(report.results[0].details.as_ref().unwrap()["wouldTransition"], json!(true));
        assert!(!report.results[1].success);
        assert_eq!(report.message(), "Dry run completed: 1 would succeed, 1 would fail");
    }

    #[tokio::test]
    async fn strict_batch_aborts_before_any_write() {
        let (engine, repository, _) = engine_with(RecordingNotifier::default());
        let author = repository.add_user(Role::Writer);
        let manager = repository.add_user(Role::StoryManager);
        let good = repository.insert(sample_submission(&author, SubmissionStatus::PendingReview));
        let bad = repository.insert(sample_submission(&author, SubmissionStatus::Published));

        let error = engine
            .bulk(
                &Actor::from(&manager),
                BulkRequest {
                    skip_invalid: false,
                    ..request(
                        vec![good.id, bad.id],
                        BulkOperation::Transition(SubmissionStatus::Reviewed),
                    )
                },
            )
            .await
            .unwrap_err();

        assert!(
            matches!(
                error,
                WorkflowError::BulkAborted { submission_id, .. } if submission_id == bad.id
            ),
            "{error:?}"
        );
        assert_eq!(repository.stored(good.id), Some(good));
        assert!(repository.transitions().is_empty());
        assert_eq!(repository.events().len(), 1);
    }

    #[tokio::test]
    async fn archive_is_bulk_only_and_role_gated() {
        let (engine, repository, _) = engine_with(RecordingNotifier::default());
        let author = repository.add_user(Role::Writer);
        let coordinator = repository.add_user(Role::BookManager);
        let manager = repository.add_user(Role::StoryManager);
        let published = repository.insert(sample_submission(&author, SubmissionStatus::Published));

        let report = engine
            .bulk(&Actor::from(&manager), request(vec![published.id], BulkOperation::Archive))
            .await
            .unwrap();
        assert_eq!(report.summary.failed, 1);

        let report = engine
            .bulk(&Actor::from(&coordinator), request(vec![published.id], BulkOperation::Archive))
            .await
            .unwrap();
        assert_eq!(report.summary.succeeded, 1);

        let archived = repository.stored(published.id).unwrap();
        assert_eq!(archived.status, SubmissionStatus::Archived);
        assert!(archived.archived_at.is_some());
        assert_eq!(repository.transitions()[0].reason, "Bulk archive operation");
    }

    #[tokio::test]
    async fn assign_records_one_event_per_item() {
        let (engine, repository, _) = engine_with(RecordingNotifier::default());
        let author = repository.add_user(Role::Writer);
        let coordinator = repository.add_user(Role::BookManager);
        let reviewer = repository.add_user(Role::StoryManager);
        let first = repository.insert(sample_submission(&author, SubmissionStatus::PendingReview));
        let second = repository.insert(sample_submission(&author, SubmissionStatus::PendingReview));

        let report = engine
            .bulk(
                &Actor::from(&coordinator),
                request(vec![first.id, second.id, first.id], BulkOperation::Assign(reviewer.id)),
            )
            .await
            .unwrap();

        assert_eq!(report.summary.total, 2);
        assert_eq!(repository.stored(first.id).unwrap().reviewer_id, Some(reviewer.id));
        assert!(repository.stored(second.id).unwrap().assigned_at.is_some());

        let assigned = repository
            .events()
            .into_iter()
            .filter(|event| event.event_type == AuditEventType::ReviewerAssigned)
            .count();
        assert_eq!(assigned, 2);
    }

    #[tokio::test]
    async fn assignee_must_be_known_staff() {
        let (engine, repository, _) = engine_with(RecordingNotifier::default());
        let author = repository.add_user(Role::Writer);
        let admin = repository.add_user(Role::Admin);
        let submission =
            repository.insert(sample_submission(&author, SubmissionStatus::PendingReview));

        let error = engine
            .bulk(
                &Actor::from(&admin),
                request(vec![submission.id], BulkOperation::Assign(author.id)),
            )
            .await
            .unwrap_err();
        assert!(matches!(error, WorkflowError::Validation(_)));

        let stranger = UserId::generate();
        let error = engine
            .bulk(
                &Actor::from(&admin),
                request(vec![submission.id], BulkOperation::Assign(stranger)),
            )
            .await
            .unwrap_err();
        assert!(matches!(error, WorkflowError::UnknownUser(id) if id == stranger));
    }

    #[tokio::test]
    async fn delete_is_for_admins_and_keeps_the_trail() {
        let (engine, repository, _) = engine_with(RecordingNotifier::default());
        let author = repository.add_user(Role::Writer);
        let publisher = repository.add_user(Role::ContentAdmin);
        let admin = repository.add_user(Role::Admin);
        let submission = repository.insert(sample_submission(&author, SubmissionStatus::Rejected));

        let error = engine
            .bulk(&Actor::from(&publisher), request(vec![submission.id], BulkOperation::Delete))
            .await
            .unwrap_err();
        assert!(matches!(error, WorkflowError::Forbidden(_)));

        let report = engine
            .bulk(&Actor::from(&admin), request(vec![submission.id], BulkOperation::Delete))
            .await
            .unwrap();
        assert_eq!(report.summary.succeeded, 1);
        assert_eq!(repository.stored(submission.id), None);

        let deleted: Vec<_> = repository
            .events()
            .into_iter()
            .filter(|event| event.event_type == AuditEventType::SubmissionDeleted)
            .collect();
        assert_eq!(deleted.len(), 1);
        assert_eq!(deleted[0].submission_id, Some(submission.id));
    }

    #[tokio::test]
    async fn batch_size_is_bounded() {
        let (engine, repository, _) = engine_with(RecordingNotifier::default());
        let admin = repository.add_user(Role::Admin);
        let learner = repository.add_user(Role::Learner);

        let too_many: Vec<_> = (0..101).map(|_| SubmissionId::generate()).collect();
        let error = engine
            .bulk(&Actor::from(&admin), request(too_many, BulkOperation::Archive))
            .await
            .unwrap_err();
        assert!(matches!(error, WorkflowError::Validation(_)));

        let error = engine
            .bulk(&Actor::from(&admin), request(Vec::new(), BulkOperation::Archive))
            .await
            .unwrap_err();
        assert!(matches!(error, WorkflowError::Validation(_)));

        let error = engine
            .bulk(
                &Actor::from(&learner),
                request(vec![SubmissionId::generate()], BulkOperation::Archive),
            )
            .await
            .unwrap_err();
        assert!(matches!(error, WorkflowError::Forbidden(_)));
    }

    #[tokio::test]
    async fn repeated_ids_count_against_the_bound() {
        let (engine, repository, _) = engine_with(RecordingNotifier::default());
        let author = repository.add_user(Role::Writer);
        let admin = repository.add_user(Role::Admin);
        let submission = repository.insert(sample_submission(&author, SubmissionStatus::Draft));

        let error = engine
            .bulk(
                &Actor::from(&admin),
                request(vec![submission.id; 5000], BulkOperation::Archive),
            )
            .await
            .unwrap_err();

        assert!(matches!(error, WorkflowError::Validation(_)), "{error:?}");
        assert_eq!(repository.stored(submission.id), Some(submission));
        assert!(repository.transitions().is_empty());
        assert!(repository.events().is_empty());
    }

    #[tokio::test]
    async fn missing_items_fail_alone() {
        let (engine, repository, _) = engine_with(RecordingNotifier::default());
        let author = repository.add_user(Role::Writer);
        let admin = repository.add_user(Role::Admin);
        let present = repository.insert(sample_submission(&author, SubmissionStatus::Draft));
        let absent = SubmissionId::generate();

        let report = engine
            .bulk(&Actor::from(&admin), request(vec![absent, present.id], BulkOperation::Archive))
            .await
            .unwrap();

        assert_eq!(report.summary, BulkSummary { total: 2, succeeded: 1, failed: 1 });
        assert_eq!(
            report.results[0].error.as_deref(),
            Some(format!("submission {absent} not found").as_str())
        );
    }
}
