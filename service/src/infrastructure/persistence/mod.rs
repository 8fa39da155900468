use chrono::{DateTime, Utc};
use futures::TryStreamExt;
use sqlx::types::Json;
use storyflow_common::{
    AUDIT_EVENTS_TABLE_NAME, SUBMISSIONS_TABLE_NAME, SubmissionId, SubmissionStatus,
    TRANSITIONS_TABLE_NAME, USERS_TABLE_NAME, UserId, database::Database,
};
use uuid::Uuid;

use crate::domain::{
    repository::{RepositoryError, SubmissionRepository},
    submission::{
        NewSubmission, Submission, User,
        lifecycle::{AuditEvent, WorkflowTransition},
    },
    workflow::{StatusChange, error::WorkflowError},
};

use rows::{
    SUBMISSION_COLUMNS, bind_submission, database_error, placeholders, row_to_submission,
    row_to_transition, row_to_user, submission_columns,
};

mod rows;

const TRANSITION_COLUMNS: &str =
    "id, submission_id, from_status, to_status, performed_by, reason, created_at";

#[derive(Clone, Debug)]
pub struct PostgresSubmissionRepository {
    database: &'static Database,
}

impl PostgresSubmissionRepository {
    pub fn new(database: &'static Database) -> Self {
        Self { database }
    }

    fn select_submission_sql(suffix: &str) -> String {
        format!(
            "SELECT {} FROM {} {}",
            submission_columns(),
            SUBMISSIONS_TABLE_NAME,
            suffix
        )
    }

    fn insert_event_sql() -> String {
        format!(
            "INSERT INTO {} \
             (id, event_type, submission_id, actor_id, action, reason, metadata, created_at) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8)",
            AUDIT_EVENTS_TABLE_NAME
        )
    }

    /// `sequence` is assigned on insert, so it follows commit order even when
    /// two writers' clocks disagree
    fn history_sql() -> String {
        format!(
            "SELECT {} FROM {} WHERE submission_id = $1 ORDER BY sequence",
            TRANSITION_COLUMNS, TRANSITIONS_TABLE_NAME
        )
    }

    async fn insert_event<'c, E>(executor: E, event: &AuditEvent) -> Result<(), RepositoryError>
    where
        E: sqlx::Executor<'c, Database = sqlx::Postgres>,
    {
        let sql = Self::insert_event_sql();
        tracing::debug!("{}", sql);
        sqlx::query(&sql)
            .bind(event.id)
            .bind(event.event_type.as_str())
            .bind(event.submission_id.map(Uuid::from))
            .bind(event.actor_id.0)
            .bind(event.action.as_str())
            .bind(event.reason.as_deref())
            .bind(Json(&event.metadata))
            .bind(event.created_at)
            .execute(executor)
            .await
            .map_err(database_error)?;
        Ok(())
    }
}

impl SubmissionRepository for PostgresSubmissionRepository {
    async fn find_user(&self, id: UserId) -> Result<Option<User>, RepositoryError> {
        let sql = format!(
            "SELECT id, name, email, role FROM {} WHERE id = $1",
            USERS_TABLE_NAME
        );
        let row = sqlx::query(&sql)
            .bind(id.0)
            .fetch_optional(self.database.database_pool())
            .await
            .map_err(database_error)?;

        row.as_ref().map(row_to_user).transpose()
    }

    async fn create(&self, submission: NewSubmission) -> Result<Submission, RepositoryError> {
        let submission = Submission::draft(submission, Utc::now());
        let sql = format!(
            "INSERT INTO {} ({}) VALUES ({})",
            SUBMISSIONS_TABLE_NAME,
            submission_columns(),
            placeholders(SUBMISSION_COLUMNS.len())
        );
        tracing::debug!("{}", sql);

        bind_submission(sqlx::query(&sql), &submission)
            .execute(self.database.database_pool())
            .await
            .map_err(database_error)?;

        Ok(submission)
    }

    async fn find_by_id(&self, id: SubmissionId) -> Result<Option<Submission>, RepositoryError> {
        let sql = Self::select_submission_sql("WHERE id = $1");
        let row = sqlx::query(&sql)
            .bind(id.0)
            .fetch_optional(self.database.database_pool())
            .await
            .map_err(database_error)?;

        row.as_ref().map(row_to_submission).transpose()
    }

    async fn apply_transition<F>(
        &self,
        id: SubmissionId,
        plan: F,
    ) -> Result<StatusChange, WorkflowError>
    where
        F: FnOnce(&Submission, DateTime<Utc>) -> Result<StatusChange, WorkflowError> + Send,
    {
        let mut transaction = self.database.begin().await.map_err(database_error)?;

        let sql = Self::select_submission_sql("WHERE id = $1 FOR UPDATE");
        let row = sqlx::query(&sql)
            .bind(id.0)
            .fetch_optional(&mut *transaction)
            .await
            .map_err(database_error)?;
        let current = match row {
            Some(row) => row_to_submission(&row)?,
            None => return Err(WorkflowError::NotFound(id)),
        };

        // read the clock only once the row lock is held
        let now = Utc::now();
        // an error here drops the transaction, which rolls it back
        let change = plan(&current, now)?;

        let assignments = SUBMISSION_COLUMNS[1..].join(", ");
        let values = (2..=SUBMISSION_COLUMNS.len())
            .map(|index| format!("${index}"))
            .collect::<Vec<_>>()
            .join(", ");
        let update = format!(
            "UPDATE {} SET ({}) = ({}) WHERE id = $1",
            SUBMISSIONS_TABLE_NAME, assignments, values
        );
        tracing::debug!("{}", update);
        bind_submission(sqlx::query(&update), &change.submission)
            .execute(&mut *transaction)
            .await
            .map_err(database_error)?;

        let transition = &change.transition;
        let insert = format!(
            "INSERT INTO {} ({}) VALUES ($1, $2, $3, $4, $5, $6, $7)",
            TRANSITIONS_TABLE_NAME, TRANSITION_COLUMNS
        );
        sqlx::query(&insert)
            .bind(transition.id)
            .bind(transition.submission_id.0)
            .bind(transition.from_status.as_str())
            .bind(transition.to_status.as_str())
            .bind(transition.performed_by.0)
            .bind(transition.reason.as_str())
            .bind(transition.created_at)
            .execute(&mut *transaction)
            .await
            .map_err(database_error)?;

        transaction.commit().await.map_err(database_error)?;
        Ok(change)
    }

    async fn history(&self, id: SubmissionId) -> Result<Vec<WorkflowTransition>, RepositoryError> {
        let sql = Self::history_sql();
        tracing::debug!("{}", sql);
        let mut db_rows = sqlx::query(&sql)
            .bind(id.0)
            .fetch(self.database.database_pool());

        let mut transitions = Vec::new();
        while let Some(row) = db_rows.try_next().await.map_err(database_error)? {
            transitions.push(row_to_transition(&row)?);
        }
        Ok(transitions)
    }

    async fn assign_reviewer(
        &self,
        id: SubmissionId,
        reviewer: UserId,
        event: AuditEvent,
    ) -> Result<Submission, RepositoryError> {
        let mut transaction = self.database.begin().await.map_err(database_error)?;

        let sql = format!(
            "UPDATE {} SET reviewer_id = $2, assigned_at = $3 WHERE id = $1 RETURNING {}",
            SUBMISSIONS_TABLE_NAME,
            submission_columns()
        );
        let row = sqlx::query(&sql)
            .bind(id.0)
            .bind(reviewer.0)
            .bind(event.created_at)
            .fetch_optional(&mut *transaction)
            .await
            .map_err(database_error)?
            .ok_or(RepositoryError::NotFound)?;
        let submission = row_to_submission(&row)?;

        Self::insert_event(&mut *transaction, &event).await?;
        transaction.commit().await.map_err(database_error)?;
        Ok(submission)
    }

    async fn delete(&self, id: SubmissionId, event: AuditEvent) -> Result<(), RepositoryError> {
        let mut transaction = self.database.begin().await.map_err(database_error)?;

        let sql = format!("DELETE FROM {} WHERE id = $1", SUBMISSIONS_TABLE_NAME);
        let deleted = sqlx::query(&sql)
            .bind(id.0)
            .execute(&mut *transaction)
            .await
            .map_err(database_error)?;
        if deleted.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }

        Self::insert_event(&mut *transaction, &event).await?;
        transaction.commit().await.map_err(database_error)?;
        Ok(())
    }

    async fn record_event(&self, event: AuditEvent) -> Result<(), RepositoryError> {
        Self::insert_event(self.database.database_pool(), &event).await
    }

    async fn find_stale(
        &self,
        status: SubmissionStatus,
        revision_requested: bool,
        updated_before: DateTime<Utc>,
    ) -> Result<Vec<Submission>, RepositoryError> {
        let sql = Self::select_submission_sql(
            "WHERE status = $1 AND revision_requested = $2 AND updated_at < $3 ORDER BY updated_at",
        );
        let mut db_rows = sqlx::query(&sql)
            .bind(status.as_str())
            .bind(revision_requested)
            .bind(updated_before)
            .fetch(self.database.database_pool());

        let mut submissions = Vec::new();
        while let Some(row) = db_rows.try_next().await.map_err(database_error)? {
            submissions.push(row_to_submission(&row)?);
        }
        Ok(submissions)
    }
}
