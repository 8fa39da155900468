use std::str::FromStr;

use chrono::{DateTime, Utc};
use itertools::Itertools;
use sqlx::{
    Postgres, Row,
    postgres::{PgArguments, PgRow},
    query::Query,
};
use storyflow_common::{
    ADMIN_APPROVED_FIELD_NAME, ADMIN_FIELD_NAME, ARCHIVED_FIELD_NAME,
    COORDINATOR_APPROVED_FIELD_NAME, COORDINATOR_FIELD_NAME, CREATED_FIELD_NAME, ID_FIELD_NAME,
    PUBLISHED_FIELD_NAME, REVIEWED_BY_FIELD_NAME, REVIEWED_FIELD_NAME, STATUS_FIELD_NAME,
    UPDATED_FIELD_NAME, UnknownVariant, VERSION_FIELD_NAME,
};
use uuid::Uuid;

use crate::domain::{
    repository::RepositoryError,
    submission::{Submission, User, lifecycle::WorkflowTransition},
};

/// Column order shared by every submission SELECT, INSERT and UPDATE
pub const SUBMISSION_COLUMNS: [&str; 27] = [
    ID_FIELD_NAME,
    "title",
    "content",
    "summary",
    "author_id",
    "author_name",
    STATUS_FIELD_NAME,
    "priority",
    VERSION_FIELD_NAME,
    "reviewer_id",
    "assigned_at",
    REVIEWED_BY_FIELD_NAME,
    REVIEWED_FIELD_NAME,
    "review_notes",
    COORDINATOR_FIELD_NAME,
    COORDINATOR_APPROVED_FIELD_NAME,
    "coordinator_notes",
    ADMIN_FIELD_NAME,
    ADMIN_APPROVED_FIELD_NAME,
    "admin_notes",
    PUBLISHED_FIELD_NAME,
    ARCHIVED_FIELD_NAME,
    "rejection_reason",
    "revision_requested",
    "revision_count",
    CREATED_FIELD_NAME,
    UPDATED_FIELD_NAME,
];

pub fn submission_columns() -> String {
    SUBMISSION_COLUMNS.join(", ")
}

/// `$1, $2, ...` for `count` parameters
pub fn placeholders(count: usize) -> String {
    (1..=count).map(|index| format!("${index}")).join(", ")
}

/// Binds every submission column, in `SUBMISSION_COLUMNS` order, starting at `$1`
pub fn bind_submission<'q>(
    query: Query<'q, Postgres, PgArguments>,
    submission: &'q Submission,
) -> Query<'q, Postgres, PgArguments> {
    query
        .bind(submission.id.0)
        .bind(submission.title.as_str())
        .bind(submission.content.as_str())
        .bind(submission.summary.as_deref())
        .bind(submission.author_id.0)
        .bind(submission.author_name.as_str())
        .bind(submission.status.as_str())
        .bind(submission.priority.as_str())
        .bind(submission.version)
        .bind(submission.reviewer_id.map(Uuid::from))
        .bind(submission.assigned_at)
        .bind(submission.reviewed_by.map(Uuid::from))
        .bind(submission.reviewed_at)
        .bind(submission.review_notes.as_deref())
        .bind(submission.coordinator_id.map(Uuid::from))
        .bind(submission.coordinator_approved_at)
        .bind(submission.coordinator_notes.as_deref())
        .bind(submission.admin_id.map(Uuid::from))
        .bind(submission.admin_approved_at)
        .bind(submission.admin_notes.as_deref())
        .bind(submission.published_at)
        .bind(submission.archived_at)
        .bind(submission.rejection_reason.as_deref())
        .bind(submission.revision_requested)
        .bind(submission.revision_count)
        .bind(submission.created_at)
        .bind(submission.updated_at)
}

pub fn row_to_submission(row: &PgRow) -> Result<Submission, RepositoryError> {
    Ok(Submission {
        id: column::<Uuid>(row, ID_FIELD_NAME)?.into(),
        title: column(row, "title")?,
        content: column(row, "content")?,
        summary: column(row, "summary")?,
        author_id: column::<Uuid>(row, "author_id")?.into(),
        author_name: column(row, "author_name")?,
        status: variant(row, STATUS_FIELD_NAME)?,
        priority: variant(row, "priority")?,
        version: column(row, VERSION_FIELD_NAME)?,
        reviewer_id: column::<Option<Uuid>>(row, "reviewer_id")?.map(Into::into),
        assigned_at: column(row, "assigned_at")?,
        reviewed_by: column::<Option<Uuid>>(row, REVIEWED_BY_FIELD_NAME)?.map(Into::into),
        reviewed_at: column(row, REVIEWED_FIELD_NAME)?,
        review_notes: column(row, "review_notes")?,
        coordinator_id: column::<Option<Uuid>>(row, COORDINATOR_FIELD_NAME)?.map(Into::into),
        coordinator_approved_at: column(row, COORDINATOR_APPROVED_FIELD_NAME)?,
        coordinator_notes: column(row, "coordinator_notes")?,
        admin_id: column::<Option<Uuid>>(row, ADMIN_FIELD_NAME)?.map(Into::into),
        admin_approved_at: column(row, ADMIN_APPROVED_FIELD_NAME)?,
        admin_notes: column(row, "admin_notes")?,
        published_at: column(row, PUBLISHED_FIELD_NAME)?,
        archived_at: column(row, ARCHIVED_FIELD_NAME)?,
        rejection_reason: column(row, "rejection_reason")?,
        revision_requested: column(row, "revision_requested")?,
        revision_count: column(row, "revision_count")?,
        created_at: column::<DateTime<Utc>>(row, CREATED_FIELD_NAME)?,
        updated_at: column::<DateTime<Utc>>(row, UPDATED_FIELD_NAME)?,
    })
}

pub fn row_to_user(row: &PgRow) -> Result<User, RepositoryError> {
    Ok(User {
        id: column::<Uuid>(row, ID_FIELD_NAME)?.into(),
        name: column(row, "name")?,
        email: column(row, "email")?,
        role: variant(row, "role")?,
    })
}

pub fn row_to_transition(row: &PgRow) -> Result<WorkflowTransition, RepositoryError> {
    Ok(WorkflowTransition {
        id: column(row, ID_FIELD_NAME)?,
        submission_id: column::<Uuid>(row, "submission_id")?.into(),
        from_status: variant(row, "from_status")?,
        to_status: variant(row, "to_status")?,
        performed_by: column::<Uuid>(row, "performed_by")?.into(),
        reason: column(row, "reason")?,
        created_at: column(row, CREATED_FIELD_NAME)?,
    })
}

fn column<'r, T>(row: &'r PgRow, name: &str) -> Result<T, RepositoryError>
where
    T: sqlx::Decode<'r, Postgres> + sqlx::Type<Postgres>,
{
    row.try_get(name)
        .map_err(|e| RepositoryError::DatabaseError(format!("Failed to parse {}: {}", name, e)))
}

fn variant<T>(row: &PgRow, name: &str) -> Result<T, RepositoryError>
where
    T: FromStr<Err = UnknownVariant>,
{
    let raw: String = column(row, name)?;
    raw.parse()
        .map_err(|e: UnknownVariant| RepositoryError::DatabaseError(e.to_string()))
}

/// Unique violations are reported apart, everything else is a plain database error
pub fn database_error(error: sqlx::Error) -> RepositoryError {
    if let Some(db_error) = error.as_database_error() {
        if db_error.is_unique_violation() {
            return RepositoryError::UniqueViolation(db_error.message().to_string());
        }
    }
    RepositoryError::DatabaseError(error.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn placeholders_are_numbered_from_one() {
        assert_eq!(placeholders(3), "$1, $2, $3");
    }

    #[test]
    fn column_list_starts_with_the_key() {
        let columns = submission_columns();
        assert!(columns.starts_with("id, title, content"));
        assert!(columns.ends_with("created_at, updated_at"));
        assert_eq!(SUBMISSION_COLUMNS.iter().unique().count(), SUBMISSION_COLUMNS.len());
    }
}
