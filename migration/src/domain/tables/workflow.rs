use storyflow_common::{
    ADMIN_APPROVED_FIELD_NAME, ADMIN_FIELD_NAME, ARCHIVED_FIELD_NAME, AUDIT_EVENTS_TABLE_NAME,
    COORDINATOR_APPROVED_FIELD_NAME, COORDINATOR_FIELD_NAME, CREATED_FIELD_NAME, ID_FIELD_NAME,
    PUBLISHED_FIELD_NAME, Priority, REVIEWED_BY_FIELD_NAME, REVIEWED_FIELD_NAME, Role,
    STATUS_FIELD_NAME, SUBMISSIONS_TABLE_NAME, SubmissionStatus, TRANSITIONS_TABLE_NAME,
    UPDATED_FIELD_NAME, USERS_TABLE_NAME, VERSION_FIELD_NAME,
};

use crate::domain::tables::{Column, ColumnType, ForeignKeyConstraint, Index, Table};

/// Tables of the publishing workflow, in dependency order
pub fn workflow_tables() -> Vec<Table> {
    vec![
        users_table(),
        submissions_table(),
        transitions_table(),
        audit_events_table(),
    ]
}

fn statuses() -> impl Iterator<Item = &'static str> {
    SubmissionStatus::ALL.into_iter().map(|status| status.as_str())
}

fn created_at() -> Column {
    Column::new(CREATED_FIELD_NAME, ColumnType::TimestampTZ)
        .required()
        .default_value("now()")
}

fn users_table() -> Table {
    let columns = vec![
        Column::primary_key(ID_FIELD_NAME, ColumnType::Uuid),
        Column::new("name", ColumnType::Text).required(),
        Column::new("email", ColumnType::Text).required().unique(),
        Column::new("role", ColumnType::Text)
            .required()
            .one_of(Role::ALL.into_iter().map(|role| role.as_str())),
        created_at(),
    ];

    Table::new(USERS_TABLE_NAME, columns, Vec::new(), Vec::new())
}

fn submissions_table() -> Table {
    use ColumnType::*;

    let columns = vec![
        Column::primary_key(ID_FIELD_NAME, Uuid),
        Column::new("title", Text).required(),
        Column::new("content", Text).required(),
        Column::new("summary", Text),
        Column::new("author_id", Uuid).required(),
        Column::new("author_name", Text).required(),
        Column::new(STATUS_FIELD_NAME, Text)
            .required()
            .default_value(format!("'{}'", SubmissionStatus::Draft))
            .one_of(statuses()),
        Column::new("priority", Text)
            .required()
            .default_value(format!("'{}'", Priority::default()))
            .one_of(Priority::ALL.into_iter().map(|priority| priority.as_str())),
        Column::new(VERSION_FIELD_NAME, Integer)
            .required()
            .default_value("1"),
        Column::new("reviewer_id", Uuid),
        Column::new("assigned_at", TimestampTZ),
        Column::new(REVIEWED_BY_FIELD_NAME, Uuid),
        Column::new(REVIEWED_FIELD_NAME, TimestampTZ),
        Column::new("review_notes", Text),
        Column::new(COORDINATOR_FIELD_NAME, Uuid),
        Column::new(COORDINATOR_APPROVED_FIELD_NAME, TimestampTZ),
        Column::new("coordinator_notes", Text),
        Column::new(ADMIN_FIELD_NAME, Uuid),
        Column::new(ADMIN_APPROVED_FIELD_NAME, TimestampTZ),
        Column::new("admin_notes", Text),
        Column::new(PUBLISHED_FIELD_NAME, TimestampTZ),
        Column::new(ARCHIVED_FIELD_NAME, TimestampTZ),
        Column::new("rejection_reason", Text),
        Column::new("revision_requested", Boolean)
            .required()
            .default_value("false"),
        Column::new("revision_count", Integer)
            .required()
            .default_value("0"),
        created_at(),
        Column::new(UPDATED_FIELD_NAME, TimestampTZ)
            .required()
            .default_value("now()"),
    ];

    let foreign_keys = vec![ForeignKeyConstraint::new(
        SUBMISSIONS_TABLE_NAME,
        "author_id",
        USERS_TABLE_NAME,
        ID_FIELD_NAME,
    )];

    // overdue scans filter on status and age
    let indexes = vec![
        Index::new(SUBMISSIONS_TABLE_NAME, vec![STATUS_FIELD_NAME, UPDATED_FIELD_NAME], false),
        Index::new(SUBMISSIONS_TABLE_NAME, vec!["author_id"], false),
    ];

    Table::new(SUBMISSIONS_TABLE_NAME, columns, foreign_keys, indexes)
}

/// Audit tables carry no foreign key on submission_id: their rows outlive
/// deleted submissions.
fn transitions_table() -> Table {
    let columns = vec![
        Column::primary_key(ID_FIELD_NAME, ColumnType::Uuid),
        Column::new("submission_id", ColumnType::Uuid).required(),
        Column::new("from_status", ColumnType::Text)
            .required()
            .one_of(statuses()),
        Column::new("to_status", ColumnType::Text)
            .required()
            .one_of(statuses()),
        Column::new("performed_by", ColumnType::Uuid).required(),
        Column::new("reason", ColumnType::Text).required(),
        created_at(),
        // commit order; history is read by it, not by created_at
        Column::new("sequence", ColumnType::BigSerial).required(),
    ];

    let indexes = vec![Index::new(
        TRANSITIONS_TABLE_NAME,
        vec!["submission_id", "sequence"],
        false,
    )];

    Table::new(TRANSITIONS_TABLE_NAME, columns, Vec::new(), indexes)
}

fn audit_events_table() -> Table {
    let columns = vec![
        Column::primary_key(ID_FIELD_NAME, ColumnType::Uuid),
        Column::new("event_type", ColumnType::Text).required(),
        Column::new("submission_id", ColumnType::Uuid),
        Column::new("actor_id", ColumnType::Uuid).required(),
        Column::new("action", ColumnType::Text).required(),
        Column::new("reason", ColumnType::Text),
        Column::new("metadata", ColumnType::Jsonb)
            .required()
            .default_value("'{}'::jsonb"),
        created_at(),
    ];

    let indexes = vec![Index::new(
        AUDIT_EVENTS_TABLE_NAME,
        vec!["submission_id"],
        false,
    )];

    Table::new(AUDIT_EVENTS_TABLE_NAME, columns, Vec::new(), indexes)
}
