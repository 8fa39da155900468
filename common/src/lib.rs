pub mod database;
pub mod domain;

// Workflow tables

pub const USERS_TABLE_NAME: &str = "users";
pub const SUBMISSIONS_TABLE_NAME: &str = "submissions";
pub const TRANSITIONS_TABLE_NAME: &str = "workflow_transitions";
pub const AUDIT_EVENTS_TABLE_NAME: &str = "audit_events";

// Common field names

pub const ID_FIELD_NAME: &str = "id";
pub const STATUS_FIELD_NAME: &str = "status";
pub const CREATED_FIELD_NAME: &str = "created_at";
pub const UPDATED_FIELD_NAME: &str = "updated_at";
pub const VERSION_FIELD_NAME: &str = "version";

// Stage stamps written by the workflow

pub const REVIEWED_BY_FIELD_NAME: &str = "reviewed_by";
pub const REVIEWED_FIELD_NAME: &str = "reviewed_at";
pub const COORDINATOR_FIELD_NAME: &str = "coordinator_id";
pub const COORDINATOR_APPROVED_FIELD_NAME: &str = "coordinator_approved_at";
pub const ADMIN_FIELD_NAME: &str = "admin_id";
pub const ADMIN_APPROVED_FIELD_NAME: &str = "admin_approved_at";
pub const PUBLISHED_FIELD_NAME: &str = "published_at";
pub const ARCHIVED_FIELD_NAME: &str = "archived_at";

// expose domain module

pub use domain::*;
