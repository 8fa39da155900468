pub mod lifecycle;

use chrono::{DateTime, Utc};
use storyflow_common::{Role, SubmissionId, SubmissionStatus, UserId};
use uuid::Uuid;

pub use storyflow_common::Priority;

/// A story in flight through the publishing pipeline: one row of `submissions`.
///
/// Stage stamps (`reviewed_*`, `coordinator_*`, `admin_*`) are written only by
/// the workflow. `published_at` is set on publication and survives archiving.
#[derive(Debug, Clone, PartialEq)]
pub struct Submission {
    pub id: SubmissionId,
    pub title: String,
    pub content: String,
    pub summary: Option<String>,
    pub author_id: UserId,
    /// Pen name shown on the published book
    pub author_name: String,
    pub status: SubmissionStatus,
    pub priority: Priority,
    /// Bumped on every committed transition, used for optimistic checks
    pub version: i32,

    pub reviewer_id: Option<UserId>,
    pub assigned_at: Option<DateTime<Utc>>,

    pub reviewed_by: Option<UserId>,
    pub reviewed_at: Option<DateTime<Utc>>,
    pub review_notes: Option<String>,

    pub coordinator_id: Option<UserId>,
    pub coordinator_approved_at: Option<DateTime<Utc>>,
    pub coordinator_notes: Option<String>,

    pub admin_id: Option<UserId>,
    pub admin_approved_at: Option<DateTime<Utc>>,
    pub admin_notes: Option<String>,

    pub published_at: Option<DateTime<Utc>>,
    pub archived_at: Option<DateTime<Utc>>,
    pub rejection_reason: Option<String>,

    /// Set while the submission sits in PENDING_REVIEW because a reviewer
    /// asked for changes, as opposed to a first submission
    pub revision_requested: bool,
    pub revision_count: i32,

    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Fields an author provides when starting a draft
#[derive(Debug, Clone, PartialEq)]
pub struct NewSubmission {
    pub title: String,
    pub content: String,
    pub summary: Option<String>,
    pub author_id: UserId,
    pub author_name: String,
    pub priority: Priority,
}

impl Submission {
    pub fn draft(new: NewSubmission, now: DateTime<Utc>) -> Self {
        Self {
            id: SubmissionId::generate(),
            title: new.title,
            content: new.content,
            summary: new.summary,
            author_id: new.author_id,
            author_name: new.author_name,
            status: SubmissionStatus::Draft,
            priority: new.priority,
            version: 1,
            reviewer_id: None,
            assigned_at: None,
            reviewed_by: None,
            reviewed_at: None,
            review_notes: None,
            coordinator_id: None,
            coordinator_approved_at: None,
            coordinator_notes: None,
            admin_id: None,
            admin_approved_at: None,
            admin_notes: None,
            published_at: None,
            archived_at: None,
            rejection_reason: None,
            revision_requested: false,
            revision_count: 0,
            created_at: now,
            updated_at: now,
        }
    }
}

/// A person known to the platform, one row of `users`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct User {
    pub id: UserId,
    pub name: String,
    pub email: String,
    pub role: Role,
}

/// Whoever is performing a workflow operation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Actor {
    pub id: UserId,
    pub role: Role,
}

impl Actor {
    /// Automated stage hand-offs are recorded against the nil user.
    pub fn system() -> Self {
        Self {
            id: UserId(Uuid::nil()),
            role: Role::System,
        }
    }
}

impl From<&User> for Actor {
    fn from(user: &User) -> Self {
        Self {
            id: user.id,
            role: user.role,
        }
    }
}
