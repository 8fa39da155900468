use std::fmt::{Display, Formatter};
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::domain::UnknownVariant;

/// Where a submission stands in the publishing pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SubmissionStatus {
    Draft,
    PendingReview,
    Reviewed,
    PendingCoordinator,
    ApprovedCoordinator,
    PendingAdmin,
    Published,
    Rejected,
    Archived,
}

impl SubmissionStatus {
    pub const ALL: [SubmissionStatus; 9] = [
        SubmissionStatus::Draft,
        SubmissionStatus::PendingReview,
        SubmissionStatus::Reviewed,
        SubmissionStatus::PendingCoordinator,
        SubmissionStatus::ApprovedCoordinator,
        SubmissionStatus::PendingAdmin,
        SubmissionStatus::Published,
        SubmissionStatus::Rejected,
        SubmissionStatus::Archived,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            SubmissionStatus::Draft => "DRAFT",
            SubmissionStatus::PendingReview => "PENDING_REVIEW",
            SubmissionStatus::Reviewed => "REVIEWED",
            SubmissionStatus::PendingCoordinator => "PENDING_COORDINATOR",
            SubmissionStatus::ApprovedCoordinator => "APPROVED_COORDINATOR",
            SubmissionStatus::PendingAdmin => "PENDING_ADMIN",
            SubmissionStatus::Published => "PUBLISHED",
            SubmissionStatus::Rejected => "REJECTED",
            SubmissionStatus::Archived => "ARCHIVED",
        }
    }

    /// "PENDING_REVIEW" -> "PENDING REVIEW", used in author-facing messages
    pub fn humanized(&self) -> String {
        self.as_str().replace('_', " ")
    }
}

impl Display for SubmissionStatus {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SubmissionStatus {
    type Err = UnknownVariant;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        SubmissionStatus::ALL
            .into_iter()
            .find(|status| status.as_str() == value)
            .ok_or_else(|| UnknownVariant {
                kind: "submission status",
                value: value.to_string(),
            })
    }
}
