use storyflow_common::SubmissionStatus;

use crate::domain::submission::Submission;
use crate::domain::workflow::error::FieldError;

/// Every unmet precondition of `target` on the would-be submission.
/// An empty result means the status may be reached.
pub fn validate(target: SubmissionStatus, candidate: &Submission) -> Vec<FieldError> {
    let mut errors = Vec::new();

    match target {
        SubmissionStatus::PendingReview
        | SubmissionStatus::Reviewed
        | SubmissionStatus::PendingCoordinator
        | SubmissionStatus::ApprovedCoordinator
        | SubmissionStatus::PendingAdmin
        | SubmissionStatus::Published => {
            require(&mut errors, "title", Some(&candidate.title));
            require(&mut errors, "content", Some(&candidate.content));
            require(&mut errors, "author", Some(&candidate.author_name));
        }
        SubmissionStatus::Rejected => {
            require(
                &mut errors,
                "rejectionReason",
                candidate.rejection_reason.as_ref(),
            );
        }
        SubmissionStatus::Draft | SubmissionStatus::Archived => {}
    }

    errors
}

fn require(errors: &mut Vec<FieldError>, field: &'static str, value: Option<&String>) {
    if value.is_none_or(|value| value.trim().is_empty()) {
        errors.push(FieldError::required(field));
    }
}
