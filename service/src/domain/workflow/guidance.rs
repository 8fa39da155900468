//! Read-only hints shown next to a submission: what happens next, what the
//! caller may do now, and how far along the pipeline it is.

use serde::Serialize;
use storyflow_common::SubmissionStatus;

use crate::domain::submission::{Actor, Submission, lifecycle::WorkflowTransition};
use crate::domain::workflow::{action::Action, table};

pub fn next_steps(status: SubmissionStatus) -> &'static [&'static str] {
    match status {
        SubmissionStatus::Draft => &[
            "Submit for review",
            "Add additional content",
            "Update metadata",
        ],
        SubmissionStatus::PendingReview => &[
            "Wait for Story Manager review",
            "Respond to feedback if requested",
        ],
        SubmissionStatus::Reviewed => &[
            "Submission will proceed to Book Manager",
            "Book Manager will decide publication format",
        ],
        SubmissionStatus::PendingCoordinator => &[
            "Wait for Book Manager review",
            "Publication format decision pending",
        ],
        SubmissionStatus::ApprovedCoordinator => &[
            "Submission will proceed to Content Admin",
            "Final approval pending",
        ],
        SubmissionStatus::PendingAdmin => &[
            "Wait for Content Admin final approval",
            "Publication scheduling pending",
        ],
        SubmissionStatus::Published => &[
            "Story is live on the platform",
            "Monitor engagement and feedback",
        ],
        SubmissionStatus::Rejected => &[
            "Review rejection reason",
            "Make requested changes",
            "Resubmit if appropriate",
        ],
        SubmissionStatus::Archived => &[],
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PossibleAction {
    pub action: Action,
    pub target_status: SubmissionStatus,
    pub label: &'static str,
    pub requires_reason: bool,
}

fn label(action: Action) -> &'static str {
    match action {
        Action::SubmitForReview => "Submit for Review",
        Action::Review => "Approve",
        Action::RequestChanges => "Request Changes",
        Action::Reject => "Reject",
        Action::RequestCoordinator => "Send to Book Manager",
        Action::ApproveCoordinator => "Approve Format",
        Action::RequestAdmin => "Send to Content Admin",
        Action::ApproveAdmin => "Publish",
        Action::Revise => "Revise",
        Action::Resubmit => "Resubmit",
    }
}

/// What `actor` may do with `submission` right now, read off the transition table
pub fn possible_actions(submission: &Submission, actor: &Actor) -> Vec<PossibleAction> {
    table::targets_for(submission, actor)
        .into_iter()
        .filter_map(|to| Action::for_edge(submission.status, to))
        .map(|action| PossibleAction {
            action,
            target_status: action.target(),
            label: label(action),
            requires_reason: action.target() == SubmissionStatus::Rejected,
        })
        .collect()
}

const MAIN_LINE: [(SubmissionStatus, &str); 7] = [
    (SubmissionStatus::Draft, "Draft"),
    (SubmissionStatus::PendingReview, "Story Review"),
    (SubmissionStatus::Reviewed, "Reviewed"),
    (SubmissionStatus::PendingCoordinator, "Book Manager Review"),
    (SubmissionStatus::ApprovedCoordinator, "Format Approved"),
    (SubmissionStatus::PendingAdmin, "Content Admin Review"),
    (SubmissionStatus::Published, "Published"),
];

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkflowProgress {
    pub current_step: usize,
    pub total_steps: usize,
    pub step_name: &'static str,
    pub percentage: u8,
}

/// Rejected and archived submissions are off the main line and report step 1.
pub fn progress(status: SubmissionStatus) -> WorkflowProgress {
    let position = MAIN_LINE.iter().position(|(step, _)| *step == status);
    let total_steps = MAIN_LINE.len();
    let current_step = position.map_or(1, |index| index + 1);
    let step_name = position.map_or("Unknown", |index| MAIN_LINE[index].1);
    let percentage = ((current_step * 100) as f64 / total_steps as f64).round() as u8;

    WorkflowProgress {
        current_step,
        total_steps,
        step_name,
        percentage,
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct StatusOverview {
    pub submission: Submission,
    pub history: Vec<WorkflowTransition>,
    pub possible_actions: Vec<PossibleAction>,
    pub progress: WorkflowProgress,
}

impl StatusOverview {
    pub fn new(submission: Submission, history: Vec<WorkflowTransition>, actor: &Actor) -> Self {
        let possible_actions = possible_actions(&submission, actor);
        let progress = progress(submission.status);
        Self {
            submission,
            history,
            possible_actions,
            progress,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::{sample_submission, user_with_role};
    use storyflow_common::Role;

    #[test]
    fn progress_over_the_main_line() {
        assert_eq!(
            progress(SubmissionStatus::Draft),
            WorkflowProgress {
                current_step: 1,
                total_steps: 7,
                step_name: "Draft",
                percentage: 14,
            }
        );
        assert_eq!(progress(SubmissionStatus::PendingAdmin).current_step, 6);
        assert_eq!(progress(SubmissionStatus::Published).percentage, 100);
    }

    #[test]
    fn off_line_statuses_are_unknown() {
        let rejected = progress(SubmissionStatus::Rejected);
        assert_eq!(rejected.current_step, 1);
        assert_eq!(rejected.step_name, "Unknown");
    }

    #[test]
    fn reviewer_sees_review_actions() {
        let author = user_with_role(Role::Writer);
        let manager = user_with_role(Role::StoryManager);
        let submission = sample_submission(&author, SubmissionStatus::Reviewed);

        let actions: Vec<_> = possible_actions(&submission, &Actor::from(&manager))
            .into_iter()
            .map(|possible| possible.action)
            .collect();
        assert_eq!(
            actions,
            vec![Action::RequestChanges, Action::RequestCoordinator, Action::Reject]
        );
    }

    #[test]
    fn author_sees_resubmission_after_rejection() {
        let author = user_with_role(Role::Writer);
        let submission = sample_submission(&author, SubmissionStatus::Rejected);

        let actions = possible_actions(&submission, &Actor::from(&author));
        assert_eq!(actions.len(), 2);
        assert_eq!(actions[0].action, Action::Revise);
        assert_eq!(actions[1].action, Action::Resubmit);
        assert!(actions.iter().all(|possible| !possible.requires_reason));
    }

    #[test]
    fn rejected_work_has_next_steps() {
        assert_eq!(next_steps(SubmissionStatus::Rejected).len(), 3);
        assert!(next_steps(SubmissionStatus::Archived).is_empty());
    }
}
