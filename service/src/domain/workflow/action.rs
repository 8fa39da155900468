use std::fmt::{Display, Formatter};
use std::str::FromStr;

use serde::Serialize;
use storyflow_common::SubmissionStatus;

use crate::domain::workflow::error::WorkflowError;

use SubmissionStatus::*;

/// Named steps of the pipeline, as used by the single-item endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Action {
    SubmitForReview,
    Review,
    RequestChanges,
    Reject,
    RequestCoordinator,
    ApproveCoordinator,
    RequestAdmin,
    ApproveAdmin,
    Revise,
    Resubmit,
}

const REJECTABLE: &[SubmissionStatus] = &[
    PendingReview,
    Reviewed,
    PendingCoordinator,
    ApprovedCoordinator,
    PendingAdmin,
];

impl Action {
    pub const ALL: [Action; 10] = [
        Action::SubmitForReview,
        Action::Review,
        Action::RequestChanges,
        Action::Reject,
        Action::RequestCoordinator,
        Action::ApproveCoordinator,
        Action::RequestAdmin,
        Action::ApproveAdmin,
        Action::Revise,
        Action::Resubmit,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Action::SubmitForReview => "submit_for_review",
            Action::Review => "review",
            Action::RequestChanges => "request_changes",
            Action::Reject => "reject",
            Action::RequestCoordinator => "request_coordinator",
            Action::ApproveCoordinator => "approve_coordinator",
            Action::RequestAdmin => "request_admin",
            Action::ApproveAdmin => "approve_admin",
            Action::Revise => "revise",
            Action::Resubmit => "resubmit",
        }
    }

    pub fn target(&self) -> SubmissionStatus {
        match self {
            Action::SubmitForReview | Action::RequestChanges | Action::Resubmit => PendingReview,
            Action::Review => Reviewed,
            Action::Reject => Rejected,
            Action::RequestCoordinator => PendingCoordinator,
            Action::ApproveCoordinator => ApprovedCoordinator,
            Action::RequestAdmin => PendingAdmin,
            Action::ApproveAdmin => Published,
            Action::Revise => Draft,
        }
    }

    /// Statuses this action can be taken from
    pub fn sources(&self) -> &'static [SubmissionStatus] {
        match self {
            Action::SubmitForReview => &[Draft],
            Action::Review => &[PendingReview],
            Action::RequestChanges => &[PendingReview, Reviewed],
            Action::Reject => REJECTABLE,
            Action::RequestCoordinator => &[Reviewed],
            Action::ApproveCoordinator => &[PendingCoordinator],
            Action::RequestAdmin => &[ApprovedCoordinator],
            Action::ApproveAdmin => &[PendingAdmin],
            Action::Revise | Action::Resubmit => &[Rejected],
        }
    }

    /// Target status when taken from `from`
    pub fn resolve(&self, from: SubmissionStatus) -> Result<SubmissionStatus, WorkflowError> {
        if self.sources().contains(&from) {
            Ok(self.target())
        } else {
            Err(WorkflowError::InvalidTransition {
                from,
                to: self.target(),
            })
        }
    }

    /// The action naming the edge `from -> to`, if there is one
    pub fn for_edge(from: SubmissionStatus, to: SubmissionStatus) -> Option<Action> {
        Action::ALL
            .into_iter()
            .find(|action| action.target() == to && action.sources().contains(&from))
    }
}

impl Display for Action {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Action {
    type Err = WorkflowError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        Action::ALL
            .into_iter()
            .find(|action| action.as_str() == value.trim())
            .ok_or_else(|| WorkflowError::Validation(format!("invalid action '{value}'")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::workflow::table;

    #[test]
    fn every_action_edge_is_in_the_table() {
        for action in Action::ALL {
            for from in action.sources() {
                assert!(
                    table::rule(*from, action.target()).is_some(),
                    "{action} from {from}"
                );
            }
        }
    }

    #[test]
    fn edges_name_at_most_one_action() {
        for from in SubmissionStatus::ALL {
            for to in SubmissionStatus::ALL {
                let named = Action::ALL
                    .into_iter()
                    .filter(|action| action.target() == to && action.sources().contains(&from))
                    .count();
                assert!(named <= 1, "{from} -> {to}");
            }
        }
    }

    #[test]
    fn reject_resolves_from_any_open_stage() {
        assert_eq!(Action::Reject.resolve(PendingAdmin).unwrap(), Rejected);
        assert!(matches!(
            Action::Reject.resolve(Draft),
            Err(WorkflowError::InvalidTransition { from: Draft, to: Rejected })
        ));
    }

    #[test]
    fn unknown_action_is_a_validation_error() {
        assert_eq!("approve_admin".parse::<Action>().unwrap(), Action::ApproveAdmin);
        let error = "publish_now".parse::<Action>().unwrap_err();
        assert!(matches!(error, WorkflowError::Validation(_)));
        assert_eq!(error.to_string(), "invalid action 'publish_now'");
    }
}
