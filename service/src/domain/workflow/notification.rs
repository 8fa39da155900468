use std::future::Future;

use chrono::{DateTime, Utc};
use serde::Serialize;
use storyflow_common::{SubmissionId, SubmissionStatus, UserId};

use crate::domain::submission::{Submission, lifecycle::WorkflowTransition};

/// Outbound channel towards authors. Delivery failures are reported back but
/// never undo the transition that caused them.
pub trait NotificationDispatcher: Clone + Send + Sync + 'static {
    fn dispatch(
        &self,
        notification: Notification,
    ) -> impl Future<Output = Result<(), anyhow::Error>> + Send;
}

const SIGNIFICANT: [SubmissionStatus; 3] = [
    SubmissionStatus::Reviewed,
    SubmissionStatus::Rejected,
    SubmissionStatus::Published,
];

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Notification {
    pub recipient: UserId,
    pub submission_id: SubmissionId,
    pub subject: String,
    pub from_status: String,
    pub to_status: String,
    pub reason: String,
    pub sent_at: DateTime<Utc>,
}

impl Notification {
    /// The message for the author, if the transition is one they hear about
    pub fn for_transition(
        submission: &Submission,
        transition: &WorkflowTransition,
    ) -> Option<Self> {
        if transition.from_status == transition.to_status
            || !SIGNIFICANT.contains(&transition.to_status)
        {
            return None;
        }

        Some(Self {
            recipient: submission.author_id,
            submission_id: submission.id,
            subject: format!("Story Submission Status Update: {}", submission.title),
            from_status: transition.from_status.humanized(),
            to_status: transition.to_status.humanized(),
            reason: transition.reason.clone(),
            sent_at: transition.created_at,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::{sample_submission, transition_of, user_with_role};
    use storyflow_common::Role;

    #[test]
    fn only_significant_targets_notify() {
        let author = user_with_role(Role::Writer);
        let submission = sample_submission(&author, SubmissionStatus::PendingCoordinator);

        for to in SubmissionStatus::ALL {
            let transition = transition_of(&submission, SubmissionStatus::Draft, to);
            let expected = SIGNIFICANT.contains(&to);
            assert_eq!(
                Notification::for_transition(&submission, &transition).is_some(),
                expected,
                "{to}"
            );
        }
    }

    #[test]
    fn message_is_addressed_to_the_author() {
        let author = user_with_role(Role::Writer);
        let submission = sample_submission(&author, SubmissionStatus::Published);
        let transition = transition_of(
            &submission,
            SubmissionStatus::PendingAdmin,
            SubmissionStatus::Published,
        );

        let notification = Notification::for_transition(&submission, &transition).unwrap();
        assert_eq!(notification.recipient, author.id);
        assert_eq!(
            notification.subject,
            format!("Story Submission Status Update: {}", submission.title)
        );
        assert_eq!(notification.from_status, "PENDING ADMIN");
        assert_eq!(notification.to_status, "PUBLISHED");
    }

    #[test]
    fn self_loops_stay_quiet() {
        let author = user_with_role(Role::Writer);
        let submission = sample_submission(&author, SubmissionStatus::Rejected);
        let transition = transition_of(
            &submission,
            SubmissionStatus::Rejected,
            SubmissionStatus::Rejected,
        );
        assert!(Notification::for_transition(&submission, &transition).is_none());
    }
}
