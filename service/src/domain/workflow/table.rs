//! The publishing pipeline as one explicit allow-list of edges.
//!
//! Every legal `(from, to)` pair is enumerated below together with who may
//! take it. A pair that is not listed is never legal, whoever asks.

use std::collections::HashMap;
use std::sync::LazyLock;

use storyflow_common::{Role, SubmissionStatus};

use crate::domain::submission::{Actor, Submission};
use crate::domain::workflow::error::WorkflowError;

use SubmissionStatus::*;

/// Who is allowed to take an edge
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Gate {
    /// The submission's own author, whatever their role
    Author,
    /// Anyone holding one of these roles
    Roles(&'static [Role]),
}

impl Gate {
    /// Role-only view of the gate. Authorship can't be known from a role, so
    /// the author gate admits every role but the system one.
    pub fn admits_role(&self, role: Role) -> bool {
        match self {
            Gate::Author => role != Role::System,
            Gate::Roles(roles) => roles.contains(&role),
        }
    }

    fn admits(&self, submission: &Submission, actor: &Actor) -> bool {
        match self {
            Gate::Author => actor.id == submission.author_id,
            Gate::Roles(roles) => roles.contains(&actor.role),
        }
    }
}

/// How a transition was requested
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Channel {
    Direct,
    Bulk,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TransitionRule {
    pub from: SubmissionStatus,
    pub to: SubmissionStatus,
    pub gate: Gate,
    /// the author of the submission may not take this edge (no self-review)
    pub independent: bool,
    /// only reachable through the bulk operator
    pub bulk_only: bool,
}

const REVIEWERS: &[Role] = &[Role::StoryManager, Role::Admin];
const REVIEW_HANDOFF: &[Role] = &[Role::StoryManager, Role::Admin, Role::System];
const COORDINATORS: &[Role] = &[Role::BookManager, Role::Admin];
const COORDINATOR_HANDOFF: &[Role] = &[Role::BookManager, Role::Admin, Role::System];
const PUBLISHERS: &[Role] = &[Role::ContentAdmin, Role::Admin];
const ARCHIVISTS: &[Role] = &[Role::BookManager, Role::ContentAdmin, Role::Admin];

const fn by_author(from: SubmissionStatus, to: SubmissionStatus) -> TransitionRule {
    TransitionRule {
        from,
        to,
        gate: Gate::Author,
        independent: false,
        bulk_only: false,
    }
}

const fn by_staff(
    from: SubmissionStatus,
    to: SubmissionStatus,
    roles: &'static [Role],
) -> TransitionRule {
    TransitionRule {
        from,
        to,
        gate: Gate::Roles(roles),
        independent: true,
        bulk_only: false,
    }
}

const fn handoff(
    from: SubmissionStatus,
    to: SubmissionStatus,
    roles: &'static [Role],
) -> TransitionRule {
    TransitionRule {
        from,
        to,
        gate: Gate::Roles(roles),
        independent: false,
        bulk_only: false,
    }
}

const PIPELINE: &[TransitionRule] = &[
    by_author(Draft, PendingReview),
    by_staff(PendingReview, Reviewed, REVIEWERS),
    by_staff(PendingReview, Rejected, REVIEWERS),
    // request changes
    by_staff(PendingReview, PendingReview, REVIEWERS),
    handoff(Reviewed, PendingCoordinator, REVIEW_HANDOFF),
    // send back
    by_staff(Reviewed, PendingReview, REVIEWERS),
    by_staff(Reviewed, Rejected, REVIEWERS),
    by_staff(PendingCoordinator, ApprovedCoordinator, COORDINATORS),
    by_staff(PendingCoordinator, Rejected, COORDINATORS),
    handoff(ApprovedCoordinator, PendingAdmin, COORDINATOR_HANDOFF),
    by_staff(ApprovedCoordinator, Rejected, COORDINATORS),
    by_staff(PendingAdmin, Published, PUBLISHERS),
    by_staff(PendingAdmin, Rejected, PUBLISHERS),
    // revise, resubmit
    by_author(Rejected, Draft),
    by_author(Rejected, PendingReview),
];

static TABLE: LazyLock<HashMap<(SubmissionStatus, SubmissionStatus), TransitionRule>> =
    LazyLock::new(|| {
        let archive = SubmissionStatus::ALL
            .into_iter()
            .filter(|from| *from != Archived)
            .map(|from| TransitionRule {
                from,
                to: Archived,
                gate: Gate::Roles(ARCHIVISTS),
                independent: false,
                bulk_only: true,
            });

        PIPELINE
            .iter()
            .copied()
            .chain(archive)
            .map(|rule| ((rule.from, rule.to), rule))
            .collect()
    });

/// The rule for an edge, if the edge exists at all
pub fn rule(from: SubmissionStatus, to: SubmissionStatus) -> Option<&'static TransitionRule> {
    TABLE.get(&(from, to))
}

/// Pure role check: is the edge listed, and does its gate admit the role?
pub fn is_allowed(from: SubmissionStatus, to: SubmissionStatus, role: Role) -> bool {
    rule(from, to).is_some_and(|rule| rule.gate.admits_role(role))
}

/// Every edge leaving `from`
pub fn rules_from(from: SubmissionStatus) -> impl Iterator<Item = &'static TransitionRule> {
    TABLE.values().filter(move |rule| rule.from == from)
}

/// Statuses `actor` may move `submission` to directly, in pipeline order
pub fn targets_for(submission: &Submission, actor: &Actor) -> Vec<SubmissionStatus> {
    let mut targets: Vec<_> = rules_from(submission.status)
        .filter(|rule| authorize(submission, rule.to, actor, Channel::Direct).is_ok())
        .map(|rule| rule.to)
        .collect();
    targets.sort();
    targets
}

/// Check that `actor` may move `submission` to `to` through `channel`.
///
/// An unlisted edge is `InvalidTransition`; a listed edge the actor may not
/// take is `Forbidden`.
pub fn authorize(
    submission: &Submission,
    to: SubmissionStatus,
    actor: &Actor,
    channel: Channel,
) -> Result<&'static TransitionRule, WorkflowError> {
    let from = submission.status;
    let rule = rule(from, to).ok_or(WorkflowError::InvalidTransition { from, to })?;

    if rule.bulk_only && channel != Channel::Bulk {
        return Err(WorkflowError::Forbidden(format!(
            "{to} is only reachable through bulk operations"
        )));
    }

    if !rule.gate.admits(submission, actor) {
        let message = match rule.gate {
            Gate::Author => format!("only the author can move a submission from {from} to {to}"),
            Gate::Roles(_) => format!(
                "role {} may not move a submission from {from} to {to}",
                actor.role
            ),
        };
        return Err(WorkflowError::Forbidden(message));
    }

    if rule.independent && actor.id == submission.author_id {
        return Err(WorkflowError::Forbidden(
            "cannot review your own submission".to_string(),
        ));
    }

    Ok(rule)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::{sample_submission, user_with_role};

    #[test]
    fn unlisted_edges_are_never_allowed() {
        let listed = [
            (Draft, PendingReview),
            (PendingReview, Reviewed),
            (PendingReview, Rejected),
            (PendingReview, PendingReview),
            (Reviewed, PendingCoordinator),
            (Reviewed, PendingReview),
            (Reviewed, Rejected),
            (PendingCoordinator, ApprovedCoordinator),
            (PendingCoordinator, Rejected),
            (ApprovedCoordinator, PendingAdmin),
            (ApprovedCoordinator, Rejected),
            (PendingAdmin, Published),
            (PendingAdmin, Rejected),
            (Rejected, Draft),
            (Rejected, PendingReview),
        ];

        for from in SubmissionStatus::ALL {
            for to in SubmissionStatus::ALL {
                let expected = listed.contains(&(from, to)) || (to == Archived && from != Archived);
                assert_eq!(rule(from, to).is_some(), expected, "{from} -> {to}");
                if !expected {
                    for role in Role::ALL {
                        assert!(!is_allowed(from, to, role), "{from} -> {to} as {role}");
                    }
                }
            }
        }
    }

    #[test]
    fn review_stage_is_story_manager_or_admin() {
        for role in Role::ALL {
            let expected = matches!(role, Role::StoryManager | Role::Admin);
            assert_eq!(is_allowed(PendingReview, Reviewed, role), expected, "{role}");
            assert_eq!(is_allowed(PendingReview, Rejected, role), expected, "{role}");
        }
    }

    #[test]
    fn publishing_is_content_admin_or_admin() {
        assert!(is_allowed(PendingAdmin, Published, Role::ContentAdmin));
        assert!(is_allowed(PendingAdmin, Published, Role::Admin));
        assert!(!is_allowed(PendingAdmin, Published, Role::BookManager));
        assert!(!is_allowed(PendingAdmin, Published, Role::StoryManager));
    }

    #[test]
    fn system_may_only_hand_off() {
        let system: Vec<_> = SubmissionStatus::ALL
            .into_iter()
            .flat_map(|from| SubmissionStatus::ALL.into_iter().map(move |to| (from, to)))
            .filter(|(from, to)| is_allowed(*from, *to, Role::System))
            .collect();
        assert_eq!(
            system,
            vec![(Reviewed, PendingCoordinator), (ApprovedCoordinator, PendingAdmin)]
        );
    }

    #[test]
    fn listed_edge_with_wrong_role_is_forbidden() {
        let author = user_with_role(Role::Writer);
        let learner = user_with_role(Role::Learner);
        let submission = sample_submission(&author, PendingReview);

        let error = authorize(&submission, Rejected, &Actor::from(&learner), Channel::Direct)
            .unwrap_err();
        assert!(matches!(error, WorkflowError::Forbidden(_)), "{error:?}");
    }

    #[test]
    fn unlisted_edge_is_invalid_even_for_admin() {
        let author = user_with_role(Role::Writer);
        let admin = user_with_role(Role::Admin);
        let submission = sample_submission(&author, Draft);

        let error = authorize(&submission, Published, &Actor::from(&admin), Channel::Direct)
            .unwrap_err();
        assert!(
            matches!(error, WorkflowError::InvalidTransition { from: Draft, to: Published }),
            "{error:?}"
        );
    }

    #[test]
    fn staff_cannot_review_their_own_submission() {
        let manager = user_with_role(Role::StoryManager);
        let submission = sample_submission(&manager, PendingReview);

        let error = authorize(&submission, Reviewed, &Actor::from(&manager), Channel::Direct)
            .unwrap_err();
        assert_eq!(error.to_string(), "cannot review your own submission");
    }

    #[test]
    fn only_the_author_submits() {
        let author = user_with_role(Role::Learner);
        let someone_else = user_with_role(Role::Admin);
        let submission = sample_submission(&author, Draft);

        assert!(
            authorize(&submission, PendingReview, &Actor::from(&author), Channel::Direct).is_ok()
        );
        assert!(matches!(
            authorize(&submission, PendingReview, &Actor::from(&someone_else), Channel::Direct),
            Err(WorkflowError::Forbidden(_))
        ));
    }

    #[test]
    fn targets_follow_the_actor() {
        let author = user_with_role(Role::Writer);
        let manager = user_with_role(Role::StoryManager);
        let submission = sample_submission(&author, PendingReview);

        assert_eq!(
            targets_for(&submission, &Actor::from(&manager)),
            vec![PendingReview, Reviewed, Rejected]
        );
        assert!(targets_for(&submission, &Actor::from(&author)).is_empty());
    }

    #[test]
    fn archive_requires_the_bulk_channel() {
        let author = user_with_role(Role::Writer);
        let admin = user_with_role(Role::ContentAdmin);
        let submission = sample_submission(&author, Published);

        assert!(matches!(
            authorize(&submission, Archived, &Actor::from(&admin), Channel::Direct),
            Err(WorkflowError::Forbidden(_))
        ));
        assert!(authorize(&submission, Archived, &Actor::from(&admin), Channel::Bulk).is_ok());
    }
}
