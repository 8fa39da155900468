use crate::domain::repository::SubmissionRepository;
use crate::domain::workflow::WorkflowEngine;
use crate::domain::workflow::notification::NotificationDispatcher;

pub mod repository;
pub mod submission;
pub mod workflow;

//// The global application state shared between all request handlers.
pub trait AppState: Clone + Send + Sync + 'static {
    type R: SubmissionRepository;
    type N: NotificationDispatcher;

    fn workflow(&self) -> &WorkflowEngine<Self::R, Self::N>;

    fn repository(&self) -> &Self::R {
        self.workflow().repository()
    }
}
