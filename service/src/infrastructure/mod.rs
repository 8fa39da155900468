use std::sync::Arc;

use crate::domain::{
    AppState, repository::SubmissionRepository, workflow::WorkflowEngine,
    workflow::notification::NotificationDispatcher,
};

pub mod http;
pub mod notification;
pub mod persistence;
pub mod settings;

pub struct AppStateImpl<R, N> {
    workflow: Arc<WorkflowEngine<R, N>>,
}

impl<R, N> AppStateImpl<R, N> {
    pub fn new(workflow: WorkflowEngine<R, N>) -> Self {
        Self {
            workflow: Arc::new(workflow),
        }
    }
}

impl<R, N> Clone for AppStateImpl<R, N> {
    fn clone(&self) -> Self {
        Self {
            workflow: Arc::clone(&self.workflow),
        }
    }
}

impl<R, N> AppState for AppStateImpl<R, N>
where
    R: SubmissionRepository,
    N: NotificationDispatcher,
{
    type R = R;
    type N = N;

    fn workflow(&self) -> &WorkflowEngine<Self::R, Self::N> {
        &self.workflow
    }
}
