use crate::domain::workflow::notification::{Notification, NotificationDispatcher};

/// Stand-in for the mail relay: writes each notification to the log
#[derive(Clone, Debug, Default)]
pub struct LoggingNotifier;

impl NotificationDispatcher for LoggingNotifier {
    async fn dispatch(&self, notification: Notification) -> Result<(), anyhow::Error> {
        tracing::info!(
            recipient = %notification.recipient,
            submission_id = %notification.submission_id,
            from = %notification.from_status,
            to = %notification.to_status,
            reason = %notification.reason,
            "{}",
            notification.subject
        );
        Ok(())
    }
}
