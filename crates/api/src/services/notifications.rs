use async_trait::async_trait;
use kickoff_core::collaborators::{Notification, Notifier};

use crate::ApiState;

/// Notifier that records each notification as a structured log event.
/// Delivery proper belongs to the notification service.
#[derive(Debug, Clone, Default)]
pub struct TracingNotifier;

#[async_trait]
impl Notifier for TracingNotifier {
    async fn notify(&self, recipient_id: i64, notification: Notification) -> eyre::Result<()> {
        tracing::info!(
            recipient_id,
            kind = notification.kind(),
            booking_id = notification.booking_id(),
            "Notification dispatched"
        );
        Ok(())
    }
}

/// Sends a notification after a committed change. Failures are logged and
/// swallowed; the change they describe has already happened.
pub async fn dispatch(state: &ApiState, recipient_id: i64, notification: Notification) {
    let kind = notification.kind();
    let booking_id = notification.booking_id();

    if let Err(e) = state.notifier.notify(recipient_id, notification).await {
        tracing::warn!(
            recipient_id,
            kind,
            booking_id,
            error = %e,
            "Failed to dispatch notification"
        );
    }
}
