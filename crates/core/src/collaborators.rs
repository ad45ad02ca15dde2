//! Narrow interfaces to the services this core does not own.

use async_trait::async_trait;

use crate::errors::KickoffResult;

/// Team membership facts, owned by the team service.
#[async_trait]
pub trait TeamDirectory: Send + Sync {
    async fn is_member(&self, team_id: i64, user_id: i64) -> KickoffResult<bool>;
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notification {
    BookingRequested { booking_id: i64, field_id: i64 },
    BookingApproved { booking_id: i64 },
    BookingRejected { booking_id: i64 },
    BookingCancelled { booking_id: i64, field_id: i64 },
}

impl Notification {
    pub fn kind(&self) -> &'static str {
        match self {
            Notification::BookingRequested { .. } => "BookingRequested",
            Notification::BookingApproved { .. } => "BookingApproved",
            Notification::BookingRejected { .. } => "BookingRejected",
            Notification::BookingCancelled { .. } => "BookingCancelled",
        }
    }

    pub fn booking_id(&self) -> i64 {
        match self {
            Notification::BookingRequested { booking_id, .. }
            | Notification::BookingApproved { booking_id }
            | Notification::BookingRejected { booking_id }
            | Notification::BookingCancelled { booking_id, .. } => *booking_id,
        }
    }
}

/// Outbound notification channel. Delivery is best-effort: callers log a
/// failure and carry on.
#[async_trait]
pub trait Notifier: Send + Sync {
    async fn notify(&self, recipient_id: i64, notification: Notification) -> eyre::Result<()>;
}
