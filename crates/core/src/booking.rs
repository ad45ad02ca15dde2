//! Booking lifecycle.
//!
//! ```text
//! Pending ──approve──> Confirmed ──cancel──> Cancelled
//!    │ └──reject───> Rejected
//!    └─────cancel──────────────────────────> Cancelled
//! ```
//!
//! Creation never checks for overlapping bookings; several teams may ask for
//! the same hour and the owner picks one. Overlap is enforced when a booking
//! is confirmed, by the conflict guard.

use std::fmt;

use crate::errors::{KickoffError, KickoffResult};
use crate::models::booking::{BookingRequest, BookingStatus};
use crate::models::field::FieldProfile;
use crate::models::identity::Caller;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BookingAction {
    Approve,
    Reject,
    Cancel,
}

impl fmt::Display for BookingAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            BookingAction::Approve => "approve",
            BookingAction::Reject => "reject",
            BookingAction::Cancel => "cancel",
        })
    }
}

/// What a transition does to the field calendar.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CalendarEffect {
    None,
    /// Write a `Booked` row for the booking, guarded against overlap.
    Materialize,
    /// Delete the booking's `Booked` row.
    Release,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Transition {
    pub from: BookingStatus,
    pub to: BookingStatus,
    pub effect: CalendarEffect,
}

impl BookingStatus {
    pub fn apply(self, action: BookingAction) -> KickoffResult<Transition> {
        use BookingAction::*;
        use BookingStatus::*;

        let (to, effect) = match (self, action) {
            (Pending, Approve) => (Confirmed, CalendarEffect::Materialize),
            (Pending, Reject) => (Rejected, CalendarEffect::None),
            (Pending, Cancel) => (Cancelled, CalendarEffect::None),
            (Confirmed, Cancel) => (Cancelled, CalendarEffect::Release),
            (from, action) => {
                return Err(KickoffError::InvalidState(format!(
                    "Cannot {} a booking that is {}",
                    action, from
                )))
            }
        };

        Ok(Transition {
            from: self,
            to,
            effect,
        })
    }

    pub fn is_final(self) -> bool {
        matches!(self, BookingStatus::Rejected | BookingStatus::Cancelled)
    }
}

/// Checks that `caller` may perform `action` on `booking` of `field`:
/// approve and reject belong to the field owner, cancel to the requester.
pub fn authorize(
    action: BookingAction,
    caller: &Caller,
    booking: &BookingRequest,
    field: &FieldProfile,
) -> KickoffResult<()> {
    let allowed = match action {
        BookingAction::Approve | BookingAction::Reject => field.is_owned_by(caller.user_id),
        BookingAction::Cancel => booking.requester_id == caller.user_id,
    };

    if allowed {
        Ok(())
    } else {
        Err(KickoffError::Forbidden(format!(
            "User {} may not {} booking {}",
            caller.user_id, action, booking.booking_id
        )))
    }
}
