use chrono::{Local, NaiveDateTime};
use kickoff_core::cancellation::evaluate_cancellation;
use kickoff_core::errors::{KickoffError, KickoffResult};
use kickoff_core::models::{
    booking::BookingStatus,
    cancellation::{CancellationOutcome, CancellationPolicy, CancellationPolicyInput},
    identity::Caller,
};

use super::bookings::get_booking_for;
use super::fields::{get_field, get_owned_field};
use crate::ApiState;

/// Wall-clock "now" in the server's local time. Slot times carry no zone and
/// are read as local to the field.
pub fn local_now() -> NaiveDateTime {
    Local::now().naive_local()
}

pub async fn get_policy(state: &ApiState, field_id: i64) -> KickoffResult<CancellationPolicy> {
    get_field(state, field_id).await?;
    state.store.get_or_create_cancellation_policy(field_id).await
}

pub async fn update_policy(
    state: &ApiState,
    caller: &Caller,
    field_id: i64,
    input: CancellationPolicyInput,
) -> KickoffResult<CancellationPolicy> {
    get_owned_field(state, caller, field_id).await?;
    input.validate()?;

    let policy = state.store.update_cancellation_policy(field_id, input).await?;
    tracing::info!(field_id, policy_id = policy.policy_id, "Cancellation policy updated");
    Ok(policy)
}

/// What cancelling a confirmed booking at `at` (default now) would cost.
pub async fn quote_cancellation(
    state: &ApiState,
    caller: &Caller,
    booking_id: i64,
    at: Option<NaiveDateTime>,
) -> KickoffResult<CancellationOutcome> {
    let booking = get_booking_for(state, caller, booking_id).await?;
    if booking.requester_id != caller.user_id {
        return Err(KickoffError::Forbidden(format!(
            "Only the requester may cancel booking {}",
            booking_id
        )));
    }
    if booking.status != BookingStatus::Confirmed {
        return Err(KickoffError::InvalidState(format!(
            "Booking {} is {}, only Confirmed bookings carry cancellation terms",
            booking_id, booking.status
        )));
    }

    let policy = state
        .store
        .get_or_create_cancellation_policy(booking.field_id)
        .await?;
    Ok(evaluate_cancellation(
        &policy,
        booking.interval().starts_at(),
        at.unwrap_or_else(local_now),
    ))
}
