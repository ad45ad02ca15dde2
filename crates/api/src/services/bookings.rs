use chrono::Utc;
use kickoff_core::booking::{authorize, BookingAction};
use kickoff_core::cancellation::evaluate_cancellation;
use kickoff_core::collaborators::Notification;
use kickoff_core::errors::{KickoffError, KickoffResult};
use kickoff_core::models::{
    booking::{BookingRequest, BookingStatus, CancelBookingResponse, CreateBookingRequest, NewBooking},
    identity::Caller,
};

use super::cancellation::local_now;
use super::fields::{get_field, get_owned_field};
use super::notifications::dispatch;
use crate::ApiState;

/// Files a pending booking request. Overlap with other bookings is not
/// checked here; it is enforced when the owner approves.
pub async fn create_booking(
    state: &ApiState,
    caller: &Caller,
    request: CreateBookingRequest,
) -> KickoffResult<BookingRequest> {
    let field = get_field(state, request.field_id).await?;
    if !field.is_bookable() {
        return Err(KickoffError::InvalidState(format!(
            "Field {} is {} and cannot be booked",
            field.field_id, field.status
        )));
    }

    let booking = NewBooking::from_request(request, caller.user_id)?;

    if !state.teams.is_member(booking.team_id, caller.user_id).await? {
        return Err(KickoffError::Forbidden(format!(
            "User {} is not a member of team {}",
            caller.user_id, booking.team_id
        )));
    }

    let booking = state.store.create_booking(booking).await?;
    tracing::info!(
        booking_id = booking.booking_id,
        field_id = booking.field_id,
        team_id = booking.team_id,
        interval = %booking.interval(),
        "Booking requested"
    );

    dispatch(
        state,
        field.owner_id,
        Notification::BookingRequested {
            booking_id: booking.booking_id,
            field_id: booking.field_id,
        },
    )
    .await;

    Ok(booking)
}

/// Loads a booking visible to `caller`: its requester or the field owner.
pub async fn get_booking_for(
    state: &ApiState,
    caller: &Caller,
    booking_id: i64,
) -> KickoffResult<BookingRequest> {
    let booking = state
        .store
        .get_booking(booking_id)
        .await?
        .ok_or_else(|| KickoffError::not_found("Booking", booking_id))?;

    if booking.requester_id != caller.user_id {
        let field = get_field(state, booking.field_id).await?;
        if !field.is_owned_by(caller.user_id) {
            return Err(KickoffError::Forbidden(format!(
                "User {} may not view booking {}",
                caller.user_id, booking_id
            )));
        }
    }

    Ok(booking)
}

pub async fn list_for_field(
    state: &ApiState,
    caller: &Caller,
    field_id: i64,
    status: Option<BookingStatus>,
) -> KickoffResult<Vec<BookingRequest>> {
    get_owned_field(state, caller, field_id).await?;
    state.store.list_bookings_by_field(field_id, status).await
}

pub async fn list_for_team(
    state: &ApiState,
    caller: &Caller,
    team_id: i64,
) -> KickoffResult<Vec<BookingRequest>> {
    if !state.teams.is_member(team_id, caller.user_id).await? {
        return Err(KickoffError::Forbidden(format!(
            "User {} is not a member of team {}",
            caller.user_id, team_id
        )));
    }
    state.store.list_bookings_by_team(team_id).await
}

pub async fn approve(
    state: &ApiState,
    caller: &Caller,
    booking_id: i64,
) -> KickoffResult<BookingRequest> {
    let booking = apply(state, caller, booking_id, BookingAction::Approve).await?;

    dispatch(
        state,
        booking.requester_id,
        Notification::BookingApproved { booking_id },
    )
    .await;

    Ok(booking)
}

pub async fn reject(
    state: &ApiState,
    caller: &Caller,
    booking_id: i64,
) -> KickoffResult<BookingRequest> {
    let booking = apply(state, caller, booking_id, BookingAction::Reject).await?;

    dispatch(
        state,
        booking.requester_id,
        Notification::BookingRejected { booking_id },
    )
    .await;

    Ok(booking)
}

/// Cancels a pending or confirmed booking. Cancelling a confirmed booking
/// frees its slot and reports the refund terms in force at this moment.
pub async fn cancel(
    state: &ApiState,
    caller: &Caller,
    booking_id: i64,
) -> KickoffResult<CancelBookingResponse> {
    let current = state
        .store
        .get_booking(booking_id)
        .await?
        .ok_or_else(|| KickoffError::not_found("Booking", booking_id))?;
    let field = get_field(state, current.field_id).await?;
    authorize(BookingAction::Cancel, caller, &current, &field)?;

    // `current.status` may be stale by the time the transition commits; the
    // committed `previous` status decides whether terms apply.
    let policy = state
        .store
        .get_or_create_cancellation_policy(current.field_id)
        .await?;

    let cancelled_at = local_now();
    let transition = state
        .store
        .transition_booking(booking_id, BookingAction::Cancel, Utc::now())
        .await?;

    let cancellation = (transition.previous == BookingStatus::Confirmed).then(|| {
        evaluate_cancellation(
            &policy,
            transition.booking.interval().starts_at(),
            cancelled_at,
        )
    });

    tracing::info!(
        booking_id,
        previous = %transition.previous,
        kind = ?cancellation.as_ref().map(|outcome| outcome.kind),
        "Booking cancelled"
    );

    dispatch(
        state,
        field.owner_id,
        Notification::BookingCancelled {
            booking_id,
            field_id: field.field_id,
        },
    )
    .await;

    Ok(CancelBookingResponse {
        booking: transition.booking,
        cancellation,
    })
}

async fn apply(
    state: &ApiState,
    caller: &Caller,
    booking_id: i64,
    action: BookingAction,
) -> KickoffResult<BookingRequest> {
    let booking = state
        .store
        .get_booking(booking_id)
        .await?
        .ok_or_else(|| KickoffError::not_found("Booking", booking_id))?;
    let field = get_field(state, booking.field_id).await?;
    authorize(action, caller, &booking, &field)?;

    let transition = state
        .store
        .transition_booking(booking_id, action, Utc::now())
        .await?;
    Ok(transition.booking)
}
