use kickoff_core::availability::{self, CalendarQuery, DateRange};
use kickoff_core::errors::{KickoffError, KickoffResult};
use kickoff_core::models::{
    calendar::{BlockSlotRequest, CalendarEntry, CalendarSlot},
    identity::Caller,
};

use super::fields::{get_field, get_owned_field};
use crate::ApiState;

/// Stored rows of a field merged with synthetic available hours.
///
/// Synthesis only happens when both bounds are given; a single bound just
/// filters the stored rows.
pub async fn get_calendar(
    state: &ApiState,
    field_id: i64,
    query: CalendarQuery,
) -> KickoffResult<Vec<CalendarEntry>> {
    get_field(state, field_id).await?;

    let range = match (query.start, query.end) {
        (Some(start), Some(end)) => Some(DateRange::new(start, end, state.calendar_max_days)?),
        _ => None,
    };

    let persisted = state.store.list_slots(field_id, query.start, query.end).await?;
    availability::project(field_id, persisted, range)
}

pub async fn block_slot(
    state: &ApiState,
    caller: &Caller,
    field_id: i64,
    request: BlockSlotRequest,
) -> KickoffResult<CalendarSlot> {
    get_owned_field(state, caller, field_id).await?;
    let slot = request.into_slot(field_id)?;

    let stored = state.store.insert_slot_guarded(slot).await?;
    tracing::info!(
        field_id,
        calendar_id = stored.calendar_id,
        status = %stored.status,
        interval = %stored.interval(),
        "Calendar slot blocked"
    );
    Ok(stored)
}

pub async fn unblock_slot(
    state: &ApiState,
    caller: &Caller,
    calendar_id: i64,
) -> KickoffResult<CalendarSlot> {
    let slot = state
        .store
        .get_slot(calendar_id)
        .await?
        .ok_or_else(|| KickoffError::not_found("Calendar slot", calendar_id))?;
    get_owned_field(state, caller, slot.field_id).await?;

    state.store.release_block(calendar_id).await
}
