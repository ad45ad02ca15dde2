//! The overlap check every write of a non-default calendar row goes through.
//!
//! Stores call [`ensure_free`] inside the same transaction (and under the
//! same per-field lock) as the insert it protects.

use crate::errors::{KickoffError, KickoffResult};
use crate::interval::Interval;
use crate::models::calendar::CalendarSlot;

pub fn find_conflict<'a>(existing: &'a [CalendarSlot], target: &Interval) -> Option<&'a CalendarSlot> {
    existing
        .iter()
        .find(|slot| slot.interval().overlaps(target))
}

pub fn ensure_free(existing: &[CalendarSlot], target: &Interval) -> KickoffResult<()> {
    match find_conflict(existing, target) {
        Some(slot) => Err(KickoffError::Conflict(format!(
            "{} on field {} overlaps {} slot {} ({})",
            target,
            slot.field_id,
            slot.status,
            slot.calendar_id,
            slot.range
        ))),
        None => Ok(()),
    }
}
