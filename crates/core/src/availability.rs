//! Calendar projection.
//!
//! Storage only holds the hours where a field deviates from its default
//! (bookings, blocks, maintenance). Everything else inside opening hours is
//! available. [`project`] merges the stored rows with one synthetic
//! `Available` entry per free whole hour; it never touches storage, so the
//! same inputs always give the same output.

use chrono::NaiveDate;
use serde::Deserialize;

use crate::errors::{KickoffError, KickoffResult};
use crate::interval::TimeRange;
use crate::models::calendar::{synthetic_id, CalendarEntry, CalendarSlot};

/// First synthetic hour of a day (06:00).
pub const OPENING_HOUR: u8 = 6;
/// Synthetic hours stop here (22:00).
pub const CLOSING_HOUR: u8 = 22;

/// `GET /fields/{id}/calendar` query. Both bounds are inclusive dates.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CalendarQuery {
    #[serde(alias = "startDate", alias = "start_date")]
    pub start: Option<NaiveDate>,
    #[serde(alias = "endDate", alias = "end_date")]
    pub end: Option<NaiveDate>,
}

/// An inclusive range of calendar dates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateRange {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl DateRange {
    pub fn new(start: NaiveDate, end: NaiveDate, max_days: i64) -> KickoffResult<Self> {
        if end < start {
            return Err(KickoffError::Validation(format!(
                "Range end {} is before range start {}",
                end, start
            )));
        }
        let range = Self { start, end };
        if range.len_days() > max_days {
            return Err(KickoffError::Validation(format!(
                "Calendar range may span at most {} days",
                max_days
            )));
        }
        Ok(range)
    }

    pub fn len_days(&self) -> i64 {
        (self.end - self.start).num_days() + 1
    }

    pub fn days(self) -> impl Iterator<Item = NaiveDate> {
        let end = self.end;
        self.start.iter_days().take_while(move |day| *day <= end)
    }
}

/// Projects a field's calendar.
///
/// Without a range the stored rows are returned as they are. With a range,
/// every date in it is filled with synthetic hours that do not overlap a
/// stored row of the same date. Output is ordered by date, then start time.
///
/// Fails with `Validation` when the field or range has no synthetic ids.
pub fn project(
    field_id: i64,
    persisted: Vec<CalendarSlot>,
    range: Option<DateRange>,
) -> KickoffResult<Vec<CalendarEntry>> {
    let mut entries = Vec::with_capacity(persisted.len());

    if let Some(range) = range {
        // Ids grow with field, date and hour, so both corners cover the range
        synthetic_id(field_id, range.start, OPENING_HOUR)?;
        synthetic_id(field_id, range.end, CLOSING_HOUR - 1)?;

        for day in range.days() {
            let taken: Vec<&CalendarSlot> =
                persisted.iter().filter(|slot| slot.date == day).collect();
            entries.extend(free_hours(field_id, day, &taken));
        }
    }

    entries.extend(persisted.into_iter().map(CalendarEntry::Persisted));
    entries.sort_by_key(|entry| (entry.date(), entry.range().start()));
    Ok(entries)
}

/// Synthetic entries for the opening hours of `day` left uncovered by `taken`.
pub fn free_hours(field_id: i64, day: NaiveDate, taken: &[&CalendarSlot]) -> Vec<CalendarEntry> {
    (OPENING_HOUR..CLOSING_HOUR)
        .filter(|hour| {
            let candidate = TimeRange::whole_hour(*hour);
            !taken.iter().any(|slot| slot.range.overlaps(&candidate))
        })
        .map(|hour| CalendarEntry::Synthetic {
            field_id,
            date: day,
            hour,
        })
        .collect()
}
