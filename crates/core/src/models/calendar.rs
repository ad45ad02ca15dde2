use chrono::{Datelike, NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize, Serializer};

use super::text_enum;
use crate::errors::{KickoffError, KickoffResult};
use crate::interval::{Interval, TimeRange};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CalendarStatus {
    Available,
    Booked,
    Maintenance,
    Blocked,
}

text_enum!(CalendarStatus {
    Available,
    Booked,
    Maintenance,
    Blocked,
});

/// A calendar row as stored. Rows only exist where the field deviates from
/// its default availability.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CalendarSlot {
    pub calendar_id: i64,
    pub field_id: i64,
    pub date: NaiveDate,
    #[serde(flatten)]
    pub range: TimeRange,
    pub status: CalendarStatus,
    pub booking_id: Option<i64>,
}

impl CalendarSlot {
    pub fn interval(&self) -> Interval {
        Interval {
            date: self.date,
            range: self.range,
        }
    }
}

/// A calendar row about to be written.
#[derive(Debug, Clone, PartialEq)]
pub struct NewCalendarSlot {
    pub field_id: i64,
    pub date: NaiveDate,
    pub range: TimeRange,
    pub status: CalendarStatus,
    pub booking_id: Option<i64>,
}

impl NewCalendarSlot {
    pub fn interval(&self) -> Interval {
        Interval {
            date: self.date,
            range: self.range,
        }
    }
}

/// Body of `POST /fields/{id}/calendar/block`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BlockSlotRequest {
    pub date: NaiveDate,
    pub start_time: NaiveTime,
    pub end_time: NaiveTime,
    /// `Blocked` when absent. `Maintenance` is the only other accepted value.
    #[serde(default)]
    pub status: Option<CalendarStatus>,
}

impl BlockSlotRequest {
    pub fn into_slot(self, field_id: i64) -> KickoffResult<NewCalendarSlot> {
        let status = match self.status.unwrap_or(CalendarStatus::Blocked) {
            status @ (CalendarStatus::Blocked | CalendarStatus::Maintenance) => status,
            other => {
                return Err(KickoffError::Validation(format!(
                    "Cannot block a slot as {}",
                    other
                )))
            }
        };

        Ok(NewCalendarSlot {
            field_id,
            date: self.date,
            range: TimeRange::from_times(self.start_time, self.end_time)?,
            status,
            booking_id: None,
        })
    }
}

/// One entry of a projected calendar: either a stored override or an hour of
/// default availability computed on read.
///
/// On the wire both serialize as a [`CalendarSlot`]; synthetic entries carry a
/// negative `calendarId`.
#[derive(Debug, Clone, PartialEq)]
pub enum CalendarEntry {
    Persisted(CalendarSlot),
    Synthetic {
        field_id: i64,
        date: NaiveDate,
        hour: u8,
    },
}

impl CalendarEntry {
    pub fn date(&self) -> NaiveDate {
        match self {
            CalendarEntry::Persisted(slot) => slot.date,
            CalendarEntry::Synthetic { date, .. } => *date,
        }
    }

    pub fn range(&self) -> TimeRange {
        match self {
            CalendarEntry::Persisted(slot) => slot.range,
            CalendarEntry::Synthetic { hour, .. } => TimeRange::whole_hour(*hour),
        }
    }

    pub fn status(&self) -> CalendarStatus {
        match self {
            CalendarEntry::Persisted(slot) => slot.status,
            CalendarEntry::Synthetic { .. } => CalendarStatus::Available,
        }
    }

    pub fn is_synthetic(&self) -> bool {
        matches!(self, CalendarEntry::Synthetic { .. })
    }

    pub fn calendar_id(&self) -> KickoffResult<i64> {
        match self {
            CalendarEntry::Persisted(slot) => Ok(slot.calendar_id),
            CalendarEntry::Synthetic {
                field_id,
                date,
                hour,
            } => synthetic_id(*field_id, *date, *hour),
        }
    }

    /// Wire representation of this entry.
    pub fn to_slot(&self) -> KickoffResult<CalendarSlot> {
        match self {
            CalendarEntry::Persisted(slot) => Ok(slot.clone()),
            CalendarEntry::Synthetic {
                field_id,
                date,
                hour,
            } => Ok(CalendarSlot {
                calendar_id: self.calendar_id()?,
                field_id: *field_id,
                date: *date,
                range: TimeRange::whole_hour(*hour),
                status: CalendarStatus::Available,
                booking_id: None,
            }),
        }
    }
}

impl Serialize for CalendarEntry {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.to_slot()
            .map_err(serde::ser::Error::custom)?
            .serialize(serializer)
    }
}

/// Largest field id that still has synthetic calendar ids.
pub const MAX_SYNTHETIC_FIELD_ID: i64 = 300_000_000_000;

/// Day offsets (days since 0001-01-01) must stay below this so ids of
/// neighbouring fields never meet. It covers dates up to the year 2738.
pub const SYNTHETIC_DAY_SPAN: i64 = 1_000_000;

/// Deterministic negative id for the synthetic slot starting at `hour` on
/// `date`. The day offset is counted from 0001-01-01, so the same slot keeps
/// its id whatever range it was requested in.
///
/// Fields above [`MAX_SYNTHETIC_FIELD_ID`] and dates past the day span have
/// no synthetic id and are rejected as a validation error.
pub fn synthetic_id(field_id: i64, date: NaiveDate, hour: u8) -> KickoffResult<i64> {
    let day_offset = i64::from(Datelike::num_days_from_ce(&date));
    if !(1..=MAX_SYNTHETIC_FIELD_ID).contains(&field_id)
        || !(0..SYNTHETIC_DAY_SPAN).contains(&day_offset)
    {
        return Err(out_of_range(field_id, date));
    }

    field_id
        .checked_mul(SYNTHETIC_DAY_SPAN)
        .and_then(|id| id.checked_add(day_offset))
        .and_then(|id| id.checked_mul(24))
        .and_then(|id| id.checked_add(i64::from(hour) + 1))
        .map(|id| -id)
        .ok_or_else(|| out_of_range(field_id, date))
}

fn out_of_range(field_id: i64, date: NaiveDate) -> KickoffError {
    KickoffError::Validation(format!(
        "No synthetic calendar for field {} on {}",
        field_id, date
    ))
}
