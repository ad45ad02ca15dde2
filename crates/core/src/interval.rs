//! Wall-clock intervals on a single calendar day.
//!
//! A [`TimeRange`] is a half-open `[start, end)` span measured in minutes since
//! midnight. Two ranges that merely touch (`10:00-11:00` and `11:00-12:00`) do
//! not overlap. Ranges never cross midnight.

use std::fmt;

use chrono::{Datelike, NaiveDate, NaiveDateTime, NaiveTime, Timelike, Weekday};
use serde::{Deserialize, Serialize};

use crate::errors::{KickoffError, KickoffResult};

pub const MINUTES_PER_DAY: u16 = 24 * 60;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "WallClockRange", into = "WallClockRange")]
pub struct TimeRange {
    start: u16,
    end: u16,
}

/// JSON shape of a [`TimeRange`]: `{"startTime": "HH:MM:SS", "endTime": "HH:MM:SS"}`.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WallClockRange {
    pub start_time: NaiveTime,
    pub end_time: NaiveTime,
}

impl TimeRange {
    pub fn new(start_min: u16, end_min: u16) -> KickoffResult<Self> {
        if end_min <= start_min {
            return Err(KickoffError::Validation(
                "End time must be after start time".to_string(),
            ));
        }
        if end_min >= MINUTES_PER_DAY {
            return Err(KickoffError::Validation(
                "Time range must end on the same calendar day".to_string(),
            ));
        }
        Ok(Self {
            start: start_min,
            end: end_min,
        })
    }

    /// Whole-hour range, e.g. `TimeRange::hours(17, 21)` for 17:00-21:00.
    pub fn hours(start_hour: u8, end_hour: u8) -> KickoffResult<Self> {
        Self::new(u16::from(start_hour) * 60, u16::from(end_hour) * 60)
    }

    /// `hour:00` to `hour+1:00`. Callers keep `hour` below 23.
    pub(crate) const fn whole_hour(hour: u8) -> Self {
        let start = hour as u16 * 60;
        Self {
            start,
            end: start + 60,
        }
    }

    pub fn from_times(start: NaiveTime, end: NaiveTime) -> KickoffResult<Self> {
        Self::new(minute_of_day(start)?, minute_of_day(end)?)
    }

    pub fn start(&self) -> u16 {
        self.start
    }

    pub fn end(&self) -> u16 {
        self.end
    }

    pub fn start_time(&self) -> NaiveTime {
        clock(self.start)
    }

    pub fn end_time(&self) -> NaiveTime {
        clock(self.end)
    }

    pub fn overlaps(&self, other: &TimeRange) -> bool {
        self.start < other.end && self.end > other.start
    }

    pub fn contains(&self, inner: &TimeRange) -> bool {
        self.start <= inner.start && inner.end <= self.end
    }

    pub fn duration_minutes(&self) -> u16 {
        self.end - self.start
    }

    pub fn duration_hours(&self) -> f64 {
        f64::from(self.duration_minutes()) / 60.0
    }
}

impl TryFrom<WallClockRange> for TimeRange {
    type Error = KickoffError;

    fn try_from(value: WallClockRange) -> Result<Self, Self::Error> {
        TimeRange::from_times(value.start_time, value.end_time)
    }
}

impl From<TimeRange> for WallClockRange {
    fn from(value: TimeRange) -> Self {
        WallClockRange {
            start_time: value.start_time(),
            end_time: value.end_time(),
        }
    }
}

impl fmt::Display for TimeRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}-{}",
            self.start_time().format("%H:%M"),
            self.end_time().format("%H:%M")
        )
    }
}

/// A [`TimeRange`] pinned to a calendar date.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Interval {
    pub date: NaiveDate,
    pub range: TimeRange,
}

impl Interval {
    pub fn new(date: NaiveDate, start: NaiveTime, end: NaiveTime) -> KickoffResult<Self> {
        Ok(Self {
            date,
            range: TimeRange::from_times(start, end)?,
        })
    }

    pub fn overlaps(&self, other: &Interval) -> bool {
        self.date == other.date && self.range.overlaps(&other.range)
    }

    pub fn weekday(&self) -> Weekday {
        self.date.weekday()
    }

    pub fn starts_at(&self) -> NaiveDateTime {
        self.date.and_time(self.range.start_time())
    }
}

impl fmt::Display for Interval {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.date, self.range)
    }
}

fn minute_of_day(time: NaiveTime) -> KickoffResult<u16> {
    if time.second() != 0 || time.nanosecond() != 0 {
        return Err(KickoffError::Validation(format!(
            "Times must fall on whole minutes, got {}",
            time
        )));
    }
    // hour < 24 and minute < 60, so this always fits
    Ok((time.hour() * 60 + time.minute()) as u16)
}

fn clock(minutes: u16) -> NaiveTime {
    NaiveTime::from_num_seconds_from_midnight_opt(u32::from(minutes) * 60, 0)
        .unwrap_or(NaiveTime::MIN)
}
