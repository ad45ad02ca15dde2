use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use serde::{Deserialize, Serialize};

use super::cancellation::CancellationOutcome;
use super::text_enum;
use crate::errors::KickoffResult;
use crate::interval::{Interval, TimeRange};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BookingStatus {
    Pending,
    Confirmed,
    Rejected,
    Cancelled,
}

text_enum!(BookingStatus {
    Pending,
    Confirmed,
    Rejected,
    Cancelled,
});

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BookingRequest {
    pub booking_id: i64,
    pub field_id: i64,
    pub team_id: i64,
    pub requester_id: i64,
    pub date: NaiveDate,
    #[serde(flatten)]
    pub range: TimeRange,
    pub status: BookingStatus,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
    pub processed_at: Option<DateTime<Utc>>,
}

impl BookingRequest {
    pub fn interval(&self) -> Interval {
        Interval {
            date: self.date,
            range: self.range,
        }
    }
}

/// Body of `POST /bookings`. Times stay raw here so a malformed interval is
/// reported as a validation error rather than a body rejection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateBookingRequest {
    pub field_id: i64,
    pub team_id: i64,
    pub date: NaiveDate,
    pub start_time: NaiveTime,
    pub end_time: NaiveTime,
    pub notes: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct NewBooking {
    pub field_id: i64,
    pub team_id: i64,
    pub requester_id: i64,
    pub interval: Interval,
    pub notes: Option<String>,
}

impl NewBooking {
    pub fn from_request(request: CreateBookingRequest, requester_id: i64) -> KickoffResult<Self> {
        let interval = Interval::new(request.date, request.start_time, request.end_time)?;
        let notes = request
            .notes
            .map(|notes| notes.trim().to_string())
            .filter(|notes| !notes.is_empty());

        Ok(Self {
            field_id: request.field_id,
            team_id: request.team_id,
            requester_id,
            interval,
            notes,
        })
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct BookingListQuery {
    pub status: Option<BookingStatus>,
}

/// Result of a committed status change, with the status it left.
#[derive(Debug, Clone, PartialEq)]
pub struct BookingTransition {
    pub booking: BookingRequest,
    pub previous: BookingStatus,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CancelBookingResponse {
    pub booking: BookingRequest,
    /// Present when a confirmed booking was cancelled.
    pub cancellation: Option<CancellationOutcome>,
}
