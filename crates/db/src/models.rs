//! Row types as they come out of PostgreSQL, and their conversion into domain
//! types. Enum columns are stored as text and parsed on the way out.

use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use eyre::{eyre, Result, WrapErr};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use kickoff_core::interval::TimeRange;
use kickoff_core::models::{
    booking::BookingRequest,
    calendar::CalendarSlot,
    cancellation::CancellationPolicy,
    field::FieldProfile,
    pricing::{DayOfWeek, PricingRule},
};

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct DbFieldProfile {
    pub field_id: i64,
    pub owner_id: i64,
    pub field_name: String,
    pub description: Option<String>,
    pub location: String,
    pub default_price_per_hour: f64,
    pub capacity: Option<i32>,
    pub status: String,
    pub rejection_reason: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct DbCalendarSlot {
    pub calendar_id: i64,
    pub field_id: i64,
    pub date: NaiveDate,
    pub start_time: NaiveTime,
    pub end_time: NaiveTime,
    pub status: String,
    pub booking_id: Option<i64>,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct DbPricingRule {
    pub pricing_rule_id: i64,
    pub field_id: i64,
    pub name: String,
    pub day_of_week: Vec<String>,
    pub start_time: NaiveTime,
    pub end_time: NaiveTime,
    pub price_per_hour: f64,
    pub priority: i32,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct DbCancellationPolicy {
    pub policy_id: i64,
    pub field_id: i64,
    pub free_cancellation_hours: i32,
    pub late_cancellation_penalty_percent: f64,
    pub no_show_penalty_percent: f64,
    pub refund_processing_days: i32,
    pub policy_description: Option<String>,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct DbBookingRequest {
    pub booking_id: i64,
    pub field_id: i64,
    pub team_id: i64,
    pub requester_id: i64,
    pub date: NaiveDate,
    pub start_time: NaiveTime,
    pub end_time: NaiveTime,
    pub status: String,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
    pub processed_at: Option<DateTime<Utc>>,
}

fn stored_range(start: NaiveTime, end: NaiveTime) -> Result<TimeRange> {
    TimeRange::from_times(start, end)
        .map_err(|e| eyre!("Stored interval {}-{} is invalid: {}", start, end, e))
}

impl TryFrom<DbFieldProfile> for FieldProfile {
    type Error = eyre::Report;

    fn try_from(row: DbFieldProfile) -> Result<Self> {
        Ok(FieldProfile {
            status: row
                .status
                .parse()
                .wrap_err_with(|| format!("field_profile {}", row.field_id))?,
            field_id: row.field_id,
            owner_id: row.owner_id,
            field_name: row.field_name,
            description: row.description,
            location: row.location,
            default_price_per_hour: row.default_price_per_hour,
            capacity: row.capacity,
            rejection_reason: row.rejection_reason,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

impl TryFrom<DbCalendarSlot> for CalendarSlot {
    type Error = eyre::Report;

    fn try_from(row: DbCalendarSlot) -> Result<Self> {
        Ok(CalendarSlot {
            range: stored_range(row.start_time, row.end_time)?,
            status: row
                .status
                .parse()
                .wrap_err_with(|| format!("field_calendar {}", row.calendar_id))?,
            calendar_id: row.calendar_id,
            field_id: row.field_id,
            date: row.date,
            booking_id: row.booking_id,
        })
    }
}

impl TryFrom<DbPricingRule> for PricingRule {
    type Error = eyre::Report;

    fn try_from(row: DbPricingRule) -> Result<Self> {
        let day_of_week = row
            .day_of_week
            .iter()
            .map(|day| day.parse::<DayOfWeek>())
            .collect::<Result<Vec<_>, _>>()
            .wrap_err_with(|| format!("field_pricing_rule {}", row.pricing_rule_id))?;

        Ok(PricingRule {
            range: stored_range(row.start_time, row.end_time)?,
            day_of_week,
            pricing_rule_id: row.pricing_rule_id,
            field_id: row.field_id,
            name: row.name,
            price_per_hour: row.price_per_hour,
            priority: row.priority,
            is_active: row.is_active,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

impl From<DbCancellationPolicy> for CancellationPolicy {
    fn from(row: DbCancellationPolicy) -> Self {
        CancellationPolicy {
            policy_id: row.policy_id,
            field_id: row.field_id,
            free_cancellation_hours: row.free_cancellation_hours,
            late_cancellation_penalty_percent: row.late_cancellation_penalty_percent,
            no_show_penalty_percent: row.no_show_penalty_percent,
            refund_processing_days: row.refund_processing_days,
            policy_description: row.policy_description,
            is_active: row.is_active,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

impl TryFrom<DbBookingRequest> for BookingRequest {
    type Error = eyre::Report;

    fn try_from(row: DbBookingRequest) -> Result<Self> {
        Ok(BookingRequest {
            range: stored_range(row.start_time, row.end_time)?,
            status: row
                .status
                .parse()
                .wrap_err_with(|| format!("booking_request {}", row.booking_id))?,
            booking_id: row.booking_id,
            field_id: row.field_id,
            team_id: row.team_id,
            requester_id: row.requester_id,
            date: row.date,
            notes: row.notes,
            created_at: row.created_at,
            processed_at: row.processed_at,
        })
    }
}
