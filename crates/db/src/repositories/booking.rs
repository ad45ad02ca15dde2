use chrono::{DateTime, Utc};
use eyre::Result;
use sqlx::PgExecutor;

use crate::models::DbBookingRequest;
use kickoff_core::models::booking::{BookingStatus, NewBooking};

const BOOKING_COLUMNS: &str = "booking_id, field_id, team_id, requester_id, date, start_time, \
    end_time, status, notes, created_at, processed_at";

pub async fn create_booking<'e, E: PgExecutor<'e>>(
    executor: E,
    booking: &NewBooking,
) -> Result<DbBookingRequest> {
    tracing::debug!(
        field_id = booking.field_id,
        team_id = booking.team_id,
        interval = %booking.interval,
        "Creating booking request"
    );

    let sql = format!(
        r#"
        INSERT INTO booking_request
            (field_id, team_id, requester_id, date, start_time, end_time, status, notes)
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
        RETURNING {}
        "#,
        BOOKING_COLUMNS
    );
    let row = sqlx::query_as::<_, DbBookingRequest>(&sql)
        .bind(booking.field_id)
        .bind(booking.team_id)
        .bind(booking.requester_id)
        .bind(booking.interval.date)
        .bind(booking.interval.range.start_time())
        .bind(booking.interval.range.end_time())
        .bind(BookingStatus::Pending.as_str())
        .bind(booking.notes.as_deref())
        .fetch_one(executor)
        .await?;

    Ok(row)
}

pub async fn get_booking<'e, E: PgExecutor<'e>>(
    executor: E,
    booking_id: i64,
    for_update: bool,
) -> Result<Option<DbBookingRequest>> {
    let sql = format!(
        "SELECT {} FROM booking_request WHERE booking_id = $1{}",
        BOOKING_COLUMNS,
        if for_update { " FOR UPDATE" } else { "" }
    );
    let row = sqlx::query_as::<_, DbBookingRequest>(&sql)
        .bind(booking_id)
        .fetch_optional(executor)
        .await?;

    Ok(row)
}

pub async fn list_by_field<'e, E: PgExecutor<'e>>(
    executor: E,
    field_id: i64,
    status: Option<BookingStatus>,
) -> Result<Vec<DbBookingRequest>> {
    let sql = format!(
        r#"
        SELECT {}
        FROM booking_request
        WHERE field_id = $1 AND ($2::text IS NULL OR status = $2)
        ORDER BY created_at DESC, booking_id DESC
        "#,
        BOOKING_COLUMNS
    );
    let rows = sqlx::query_as::<_, DbBookingRequest>(&sql)
        .bind(field_id)
        .bind(status.map(|status| status.as_str()))
        .fetch_all(executor)
        .await?;

    Ok(rows)
}

pub async fn list_by_team<'e, E: PgExecutor<'e>>(
    executor: E,
    team_id: i64,
) -> Result<Vec<DbBookingRequest>> {
    let sql = format!(
        r#"
        SELECT {}
        FROM booking_request
        WHERE team_id = $1
        ORDER BY created_at DESC, booking_id DESC
        "#,
        BOOKING_COLUMNS
    );
    let rows = sqlx::query_as::<_, DbBookingRequest>(&sql)
        .bind(team_id)
        .fetch_all(executor)
        .await?;

    Ok(rows)
}

pub async fn set_status<'e, E: PgExecutor<'e>>(
    executor: E,
    booking_id: i64,
    status: BookingStatus,
    processed_at: DateTime<Utc>,
) -> Result<DbBookingRequest> {
    tracing::debug!(booking_id, %status, "Updating booking status");

    let sql = format!(
        r#"
        UPDATE booking_request
        SET status = $2, processed_at = $3
        WHERE booking_id = $1
        RETURNING {}
        "#,
        BOOKING_COLUMNS
    );
    let row = sqlx::query_as::<_, DbBookingRequest>(&sql)
        .bind(booking_id)
        .bind(status.as_str())
        .bind(processed_at)
        .fetch_one(executor)
        .await?;

    Ok(row)
}
