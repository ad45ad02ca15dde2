use chrono::NaiveDate;
use eyre::Result;
use sqlx::PgExecutor;

use crate::models::DbCalendarSlot;
use kickoff_core::models::calendar::NewCalendarSlot;

/// Serializes writers of one field's calendar until the surrounding
/// transaction ends.
pub async fn lock_field<'e, E: PgExecutor<'e>>(executor: E, field_id: i64) -> Result<()> {
    sqlx::query("SELECT pg_advisory_xact_lock($1)")
        .bind(field_id)
        .execute(executor)
        .await?;

    Ok(())
}

/// Stored rows of a field, optionally bounded by inclusive dates.
pub async fn list_slots<'e, E: PgExecutor<'e>>(
    executor: E,
    field_id: i64,
    start: Option<NaiveDate>,
    end: Option<NaiveDate>,
) -> Result<Vec<DbCalendarSlot>> {
    let slots = sqlx::query_as::<_, DbCalendarSlot>(
        r#"
        SELECT calendar_id, field_id, date, start_time, end_time, status, booking_id
        FROM field_calendar
        WHERE field_id = $1
          AND ($2::date IS NULL OR date >= $2)
          AND ($3::date IS NULL OR date <= $3)
        ORDER BY date ASC, start_time ASC
        "#,
    )
    .bind(field_id)
    .bind(start)
    .bind(end)
    .fetch_all(executor)
    .await?;

    Ok(slots)
}

pub async fn get_slot<'e, E: PgExecutor<'e>>(
    executor: E,
    calendar_id: i64,
    for_update: bool,
) -> Result<Option<DbCalendarSlot>> {
    let sql = if for_update {
        r#"
        SELECT calendar_id, field_id, date, start_time, end_time, status, booking_id
        FROM field_calendar
        WHERE calendar_id = $1
        FOR UPDATE
        "#
    } else {
        r#"
        SELECT calendar_id, field_id, date, start_time, end_time, status, booking_id
        FROM field_calendar
        WHERE calendar_id = $1
        "#
    };

    let slot = sqlx::query_as::<_, DbCalendarSlot>(sql)
        .bind(calendar_id)
        .fetch_optional(executor)
        .await?;

    Ok(slot)
}

pub async fn insert_slot<'e, E: PgExecutor<'e>>(
    executor: E,
    slot: &NewCalendarSlot,
) -> Result<DbCalendarSlot> {
    tracing::debug!(
        field_id = slot.field_id,
        date = %slot.date,
        range = %slot.range,
        status = %slot.status,
        "Inserting calendar slot"
    );

    let row = sqlx::query_as::<_, DbCalendarSlot>(
        r#"
        INSERT INTO field_calendar (field_id, date, start_time, end_time, status, booking_id)
        VALUES ($1, $2, $3, $4, $5, $6)
        RETURNING calendar_id, field_id, date, start_time, end_time, status, booking_id
        "#,
    )
    .bind(slot.field_id)
    .bind(slot.date)
    .bind(slot.range.start_time())
    .bind(slot.range.end_time())
    .bind(slot.status.as_str())
    .bind(slot.booking_id)
    .fetch_one(executor)
    .await?;

    Ok(row)
}

pub async fn delete_slot<'e, E: PgExecutor<'e>>(executor: E, calendar_id: i64) -> Result<bool> {
    let result = sqlx::query("DELETE FROM field_calendar WHERE calendar_id = $1")
        .bind(calendar_id)
        .execute(executor)
        .await?;

    Ok(result.rows_affected() > 0)
}

pub async fn delete_booking_slot<'e, E: PgExecutor<'e>>(
    executor: E,
    booking_id: i64,
) -> Result<u64> {
    let result = sqlx::query("DELETE FROM field_calendar WHERE booking_id = $1")
        .bind(booking_id)
        .execute(executor)
        .await?;

    Ok(result.rows_affected())
}
