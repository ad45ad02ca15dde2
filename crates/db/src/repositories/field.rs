use eyre::Result;
use sqlx::PgExecutor;

use crate::models::DbFieldProfile;
use kickoff_core::models::field::{
    CreateFieldRequest, FieldSearch, FieldStatus, UpdateFieldRequest,
};

const FIELD_COLUMNS: &str = "field_id, owner_id, field_name, description, location, \
    default_price_per_hour, capacity, status, rejection_reason, created_at, updated_at";

pub async fn create_field<'e, E: PgExecutor<'e>>(
    executor: E,
    owner_id: i64,
    request: &CreateFieldRequest,
) -> Result<DbFieldProfile> {
    tracing::debug!(owner_id, field_name = %request.field_name, "Creating field");

    let sql = format!(
        r#"
        INSERT INTO field_profile
            (owner_id, field_name, description, location, default_price_per_hour, capacity, status)
        VALUES ($1, $2, $3, $4, $5, $6, $7)
        RETURNING {}
        "#,
        FIELD_COLUMNS
    );
    let field = sqlx::query_as::<_, DbFieldProfile>(&sql)
        .bind(owner_id)
        .bind(request.field_name.trim())
        .bind(request.description.as_deref())
        .bind(request.location.trim())
        .bind(request.default_price_per_hour)
        .bind(request.capacity)
        .bind(FieldStatus::Pending.as_str())
        .fetch_one(executor)
        .await?;

    Ok(field)
}

pub async fn get_field<'e, E: PgExecutor<'e>>(
    executor: E,
    field_id: i64,
) -> Result<Option<DbFieldProfile>> {
    let sql = format!("SELECT {} FROM field_profile WHERE field_id = $1", FIELD_COLUMNS);
    let field = sqlx::query_as::<_, DbFieldProfile>(&sql)
        .bind(field_id)
        .fetch_optional(executor)
        .await?;

    Ok(field)
}

pub async fn update_field_status<'e, E: PgExecutor<'e>>(
    executor: E,
    field_id: i64,
    status: FieldStatus,
    rejection_reason: Option<&str>,
) -> Result<Option<DbFieldProfile>> {
    tracing::debug!(field_id, %status, "Updating field status");

    let sql = format!(
        r#"
        UPDATE field_profile
        SET status = $2, rejection_reason = $3, updated_at = NOW()
        WHERE field_id = $1
        RETURNING {}
        "#,
        FIELD_COLUMNS
    );
    let field = sqlx::query_as::<_, DbFieldProfile>(&sql)
        .bind(field_id)
        .bind(status.as_str())
        .bind(rejection_reason)
        .fetch_optional(executor)
        .await?;

    Ok(field)
}

pub async fn list_fields_by_owner<'e, E: PgExecutor<'e>>(
    executor: E,
    owner_id: i64,
) -> Result<Vec<DbFieldProfile>> {
    let sql = format!(
        "SELECT {} FROM field_profile WHERE owner_id = $1 ORDER BY field_id",
        FIELD_COLUMNS
    );
    let fields = sqlx::query_as::<_, DbFieldProfile>(&sql)
        .bind(owner_id)
        .fetch_all(executor)
        .await?;

    Ok(fields)
}

pub async fn update_field<'e, E: PgExecutor<'e>>(
    executor: E,
    field_id: i64,
    update: &UpdateFieldRequest,
) -> Result<Option<DbFieldProfile>> {
    tracing::debug!(field_id, "Updating field profile");

    let sql = format!(
        r#"
        UPDATE field_profile
        SET field_name = COALESCE($2, field_name),
            description = COALESCE($3, description),
            location = COALESCE($4, location),
            default_price_per_hour = COALESCE($5, default_price_per_hour),
            capacity = COALESCE($6, capacity),
            updated_at = NOW()
        WHERE field_id = $1
        RETURNING {}
        "#,
        FIELD_COLUMNS
    );
    let field = sqlx::query_as::<_, DbFieldProfile>(&sql)
        .bind(field_id)
        .bind(update.field_name.as_deref().map(str::trim))
        .bind(update.description.as_deref())
        .bind(update.location.as_deref().map(str::trim))
        .bind(update.default_price_per_hour)
        .bind(update.capacity)
        .fetch_optional(executor)
        .await?;

    Ok(field)
}

/// Deletes a field and every row that references it in one statement.
pub async fn delete_field<'e, E: PgExecutor<'e>>(executor: E, field_id: i64) -> Result<bool> {
    tracing::debug!(field_id, "Deleting field");

    let result = sqlx::query(
        r#"
        WITH slots AS (
            DELETE FROM field_calendar WHERE field_id = $1
        ), bookings AS (
            DELETE FROM booking_request WHERE field_id = $1
        ), rules AS (
            DELETE FROM field_pricing_rule WHERE field_id = $1
        ), policies AS (
            DELETE FROM cancellation_policy WHERE field_id = $1
        )
        DELETE FROM field_profile WHERE field_id = $1
        "#,
    )
    .bind(field_id)
    .execute(executor)
    .await?;

    Ok(result.rows_affected() > 0)
}

/// `ILIKE` pattern matching `term` anywhere, with wildcards in `term` taken
/// literally.
fn contains_pattern(term: &str) -> String {
    let escaped = term
        .replace('\\', "\\\\")
        .replace('%', "\\%")
        .replace('_', "\\_");
    format!("%{}%", escaped)
}

pub async fn search_fields<'e, E: PgExecutor<'e>>(
    executor: E,
    search: &FieldSearch,
) -> Result<Vec<DbFieldProfile>> {
    let sql = format!(
        r#"
        SELECT {}
        FROM field_profile
        WHERE status = $1
          AND ($2::TEXT IS NULL OR field_name ILIKE $2)
          AND ($3::TEXT IS NULL OR location ILIKE $3)
        ORDER BY field_id
        LIMIT $4
        "#,
        FIELD_COLUMNS
    );
    let fields = sqlx::query_as::<_, DbFieldProfile>(&sql)
        .bind(FieldStatus::Verified.as_str())
        .bind(search.name.as_deref().map(contains_pattern))
        .bind(search.location.as_deref().map(contains_pattern))
        .bind(search.limit)
        .fetch_all(executor)
        .await?;

    Ok(fields)
}
