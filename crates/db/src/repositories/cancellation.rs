use eyre::Result;
use sqlx::PgExecutor;

use crate::models::DbCancellationPolicy;
use kickoff_core::models::cancellation::CancellationPolicyInput;

const POLICY_COLUMNS: &str = "policy_id, field_id, free_cancellation_hours, \
    late_cancellation_penalty_percent, no_show_penalty_percent, refund_processing_days, \
    policy_description, is_active, created_at, updated_at";

pub async fn get_policy<'e, E: PgExecutor<'e>>(
    executor: E,
    field_id: i64,
) -> Result<Option<DbCancellationPolicy>> {
    let sql = format!(
        "SELECT {} FROM cancellation_policy WHERE field_id = $1",
        POLICY_COLUMNS
    );
    let policy = sqlx::query_as::<_, DbCancellationPolicy>(&sql)
        .bind(field_id)
        .fetch_optional(executor)
        .await?;

    Ok(policy)
}

/// Inserts or overwrites the policy of a field. With `overwrite` false an
/// existing policy is left alone and returned as it is.
pub async fn upsert_policy<'e, E: PgExecutor<'e>>(
    executor: E,
    field_id: i64,
    input: &CancellationPolicyInput,
    overwrite: bool,
) -> Result<DbCancellationPolicy> {
    tracing::debug!(field_id, overwrite, "Upserting cancellation policy");

    // DO UPDATE even when not overwriting, so RETURNING always yields the row
    let on_conflict = if overwrite {
        "free_cancellation_hours = EXCLUDED.free_cancellation_hours, \
         late_cancellation_penalty_percent = EXCLUDED.late_cancellation_penalty_percent, \
         no_show_penalty_percent = EXCLUDED.no_show_penalty_percent, \
         refund_processing_days = EXCLUDED.refund_processing_days, \
         policy_description = EXCLUDED.policy_description, \
         is_active = EXCLUDED.is_active, \
         updated_at = NOW()"
    } else {
        "field_id = cancellation_policy.field_id"
    };

    let sql = format!(
        r#"
        INSERT INTO cancellation_policy
            (field_id, free_cancellation_hours, late_cancellation_penalty_percent,
             no_show_penalty_percent, refund_processing_days, policy_description, is_active)
        VALUES ($1, $2, $3, $4, $5, $6, $7)
        ON CONFLICT (field_id) DO UPDATE SET {}
        RETURNING {}
        "#,
        on_conflict, POLICY_COLUMNS
    );
    let policy = sqlx::query_as::<_, DbCancellationPolicy>(&sql)
        .bind(field_id)
        .bind(input.free_cancellation_hours)
        .bind(input.late_cancellation_penalty_percent)
        .bind(input.no_show_penalty_percent)
        .bind(input.refund_processing_days)
        .bind(input.policy_description.as_deref())
        .bind(input.is_active)
        .fetch_one(executor)
        .await?;

    Ok(policy)
}
