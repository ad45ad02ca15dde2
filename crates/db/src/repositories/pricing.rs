use eyre::Result;
use sqlx::PgExecutor;

use crate::models::DbPricingRule;
use kickoff_core::models::pricing::NewPricingRule;

pub async fn list_rules<'e, E: PgExecutor<'e>>(
    executor: E,
    field_id: i64,
) -> Result<Vec<DbPricingRule>> {
    let rules = sqlx::query_as::<_, DbPricingRule>(
        r#"
        SELECT pricing_rule_id, field_id, name, day_of_week, start_time, end_time,
               price_per_hour, priority, is_active, created_at, updated_at
        FROM field_pricing_rule
        WHERE field_id = $1
        ORDER BY priority DESC, pricing_rule_id ASC
        "#,
    )
    .bind(field_id)
    .fetch_all(executor)
    .await?;

    Ok(rules)
}

pub async fn delete_rules<'e, E: PgExecutor<'e>>(executor: E, field_id: i64) -> Result<u64> {
    let result = sqlx::query("DELETE FROM field_pricing_rule WHERE field_id = $1")
        .bind(field_id)
        .execute(executor)
        .await?;

    Ok(result.rows_affected())
}

pub async fn insert_rule<'e, E: PgExecutor<'e>>(
    executor: E,
    field_id: i64,
    rule: &NewPricingRule,
) -> Result<DbPricingRule> {
    let days: Vec<&str> = rule.day_of_week.iter().map(|day| day.as_str()).collect();

    let row = sqlx::query_as::<_, DbPricingRule>(
        r#"
        INSERT INTO field_pricing_rule
            (field_id, name, day_of_week, start_time, end_time, price_per_hour, priority, is_active)
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
        RETURNING pricing_rule_id, field_id, name, day_of_week, start_time, end_time,
                  price_per_hour, priority, is_active, created_at, updated_at
        "#,
    )
    .bind(field_id)
    .bind(&rule.name)
    .bind(days)
    .bind(rule.range.start_time())
    .bind(rule.range.end_time())
    .bind(rule.price_per_hour)
    .bind(rule.priority)
    .bind(rule.is_active)
    .fetch_one(executor)
    .await?;

    Ok(row)
}
