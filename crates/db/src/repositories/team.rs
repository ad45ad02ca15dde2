use eyre::Result;
use sqlx::PgExecutor;

pub async fn is_member<'e, E: PgExecutor<'e>>(
    executor: E,
    team_id: i64,
    user_id: i64,
) -> Result<bool> {
    let exists = sqlx::query_scalar::<_, bool>(
        r#"
        SELECT EXISTS (
            SELECT 1
            FROM team_member
            WHERE team_id = $1 AND user_id = $2
        );
        "#,
    )
    .bind(team_id)
    .bind(user_id)
    .fetch_one(executor)
    .await?;

    Ok(exists)
}

pub async fn add_member<'e, E: PgExecutor<'e>>(
    executor: E,
    team_id: i64,
    user_id: i64,
) -> Result<()> {
    sqlx::query(
        r#"
        INSERT INTO team_member (team_id, user_id)
        VALUES ($1, $2)
        ON CONFLICT DO NOTHING
        "#,
    )
    .bind(team_id)
    .bind(user_id)
    .execute(executor)
    .await?;

    Ok(())
}
