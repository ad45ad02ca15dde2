use eyre::Result;
use sqlx::{Executor, Pool, Postgres};
use tracing::info;

pub async fn initialize_database(pool: &Pool<Postgres>) -> Result<()> {
    info!("Initializing database schema...");

    // Create field_profile table
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS field_profile (
            field_id BIGSERIAL PRIMARY KEY,
            owner_id BIGINT NOT NULL,
            field_name VARCHAR(255) NOT NULL,
            description TEXT NULL,
            location VARCHAR(255) NOT NULL,
            default_price_per_hour DOUBLE PRECISION NOT NULL,
            capacity INTEGER NULL,
            status VARCHAR(32) NOT NULL DEFAULT 'Pending',
            rejection_reason TEXT NULL,
            created_at TIMESTAMP WITH TIME ZONE NOT NULL DEFAULT NOW(),
            updated_at TIMESTAMP WITH TIME ZONE NOT NULL DEFAULT NOW(),
            CONSTRAINT valid_field_status
                CHECK (status IN ('Pending', 'Verified', 'Rejected', 'PendingRevision')),
            CONSTRAINT valid_default_price CHECK (default_price_per_hour >= 0)
        );
        "#,
    )
    .execute(pool)
    .await?;

    // Membership facts owned by the team service; only read here
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS team_member (
            team_id BIGINT NOT NULL,
            user_id BIGINT NOT NULL,
            PRIMARY KEY (team_id, user_id)
        );
        "#,
    )
    .execute(pool)
    .await?;

    // Create booking_request table
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS booking_request (
            booking_id BIGSERIAL PRIMARY KEY,
            field_id BIGINT NOT NULL REFERENCES field_profile(field_id),
            team_id BIGINT NOT NULL,
            requester_id BIGINT NOT NULL,
            date DATE NOT NULL,
            start_time TIME NOT NULL,
            end_time TIME NOT NULL,
            status VARCHAR(32) NOT NULL DEFAULT 'Pending',
            notes TEXT NULL,
            created_at TIMESTAMP WITH TIME ZONE NOT NULL DEFAULT NOW(),
            processed_at TIMESTAMP WITH TIME ZONE NULL,
            CONSTRAINT valid_booking_range CHECK (end_time > start_time),
            CONSTRAINT valid_booking_status
                CHECK (status IN ('Pending', 'Confirmed', 'Rejected', 'Cancelled'))
        );
        "#,
    )
    .execute(pool)
    .await?;

    // Create field_calendar table. Rows exist only where a field deviates
    // from its default availability.
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS field_calendar (
            calendar_id BIGSERIAL PRIMARY KEY,
            field_id BIGINT NOT NULL REFERENCES field_profile(field_id),
            date DATE NOT NULL,
            start_time TIME NOT NULL,
            end_time TIME NOT NULL,
            status VARCHAR(32) NOT NULL,
            booking_id BIGINT NULL REFERENCES booking_request(booking_id),
            CONSTRAINT valid_calendar_range CHECK (end_time > start_time),
            CONSTRAINT valid_calendar_status
                CHECK (status IN ('Available', 'Booked', 'Maintenance', 'Blocked')),
            CONSTRAINT booked_has_booking
                CHECK ((status = 'Booked') = (booking_id IS NOT NULL))
        );
        "#,
    )
    .execute(pool)
    .await?;

    // Create field_pricing_rule table
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS field_pricing_rule (
            pricing_rule_id BIGSERIAL PRIMARY KEY,
            field_id BIGINT NOT NULL REFERENCES field_profile(field_id),
            name VARCHAR(255) NOT NULL,
            day_of_week TEXT[] NOT NULL DEFAULT '{}',
            start_time TIME NOT NULL,
            end_time TIME NOT NULL,
            price_per_hour DOUBLE PRECISION NOT NULL,
            priority INTEGER NOT NULL DEFAULT 0,
            is_active BOOLEAN NOT NULL DEFAULT TRUE,
            created_at TIMESTAMP WITH TIME ZONE NOT NULL DEFAULT NOW(),
            updated_at TIMESTAMP WITH TIME ZONE NOT NULL DEFAULT NOW(),
            CONSTRAINT valid_rule_range CHECK (end_time > start_time),
            CONSTRAINT valid_rule_price CHECK (price_per_hour >= 0)
        );
        "#,
    )
    .execute(pool)
    .await?;

    // Create cancellation_policy table, one row per field
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS cancellation_policy (
            policy_id BIGSERIAL PRIMARY KEY,
            field_id BIGINT NOT NULL UNIQUE REFERENCES field_profile(field_id),
            free_cancellation_hours INTEGER NOT NULL,
            late_cancellation_penalty_percent DOUBLE PRECISION NOT NULL,
            no_show_penalty_percent DOUBLE PRECISION NOT NULL,
            refund_processing_days INTEGER NOT NULL,
            policy_description TEXT NULL,
            is_active BOOLEAN NOT NULL DEFAULT TRUE,
            created_at TIMESTAMP WITH TIME ZONE NOT NULL DEFAULT NOW(),
            updated_at TIMESTAMP WITH TIME ZONE NOT NULL DEFAULT NOW()
        );
        "#,
    )
    .execute(pool)
    .await?;

    // Several statements, so this goes through the simple query protocol
    pool.execute(
        r#"
        CREATE INDEX IF NOT EXISTS idx_field_profile_owner_id ON field_profile(owner_id);
        CREATE INDEX IF NOT EXISTS idx_booking_request_field_id ON booking_request(field_id);
        CREATE INDEX IF NOT EXISTS idx_booking_request_team_id ON booking_request(team_id);
        CREATE INDEX IF NOT EXISTS idx_field_calendar_field_date ON field_calendar(field_id, date);
        CREATE UNIQUE INDEX IF NOT EXISTS uq_field_calendar_start
            ON field_calendar(field_id, date, start_time);
        CREATE UNIQUE INDEX IF NOT EXISTS uq_field_calendar_booking
            ON field_calendar(booking_id) WHERE booking_id IS NOT NULL;
        CREATE INDEX IF NOT EXISTS idx_field_pricing_rule_field_id ON field_pricing_rule(field_id);
        "#,
    )
    .await?;

    info!("Database schema initialized successfully.");
    Ok(())
}
