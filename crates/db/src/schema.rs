use eyre::Result;
use sqlx::{Pool, Postgres};
use tracing::info;

pub async fn initialize_database(pool: &Pool<Postgres>) -> Result<()> {
    info!("Initializing database schema...");

    // Slots are inserted by the availability generator; only `available`
    // changes afterwards.
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS slots (
            id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
            handle VARCHAR(255) NOT NULL,
            staff_id UUID NULL,
            start_time TIMESTAMP WITH TIME ZONE NOT NULL,
            end_time TIMESTAMP WITH TIME ZONE NOT NULL,
            available BOOLEAN NOT NULL DEFAULT TRUE,
            created_at TIMESTAMP WITH TIME ZONE NOT NULL DEFAULT NOW(),
            CONSTRAINT valid_slot_range CHECK (end_time > start_time)
        );
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS bookings (
            id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
            handle VARCHAR(255) NOT NULL,
            slot_id UUID NULL REFERENCES slots(id),
            customer_name VARCHAR(255) NOT NULL,
            customer_email VARCHAR(255) NOT NULL,
            customer_phone VARCHAR(64) NULL,
            item TEXT NULL,
            amount_cents BIGINT NOT NULL DEFAULT 0,
            status VARCHAR(16) NOT NULL DEFAULT 'pending',
            checked_in BOOLEAN NOT NULL DEFAULT FALSE,
            checked_in_at TIMESTAMP WITH TIME ZONE NULL,
            payment_session_id VARCHAR(255) NULL,
            created_at TIMESTAMP WITH TIME ZONE NOT NULL DEFAULT NOW(),
            updated_at TIMESTAMP WITH TIME ZONE NOT NULL DEFAULT NOW(),
            CONSTRAINT valid_booking_status
                CHECK (status IN ('pending', 'confirmed', 'cancelled')),
            CONSTRAINT non_negative_amount CHECK (amount_cents >= 0)
        );
        "#,
    )
    .execute(pool)
    .await?;

    // At most one pending/confirmed booking per slot.
    sqlx::query(
        r#"
        CREATE UNIQUE INDEX IF NOT EXISTS idx_bookings_active_slot
            ON bookings(slot_id)
            WHERE status IN ('pending', 'confirmed');
        "#,
    )
    .execute(pool)
    .await?;

    for index in [
        "CREATE INDEX IF NOT EXISTS idx_slots_handle_start ON slots(handle, start_time)",
        "CREATE INDEX IF NOT EXISTS idx_bookings_handle ON bookings(handle)",
        "CREATE INDEX IF NOT EXISTS idx_bookings_payment_session ON bookings(payment_session_id)",
    ] {
        sqlx::query(index).execute(pool).await?;
    }

    info!("Database schema initialized successfully.");
    Ok(())
}
