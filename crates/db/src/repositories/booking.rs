use crate::models::DbBooking;
use chrono::{DateTime, Utc};
use eyre::Result;
use slotbook_core::models::booking::{BookingStatus, NewBooking};
use sqlx::{Pool, Postgres};
use uuid::Uuid;

const BOOKING_COLUMNS: &str = "id, handle, slot_id, customer_name, customer_email, \
    customer_phone, item, amount_cents, status, checked_in, checked_in_at, \
    payment_session_id, created_at, updated_at";

/// `None` when the active-slot unique index rejects the row.
pub async fn create_booking(pool: &Pool<Postgres>, booking: &NewBooking) -> Result<Option<DbBooking>> {
    let id = Uuid::new_v4();
    let now = Utc::now();

    tracing::debug!(
        "Creating booking: id={}, handle={}, slot_id={:?}",
        id, booking.handle, booking.slot_id
    );

    let inserted = sqlx::query_as::<_, DbBooking>(&format!(
        r#"
        INSERT INTO bookings (
            id, handle, slot_id, customer_name, customer_email, customer_phone,
            item, amount_cents, status, checked_in, payment_session_id,
            created_at, updated_at
        )
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8, 'pending', FALSE, $9, $10, $10)
        RETURNING {BOOKING_COLUMNS}
        "#
    ))
    .bind(id)
    .bind(&booking.handle)
    .bind(booking.slot_id)
    .bind(&booking.customer_name)
    .bind(&booking.customer_email)
    .bind(&booking.customer_phone)
    .bind(&booking.item)
    .bind(booking.amount_cents)
    .bind(&booking.payment_session_id)
    .bind(now)
    .fetch_one(pool)
    .await;

    match inserted {
        Ok(row) => Ok(Some(row)),
        Err(sqlx::Error::Database(e)) if e.is_unique_violation() => {
            tracing::debug!("Active booking already exists for slot {:?}", booking.slot_id);
            Ok(None)
        }
        Err(e) => Err(e.into()),
    }
}

pub async fn get_booking_by_id(pool: &Pool<Postgres>, id: Uuid) -> Result<Option<DbBooking>> {
    let booking = sqlx::query_as::<_, DbBooking>(&format!(
        "SELECT {BOOKING_COLUMNS} FROM bookings WHERE id = $1"
    ))
    .bind(id)
    .fetch_optional(pool)
    .await?;

    Ok(booking)
}

pub async fn get_booking_by_payment_session(
    pool: &Pool<Postgres>,
    session_id: &str,
) -> Result<Option<DbBooking>> {
    let booking = sqlx::query_as::<_, DbBooking>(&format!(
        r#"
        SELECT {BOOKING_COLUMNS}
        FROM bookings
        WHERE payment_session_id = $1
        ORDER BY created_at DESC
        LIMIT 1
        "#
    ))
    .bind(session_id)
    .fetch_optional(pool)
    .await?;

    Ok(booking)
}

pub async fn get_bookings_by_handle(
    pool: &Pool<Postgres>,
    handle: &str,
    status: Option<BookingStatus>,
) -> Result<Vec<DbBooking>> {
    let bookings = sqlx::query_as::<_, DbBooking>(&format!(
        r#"
        SELECT {BOOKING_COLUMNS}
        FROM bookings
        WHERE handle = $1 AND ($2::VARCHAR IS NULL OR status = $2)
        ORDER BY created_at ASC
        "#
    ))
    .bind(handle)
    .bind(status.map(|s| s.as_str()))
    .fetch_all(pool)
    .await?;

    Ok(bookings)
}

pub async fn has_active_booking(pool: &Pool<Postgres>, slot_id: Uuid) -> Result<bool> {
    let active: bool = sqlx::query_scalar(
        r#"
        SELECT EXISTS (
            SELECT 1 FROM bookings
            WHERE slot_id = $1 AND status IN ('pending', 'confirmed')
        )
        "#,
    )
    .bind(slot_id)
    .fetch_one(pool)
    .await?;

    Ok(active)
}

/// Conditional status change guarded by `to.predecessors()`.
pub async fn update_booking_status(
    pool: &Pool<Postgres>,
    id: Uuid,
    to: BookingStatus,
) -> Result<Option<DbBooking>> {
    let from: Vec<&str> = to.predecessors().iter().map(|s| s.as_str()).collect();

    let booking = sqlx::query_as::<_, DbBooking>(&format!(
        r#"
        UPDATE bookings
        SET status = $2, updated_at = NOW()
        WHERE id = $1 AND status = ANY($3)
        RETURNING {BOOKING_COLUMNS}
        "#
    ))
    .bind(id)
    .bind(to.as_str())
    .bind(&from)
    .fetch_optional(pool)
    .await?;

    Ok(booking)
}

pub async fn check_in_booking(
    pool: &Pool<Postgres>,
    id: Uuid,
    at: DateTime<Utc>,
) -> Result<Option<DbBooking>> {
    let booking = sqlx::query_as::<_, DbBooking>(&format!(
        r#"
        UPDATE bookings
        SET checked_in = TRUE, checked_in_at = $2, updated_at = $2
        WHERE id = $1 AND status = 'confirmed' AND NOT checked_in
        RETURNING {BOOKING_COLUMNS}
        "#
    ))
    .bind(id)
    .bind(at)
    .fetch_optional(pool)
    .await?;

    Ok(booking)
}

pub async fn delete_booking(pool: &Pool<Postgres>, id: Uuid) -> Result<Option<DbBooking>> {
    let booking = sqlx::query_as::<_, DbBooking>(&format!(
        "DELETE FROM bookings WHERE id = $1 RETURNING {BOOKING_COLUMNS}"
    ))
    .bind(id)
    .fetch_optional(pool)
    .await?;

    Ok(booking)
}
