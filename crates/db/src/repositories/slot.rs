use crate::models::DbSlot;
use chrono::{DateTime, Utc};
use eyre::Result;
use sqlx::{Pool, Postgres};
use uuid::Uuid;

const SLOT_COLUMNS: &str = "id, handle, staff_id, start_time, end_time, available, created_at";

pub async fn create_slot(
    pool: &Pool<Postgres>,
    handle: &str,
    staff_id: Option<Uuid>,
    start_time: DateTime<Utc>,
    end_time: DateTime<Utc>,
) -> Result<DbSlot> {
    let id = Uuid::new_v4();
    let now = Utc::now();

    let slot = sqlx::query_as::<_, DbSlot>(&format!(
        r#"
        INSERT INTO slots (id, handle, staff_id, start_time, end_time, available, created_at)
        VALUES ($1, $2, $3, $4, $5, TRUE, $6)
        RETURNING {SLOT_COLUMNS}
        "#
    ))
    .bind(id)
    .bind(handle)
    .bind(staff_id)
    .bind(start_time)
    .bind(end_time)
    .bind(now)
    .fetch_one(pool)
    .await?;

    Ok(slot)
}

pub async fn get_slot_by_id(pool: &Pool<Postgres>, id: Uuid) -> Result<Option<DbSlot>> {
    let slot = sqlx::query_as::<_, DbSlot>(&format!(
        "SELECT {SLOT_COLUMNS} FROM slots WHERE id = $1"
    ))
    .bind(id)
    .fetch_optional(pool)
    .await?;

    Ok(slot)
}

pub async fn get_slots_by_handle(
    pool: &Pool<Postgres>,
    handle: &str,
    from: DateTime<Utc>,
    free_only: bool,
) -> Result<Vec<DbSlot>> {
    let slots = sqlx::query_as::<_, DbSlot>(&format!(
        r#"
        SELECT {SLOT_COLUMNS}
        FROM slots
        WHERE handle = $1 AND start_time >= $2 AND (available OR NOT $3)
        ORDER BY start_time ASC
        "#
    ))
    .bind(handle)
    .bind(from)
    .bind(free_only)
    .fetch_all(pool)
    .await?;

    Ok(slots)
}

/// Compare-and-swap on the availability flag. `None` when the slot is
/// missing or already claimed.
pub async fn claim_slot(pool: &Pool<Postgres>, id: Uuid) -> Result<Option<DbSlot>> {
    let slot = sqlx::query_as::<_, DbSlot>(&format!(
        r#"
        UPDATE slots
        SET available = FALSE
        WHERE id = $1 AND available
        RETURNING {SLOT_COLUMNS}
        "#
    ))
    .bind(id)
    .fetch_optional(pool)
    .await?;

    Ok(slot)
}

/// Returns `false` when no slot has this id.
pub async fn free_slot(pool: &Pool<Postgres>, id: Uuid) -> Result<bool> {
    let result = sqlx::query(
        r#"
        UPDATE slots
        SET available = TRUE
        WHERE id = $1
        "#,
    )
    .bind(id)
    .execute(pool)
    .await?;

    Ok(result.rows_affected() == 1)
}
