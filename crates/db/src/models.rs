use chrono::{DateTime, Utc};
use eyre::Result;
use serde::{Deserialize, Serialize};
use slotbook_core::models::{booking::Booking, slot::Slot};
use sqlx::FromRow;
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct DbSlot {
    pub id: Uuid,
    pub handle: String,
    pub staff_id: Option<Uuid>,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    pub available: bool,
    pub created_at: DateTime<Utc>,
}

impl From<DbSlot> for Slot {
    fn from(row: DbSlot) -> Self {
        Slot {
            id: row.id,
            handle: row.handle,
            staff_id: row.staff_id,
            start_time: row.start_time,
            end_time: row.end_time,
            available: row.available,
            created_at: row.created_at,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct DbBooking {
    pub id: Uuid,
    pub handle: String,
    pub slot_id: Option<Uuid>,
    pub customer_name: String,
    pub customer_email: String,
    pub customer_phone: Option<String>,
    pub item: Option<String>,
    pub amount_cents: i64,
    pub status: String,
    pub checked_in: bool,
    pub checked_in_at: Option<DateTime<Utc>>,
    pub payment_session_id: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl DbBooking {
    pub fn into_booking(self) -> Result<Booking> {
        let status = self
            .status
            .parse()
            .map_err(|e| eyre::eyre!("booking {} has unreadable status: {}", self.id, e))?;

        Ok(Booking {
            id: self.id,
            handle: self.handle,
            slot_id: self.slot_id,
            customer_name: self.customer_name,
            customer_email: self.customer_email,
            customer_phone: self.customer_phone,
            item: self.item,
            amount_cents: self.amount_cents,
            status,
            checked_in: self.checked_in,
            checked_in_at: self.checked_in_at,
            payment_session_id: self.payment_session_id,
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }
}
