//! Postgres implementation of the core storage traits. Each method maps onto
//! one repository call; the conditional `UPDATE … WHERE` clauses in the
//! repositories provide the per-row atomicity the engine relies on.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use slotbook_core::{
    errors::{BookError, BookResult},
    models::{
        booking::{Booking, BookingStatus, NewBooking},
        slot::{ClaimOutcome, NewSlot, Slot},
    },
    store::{BookingStore, SlotStore},
};
use uuid::Uuid;

use crate::{
    DbPool,
    models::DbBooking,
    repositories::{booking, slot},
};

#[derive(Clone)]
pub struct PgStore {
    pool: DbPool,
}

impl PgStore {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn to_booking(row: Option<DbBooking>) -> BookResult<Option<Booking>> {
    Ok(row.map(DbBooking::into_booking).transpose()?)
}

#[async_trait]
impl SlotStore for PgStore {
    async fn insert_slot(&self, new: NewSlot) -> BookResult<Slot> {
        new.validate()?;
        let row = slot::create_slot(
            &self.pool,
            &new.handle,
            new.staff_id,
            new.start_time,
            new.end_time,
        )
        .await?;
        Ok(row.into())
    }

    async fn get_slot(&self, id: Uuid) -> BookResult<Option<Slot>> {
        Ok(slot::get_slot_by_id(&self.pool, id).await?.map(Slot::from))
    }

    async fn list_slots(
        &self,
        handle: &str,
        from: DateTime<Utc>,
        free_only: bool,
    ) -> BookResult<Vec<Slot>> {
        let rows = slot::get_slots_by_handle(&self.pool, handle, from, free_only).await?;
        Ok(rows.into_iter().map(Slot::from).collect())
    }

    async fn try_claim(&self, id: Uuid) -> BookResult<ClaimOutcome> {
        if slot::claim_slot(&self.pool, id).await?.is_some() {
            return Ok(ClaimOutcome::Claimed);
        }
        // The claim did not apply; only now find out why.
        Ok(match slot::get_slot_by_id(&self.pool, id).await? {
            Some(_) => ClaimOutcome::AlreadyClaimed,
            None => ClaimOutcome::Missing,
        })
    }

    async fn mark_free(&self, id: Uuid) -> BookResult<bool> {
        Ok(slot::free_slot(&self.pool, id).await?)
    }
}

#[async_trait]
impl BookingStore for PgStore {
    async fn insert_booking(&self, new: NewBooking) -> BookResult<Booking> {
        match booking::create_booking(&self.pool, &new).await? {
            Some(row) => Ok(row.into_booking()?),
            None => Err(BookError::Conflict(format!(
                "slot {:?} already has an active booking",
                new.slot_id
            ))),
        }
    }

    async fn get_booking(&self, id: Uuid) -> BookResult<Option<Booking>> {
        to_booking(booking::get_booking_by_id(&self.pool, id).await?)
    }

    async fn get_booking_by_payment_session(
        &self,
        session_id: &str,
    ) -> BookResult<Option<Booking>> {
        to_booking(booking::get_booking_by_payment_session(&self.pool, session_id).await?)
    }

    async fn list_bookings(
        &self,
        handle: &str,
        status: Option<BookingStatus>,
    ) -> BookResult<Vec<Booking>> {
        let rows = booking::get_bookings_by_handle(&self.pool, handle, status).await?;
        rows.into_iter()
            .map(|row| row.into_booking().map_err(BookError::from))
            .collect()
    }

    async fn has_active_booking(&self, slot_id: Uuid) -> BookResult<bool> {
        Ok(booking::has_active_booking(&self.pool, slot_id).await?)
    }

    async fn transition_status(&self, id: Uuid, to: BookingStatus) -> BookResult<Option<Booking>> {
        to_booking(booking::update_booking_status(&self.pool, id, to).await?)
    }

    async fn mark_checked_in(&self, id: Uuid, at: DateTime<Utc>) -> BookResult<Option<Booking>> {
        to_booking(booking::check_in_booking(&self.pool, id, at).await?)
    }

    async fn delete_booking(&self, id: Uuid) -> BookResult<Option<Booking>> {
        to_booking(booking::delete_booking(&self.pool, id).await?)
    }
}
