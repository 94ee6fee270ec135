//! Process-local store. Each conditional write happens inside one mutex
//! section, which gives the same per-row atomicity Postgres gives the
//! conditional `UPDATE`s in `slotbook-db`.

use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use eyre::eyre;
use uuid::Uuid;

use super::{BookingStore, SlotStore};
use crate::errors::{BookError, BookResult};
use crate::models::{
    booking::{Booking, BookingStatus, NewBooking},
    slot::{ClaimOutcome, NewSlot, Slot},
};

#[derive(Debug, Default)]
pub struct InMemoryStore {
    slots: Mutex<HashMap<Uuid, Slot>>,
    bookings: Mutex<HashMap<Uuid, Booking>>,
}

fn lock<'a, T>(mutex: &'a Mutex<T>, what: &str) -> BookResult<MutexGuard<'a, T>> {
    mutex
        .lock()
        .map_err(|_| BookError::Dependency(eyre!("{what} lock poisoned")))
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl SlotStore for InMemoryStore {
    async fn insert_slot(&self, slot: NewSlot) -> BookResult<Slot> {
        slot.validate()?;
        let slot = Slot {
            id: Uuid::new_v4(),
            handle: slot.handle,
            staff_id: slot.staff_id,
            start_time: slot.start_time,
            end_time: slot.end_time,
            available: true,
            created_at: Utc::now(),
        };
        lock(&self.slots, "slots")?.insert(slot.id, slot.clone());
        Ok(slot)
    }

    async fn get_slot(&self, id: Uuid) -> BookResult<Option<Slot>> {
        Ok(lock(&self.slots, "slots")?.get(&id).cloned())
    }

    async fn list_slots(
        &self,
        handle: &str,
        from: DateTime<Utc>,
        free_only: bool,
    ) -> BookResult<Vec<Slot>> {
        let mut slots: Vec<Slot> = lock(&self.slots, "slots")?
            .values()
            .filter(|s| s.handle == handle && s.start_time >= from)
            .filter(|s| !free_only || s.available)
            .cloned()
            .collect();
        slots.sort_by_key(|s| s.start_time);
        Ok(slots)
    }

    async fn try_claim(&self, id: Uuid) -> BookResult<ClaimOutcome> {
        let mut slots = lock(&self.slots, "slots")?;
        Ok(match slots.get_mut(&id) {
            None => ClaimOutcome::Missing,
            Some(slot) if !slot.available => ClaimOutcome::AlreadyClaimed,
            Some(slot) => {
                slot.available = false;
                ClaimOutcome::Claimed
            }
        })
    }

    async fn mark_free(&self, id: Uuid) -> BookResult<bool> {
        let mut slots = lock(&self.slots, "slots")?;
        Ok(match slots.get_mut(&id) {
            Some(slot) => {
                slot.available = true;
                true
            }
            None => false,
        })
    }
}

#[async_trait]
impl BookingStore for InMemoryStore {
    async fn insert_booking(&self, booking: NewBooking) -> BookResult<Booking> {
        let mut bookings = lock(&self.bookings, "bookings")?;

        if let Some(slot_id) = booking.slot_id {
            if bookings
                .values()
                .any(|b| b.slot_id == Some(slot_id) && b.status.is_active())
            {
                return Err(BookError::Conflict(format!(
                    "slot {slot_id} already has an active booking"
                )));
            }
        }

        let now = Utc::now();
        let booking = Booking {
            id: Uuid::new_v4(),
            handle: booking.handle,
            slot_id: booking.slot_id,
            customer_name: booking.customer_name,
            customer_email: booking.customer_email,
            customer_phone: booking.customer_phone,
            item: booking.item,
            amount_cents: booking.amount_cents,
            status: BookingStatus::Pending,
            checked_in: false,
            checked_in_at: None,
            payment_session_id: booking.payment_session_id,
            created_at: now,
            updated_at: now,
        };
        bookings.insert(booking.id, booking.clone());
        Ok(booking)
    }

    async fn get_booking(&self, id: Uuid) -> BookResult<Option<Booking>> {
        Ok(lock(&self.bookings, "bookings")?.get(&id).cloned())
    }

    async fn get_booking_by_payment_session(
        &self,
        session_id: &str,
    ) -> BookResult<Option<Booking>> {
        Ok(lock(&self.bookings, "bookings")?
            .values()
            .filter(|b| b.payment_session_id.as_deref() == Some(session_id))
            .max_by_key(|b| b.created_at)
            .cloned())
    }

    async fn list_bookings(
        &self,
        handle: &str,
        status: Option<BookingStatus>,
    ) -> BookResult<Vec<Booking>> {
        let mut bookings: Vec<Booking> = lock(&self.bookings, "bookings")?
            .values()
            .filter(|b| b.handle == handle)
            .filter(|b| status.is_none_or(|s| b.status == s))
            .cloned()
            .collect();
        bookings.sort_by_key(|b| b.created_at);
        Ok(bookings)
    }

    async fn has_active_booking(&self, slot_id: Uuid) -> BookResult<bool> {
        Ok(lock(&self.bookings, "bookings")?
            .values()
            .any(|b| b.slot_id == Some(slot_id) && b.status.is_active()))
    }

    async fn transition_status(&self, id: Uuid, to: BookingStatus) -> BookResult<Option<Booking>> {
        let mut bookings = lock(&self.bookings, "bookings")?;
        Ok(match bookings.get_mut(&id) {
            Some(booking) if to.predecessors().contains(&booking.status) => {
                booking.status = to;
                booking.updated_at = Utc::now();
                Some(booking.clone())
            }
            _ => None,
        })
    }

    async fn mark_checked_in(&self, id: Uuid, at: DateTime<Utc>) -> BookResult<Option<Booking>> {
        let mut bookings = lock(&self.bookings, "bookings")?;
        Ok(match bookings.get_mut(&id) {
            Some(booking) if booking.status == BookingStatus::Confirmed && !booking.checked_in => {
                booking.checked_in = true;
                booking.checked_in_at = Some(at);
                booking.updated_at = at;
                Some(booking.clone())
            }
            _ => None,
        })
    }

    async fn delete_booking(&self, id: Uuid) -> BookResult<Option<Booking>> {
        Ok(lock(&self.bookings, "bookings")?.remove(&id))
    }
}
