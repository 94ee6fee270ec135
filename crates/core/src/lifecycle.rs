//! # Booking lifecycle
//!
//! `BookingManager` owns the booking state machine:
//!
//! | From              | Operation | To        | Slot      |
//! |-------------------|-----------|-----------|-----------|
//! | (none)            | create    | pending   | reserve   |
//! | pending           | confirm   | confirmed | -         |
//! | confirmed         | confirm   | confirmed | -         |
//! | pending/confirmed | cancel    | cancelled | release   |
//! | pending/confirmed | delete    | (removed) | release   |
//! | cancelled         | delete    | (removed) | repair    |
//! | cancelled         | confirm   | rejected  | -         |
//! | cancelled         | cancel    | rejected  | repair    |
//!
//! Creation is reserve-then-write. Between the two steps a slot can be
//! claimed with no booking row; if the write fails the slot is released
//! again before the error is returned.
//!
//! Every status change is a conditional update in the store, and only the
//! caller whose update moved a booking into `cancelled` releases its slot.
//! A cancel racing a delete therefore releases once.
//!
//! If that release fails the booking is already `cancelled` and the slot is
//! still claimed. A later cancel or delete of the booking repairs this: the
//! slot is freed when no pending or confirmed booking references it.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use tracing::{error, info, warn};
use uuid::Uuid;

use crate::allocator::SlotAllocator;
use crate::errors::{BookError, BookResult};
use crate::models::{
    booking::{Booking, BookingStatus, CreateBookingRequest, PublicBookingView},
    slot::Slot,
};
use crate::store::{BookingStore, SlotStore};

#[derive(Clone)]
pub struct BookingManager {
    allocator: SlotAllocator,
    slots: Arc<dyn SlotStore>,
    bookings: Arc<dyn BookingStore>,
}

pub(crate) fn booking_not_found(id: Uuid) -> BookError {
    BookError::NotFound(format!("booking {id} not found"))
}

impl BookingManager {
    pub fn new(slots: Arc<dyn SlotStore>, bookings: Arc<dyn BookingStore>) -> Self {
        Self {
            allocator: SlotAllocator::new(slots.clone()),
            slots,
            bookings,
        }
    }

    pub fn allocator(&self) -> &SlotAllocator {
        &self.allocator
    }

    pub async fn create(&self, request: CreateBookingRequest) -> BookResult<Booking> {
        request.validate()?;

        let slot_id = request.slot_id;
        if let Some(slot_id) = slot_id {
            let slot = self
                .slots
                .get_slot(slot_id)
                .await?
                .ok_or_else(|| BookError::NotFound(format!("slot {slot_id} not found")))?;
            slot.ensure_owned_by(&request.handle)?;
            if !slot.available {
                return Err(BookError::Conflict(format!("slot {slot_id} is already taken")));
            }
            self.allocator.reserve(slot_id).await?;
        }

        match self.bookings.insert_booking(request.into_new_booking()).await {
            Ok(booking) => {
                info!(booking_id = %booking.id, handle = %booking.handle, slot_id = ?booking.slot_id, "booking created");
                Ok(booking)
            }
            Err(err) => {
                // A conflict here means another active booking owns the slot;
                // freeing it would hand that customer's claim away.
                if let Some(slot_id) = slot_id {
                    if !matches!(err, BookError::Conflict(_)) {
                        self.compensate(slot_id, &err).await;
                    }
                }
                Err(err)
            }
        }
    }

    async fn compensate(&self, slot_id: Uuid, cause: &BookError) {
        warn!(%slot_id, %cause, "booking write failed after reserve, releasing slot");
        if let Err(release_err) = self.allocator.release(slot_id).await {
            error!(%slot_id, %release_err, "compensating release failed, slot left claimed");
        }
    }

    pub async fn confirm(&self, handle: &str, id: Uuid) -> BookResult<Booking> {
        let booking = self.get_for_provider(handle, id).await?;
        match booking.status {
            BookingStatus::Confirmed => return Ok(booking),
            BookingStatus::Cancelled => return Err(invalid(&booking, "confirm")),
            BookingStatus::Pending => {}
        }

        if let Some(confirmed) = self
            .bookings
            .transition_status(id, BookingStatus::Confirmed)
            .await?
        {
            info!(booking_id = %id, "booking confirmed");
            return Ok(confirmed);
        }

        // Lost a race; whatever happened in between decides the answer.
        let current = self.get(id).await?;
        match current.status {
            BookingStatus::Confirmed => Ok(current),
            _ => Err(invalid(&current, "confirm")),
        }
    }

    pub async fn cancel(&self, handle: &str, id: Uuid) -> BookResult<Booking> {
        let booking = self.get_for_provider(handle, id).await?;
        if !booking.status.is_active() {
            self.release_stranded(&booking).await?;
            return Err(invalid(&booking, "cancel"));
        }

        match self
            .bookings
            .transition_status(id, BookingStatus::Cancelled)
            .await?
        {
            Some(cancelled) => {
                info!(booking_id = %id, "booking cancelled");
                self.release_for(&cancelled).await?;
                Ok(cancelled)
            }
            None => {
                let current = self.get(id).await?;
                Err(invalid(&current, "cancel"))
            }
        }
    }

    /// Remove a booking permanently, returning the record as it was removed.
    pub async fn delete(&self, handle: &str, id: Uuid) -> BookResult<Booking> {
        let booking = self.get_for_provider(handle, id).await?;

        if booking.status.is_active() {
            // A `None` here means a concurrent cancel won and did the release.
            if let Some(cancelled) = self
                .bookings
                .transition_status(id, BookingStatus::Cancelled)
                .await?
            {
                self.release_for(&cancelled).await?;
            }
        } else {
            self.release_stranded(&booking).await?;
        }

        let removed = self
            .bookings
            .delete_booking(id)
            .await?
            .ok_or_else(|| booking_not_found(id))?;
        info!(booking_id = %id, handle = %removed.handle, "booking deleted");
        Ok(removed)
    }

    async fn release_for(&self, booking: &Booking) -> BookResult<()> {
        let Some(slot_id) = booking.slot_id else {
            return Ok(());
        };
        match self.allocator.release(slot_id).await {
            Ok(()) => Ok(()),
            Err(BookError::NotFound(_)) => {
                warn!(booking_id = %booking.id, %slot_id, "slot vanished before release");
                Ok(())
            }
            Err(err) => {
                error!(booking_id = %booking.id, %slot_id, %err, "slot release failed");
                Err(err)
            }
        }
    }

    /// A cancelled booking whose release failed still holds its slot. Free it,
    /// unless a newer active booking owns the slot by now.
    async fn release_stranded(&self, booking: &Booking) -> BookResult<()> {
        let Some(slot_id) = booking.slot_id else {
            return Ok(());
        };
        if self.bookings.has_active_booking(slot_id).await? {
            return Ok(());
        }
        match self.allocator.is_free(slot_id).await {
            Ok(true) | Err(BookError::NotFound(_)) => Ok(()),
            Ok(false) => {
                warn!(booking_id = %booking.id, %slot_id, "releasing slot held by cancelled booking");
                self.release_for(booking).await
            }
            Err(err) => Err(err),
        }
    }

    pub async fn get(&self, id: Uuid) -> BookResult<Booking> {
        self.bookings
            .get_booking(id)
            .await?
            .ok_or_else(|| booking_not_found(id))
    }

    pub async fn get_for_provider(&self, handle: &str, id: Uuid) -> BookResult<Booking> {
        let booking = self.get(id).await?;
        booking.ensure_owned_by(handle)?;
        Ok(booking)
    }

    /// Lookup used by payment and notification collaborators.
    pub async fn find_by_payment_session(&self, session_id: &str) -> BookResult<Booking> {
        self.bookings
            .get_booking_by_payment_session(session_id)
            .await?
            .ok_or_else(|| {
                BookError::NotFound(format!("no booking for payment session {session_id}"))
            })
    }

    pub async fn public_view(&self, booking: Booking) -> BookResult<PublicBookingView> {
        let slot = match booking.slot_id {
            Some(slot_id) => self.slots.get_slot(slot_id).await?,
            None => None,
        };
        Ok(PublicBookingView {
            id: booking.id,
            handle: booking.handle,
            status: booking.status,
            item: booking.item,
            start: slot.as_ref().map(|s| s.start_time),
            end: slot.as_ref().map(|s| s.end_time),
            checked_in: booking.checked_in,
        })
    }

    pub async fn list(
        &self,
        handle: &str,
        status: Option<BookingStatus>,
    ) -> BookResult<Vec<Booking>> {
        self.bookings.list_bookings(handle, status).await
    }

    pub async fn list_slots(
        &self,
        handle: &str,
        from: DateTime<Utc>,
        free_only: bool,
    ) -> BookResult<Vec<Slot>> {
        self.slots.list_slots(handle, from, free_only).await
    }
}

fn invalid(booking: &Booking, operation: &str) -> BookError {
    BookError::InvalidTransition(format!(
        "cannot {operation} booking {} in status {}",
        booking.id, booking.status
    ))
}
