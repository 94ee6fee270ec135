//! # Storage seams
//!
//! The engine talks to durable state only through these two traits. Every
//! mutating method is a single conditional write inside the store: callers
//! never read a row, decide, and write it back.

pub mod memory;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::errors::BookResult;
use crate::models::{
    booking::{Booking, BookingStatus, NewBooking},
    slot::{ClaimOutcome, NewSlot, Slot},
};

#[async_trait]
pub trait SlotStore: Send + Sync {
    async fn insert_slot(&self, slot: NewSlot) -> BookResult<Slot>;

    async fn get_slot(&self, id: Uuid) -> BookResult<Option<Slot>>;

    /// Slots of a provider starting at or after `from`, ordered by start time.
    async fn list_slots(
        &self,
        handle: &str,
        from: DateTime<Utc>,
        free_only: bool,
    ) -> BookResult<Vec<Slot>>;

    /// Flip `available` from `true` to `false` in one atomic step.
    async fn try_claim(&self, id: Uuid) -> BookResult<ClaimOutcome>;

    /// Set `available = true`. Returns `false` when the slot does not exist.
    async fn mark_free(&self, id: Uuid) -> BookResult<bool>;
}

#[async_trait]
pub trait BookingStore: Send + Sync {
    /// Fails with `BookError::Conflict` if another active booking already
    /// references the same slot.
    async fn insert_booking(&self, booking: NewBooking) -> BookResult<Booking>;

    async fn get_booking(&self, id: Uuid) -> BookResult<Option<Booking>>;

    async fn get_booking_by_payment_session(&self, session_id: &str)
    -> BookResult<Option<Booking>>;

    async fn list_bookings(
        &self,
        handle: &str,
        status: Option<BookingStatus>,
    ) -> BookResult<Vec<Booking>>;

    /// Whether a pending or confirmed booking references `slot_id`.
    async fn has_active_booking(&self, slot_id: Uuid) -> BookResult<bool>;

    /// Move the booking to `to` only if its current status is one of
    /// `to.predecessors()`. `None` means the guard did not hold (or the row is
    /// gone); the caller re-reads to find out which.
    async fn transition_status(&self, id: Uuid, to: BookingStatus) -> BookResult<Option<Booking>>;

    /// Set the checked-in fields only on a confirmed, not yet checked-in row.
    async fn mark_checked_in(&self, id: Uuid, at: DateTime<Utc>) -> BookResult<Option<Booking>>;

    /// Remove the row, returning it as it was.
    async fn delete_booking(&self, id: Uuid) -> BookResult<Option<Booking>>;
}
