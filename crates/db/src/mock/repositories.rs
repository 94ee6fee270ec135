use async_trait::async_trait;
use chrono::{DateTime, Utc};
use mockall::mock;
use slotbook_core::{
    errors::BookResult,
    models::{
        booking::{Booking, BookingStatus, NewBooking},
        slot::{ClaimOutcome, NewSlot, Slot},
    },
    store::{BookingStore, SlotStore},
};
use uuid::Uuid;

// Mock stores for failure injection in tests
mock! {
    pub SlotRepo {}

    #[async_trait]
    impl SlotStore for SlotRepo {
        async fn insert_slot(&self, slot: NewSlot) -> BookResult<Slot>;

        async fn get_slot(&self, id: Uuid) -> BookResult<Option<Slot>>;

        async fn list_slots(
            &self,
            handle: &str,
            from: DateTime<Utc>,
            free_only: bool,
        ) -> BookResult<Vec<Slot>>;

        async fn try_claim(&self, id: Uuid) -> BookResult<ClaimOutcome>;

        async fn mark_free(&self, id: Uuid) -> BookResult<bool>;
    }
}

mock! {
    pub BookingRepo {}

    #[async_trait]
    impl BookingStore for BookingRepo {
        async fn insert_booking(&self, booking: NewBooking) -> BookResult<Booking>;

        async fn get_booking(&self, id: Uuid) -> BookResult<Option<Booking>>;

        async fn get_booking_by_payment_session(
            &self,
            session_id: &str,
        ) -> BookResult<Option<Booking>>;

        async fn list_bookings(
            &self,
            handle: &str,
            status: Option<BookingStatus>,
        ) -> BookResult<Vec<Booking>>;

        async fn has_active_booking(&self, slot_id: Uuid) -> BookResult<bool>;

        async fn transition_status(
            &self,
            id: Uuid,
            to: BookingStatus,
        ) -> BookResult<Option<Booking>>;

        async fn mark_checked_in(
            &self,
            id: Uuid,
            at: DateTime<Utc>,
        ) -> BookResult<Option<Booking>>;

        async fn delete_booking(&self, id: Uuid) -> BookResult<Option<Booking>>;
    }
}
