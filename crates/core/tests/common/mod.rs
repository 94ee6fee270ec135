#![allow(dead_code)]

use std::sync::Arc;

use chrono::{DateTime, Duration, TimeZone, Utc};
use slotbook_core::{
    Services,
    models::{
        booking::{Booking, CreateBookingRequest},
        slot::{NewSlot, Slot},
    },
    store::{SlotStore, memory::InMemoryStore},
};
use uuid::Uuid;

pub const HANDLE: &str = "h";

pub fn nine_am() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2030, 5, 6, 9, 0, 0).unwrap()
}

pub struct Fixture {
    pub services: Services,
    pub store: Arc<InMemoryStore>,
    pub slot: Slot,
}

impl Fixture {
    /// One free 09:00-09:30 slot owned by `HANDLE`.
    pub async fn new() -> Self {
        let (services, store) = Services::in_memory();
        let slot = store
            .insert_slot(NewSlot {
                handle: HANDLE.to_string(),
                staff_id: None,
                start_time: nine_am(),
                end_time: nine_am() + Duration::minutes(30),
            })
            .await
            .expect("Failed to insert slot");
        Self {
            services,
            store,
            slot,
        }
    }

    pub async fn slot_is_free(&self) -> bool {
        self.services
            .bookings
            .allocator()
            .is_free(self.slot.id)
            .await
            .expect("Failed to read slot")
    }

    pub async fn create(&self, name: &str) -> Booking {
        self.services
            .bookings
            .create(request(HANDLE, Some(self.slot.id), name))
            .await
            .expect("Failed to create booking")
    }

    pub async fn create_confirmed(&self, name: &str) -> Booking {
        let booking = self.create(name).await;
        self.services
            .bookings
            .confirm(HANDLE, booking.id)
            .await
            .expect("Failed to confirm booking")
    }

    pub async fn create_cancelled(&self, name: &str) -> Booking {
        let booking = self.create(name).await;
        self.services
            .bookings
            .cancel(HANDLE, booking.id)
            .await
            .expect("Failed to cancel booking")
    }
}

pub fn request(handle: &str, slot_id: Option<Uuid>, name: &str) -> CreateBookingRequest {
    CreateBookingRequest {
        handle: handle.to_string(),
        slot_id,
        customer_name: name.to_string(),
        customer_email: format!("{}@example.com", name.to_lowercase()),
        customer_phone: None,
        item: Some("Haircut".to_string()),
        amount_cents: 2500,
        payment_session_id: None,
    }
}
