#![allow(dead_code)]

use std::sync::Arc;

use axum_test::TestServer;
use chrono::{DateTime, Duration, TimeZone, Utc};
use serde_json::{Value, json};
use slotbook_api::{ApiState, build_router};
use slotbook_core::{
    Services,
    models::{
        booking::Booking,
        slot::{NewSlot, Slot},
    },
    store::{SlotStore, memory::InMemoryStore},
};
use uuid::Uuid;

pub const HANDLE: &str = "salon";

pub fn nine_am() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2031, 3, 3, 9, 0, 0).unwrap()
}

pub struct TestContext {
    pub server: TestServer,
    pub store: Arc<InMemoryStore>,
    pub slot: Slot,
}

impl TestContext {
    /// Router over an in-memory store with one free 09:00-09:30 slot.
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
            server: server_for(services),
            store,
            slot,
        }
    }

    pub async fn create_booking(&self, name: &str) -> Booking {
        let response = self
            .server
            .post("/api/bookings")
            .json(&booking_body(HANDLE, Some(self.slot.id), name))
            .await;
        response.assert_status(axum::http::StatusCode::CREATED);
        response.json::<Booking>()
    }

    pub async fn confirm(&self, id: Uuid) {
        self.server
            .post(&format!("/api/providers/{HANDLE}/bookings/{id}/confirm"))
            .await
            .assert_status_ok();
    }

    pub async fn slot_is_free(&self) -> bool {
        self.store
            .get_slot(self.slot.id)
            .await
            .expect("Failed to read slot")
            .expect("slot exists")
            .available
    }
}

pub fn server_for(services: Services) -> TestServer {
    let state = Arc::new(ApiState { services });
    TestServer::new(build_router(state)).expect("Failed to start test server")
}

pub fn booking_body(handle: &str, slot_id: Option<Uuid>, name: &str) -> Value {
    json!({
        "handle": handle,
        "slot_id": slot_id,
        "customer_name": name,
        "customer_email": format!("{}@example.com", name.to_lowercase()),
        "customer_phone": "+1 555 0100",
        "item": "Colour & cut",
        "amount_cents": 8500,
        "payment_session_id": format!("cs_{}", name.to_lowercase()),
    })
}
