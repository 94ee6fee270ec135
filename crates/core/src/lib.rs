//! # Slotbook core
//!
//! Slot reservation and booking lifecycle, independent of any transport or
//! database. Durable state is reached through the traits in [`store`];
//! `slotbook-db` implements them for Postgres and [`store::memory`] keeps
//! everything in process.

pub mod allocator;
pub mod calendar;
pub mod checkin;
pub mod errors;
pub mod lifecycle;
pub mod models;
pub mod store;

use std::sync::Arc;

use calendar::CalendarExporter;
use checkin::CheckinGate;
use lifecycle::BookingManager;
use store::{BookingStore, SlotStore, memory::InMemoryStore};

/// The engine's public operations wired to one pair of stores.
#[derive(Clone)]
pub struct Services {
    pub bookings: BookingManager,
    pub checkin: CheckinGate,
    pub calendar: CalendarExporter,
}

impl Services {
    pub fn new(slots: Arc<dyn SlotStore>, bookings: Arc<dyn BookingStore>) -> Self {
        Self {
            bookings: BookingManager::new(slots.clone(), bookings.clone()),
            checkin: CheckinGate::new(bookings.clone()),
            calendar: CalendarExporter::new(slots, bookings),
        }
    }

    /// Services backed by a fresh [`InMemoryStore`], also returned so callers
    /// can seed slots.
    pub fn in_memory() -> (Self, Arc<InMemoryStore>) {
        let store = Arc::new(InMemoryStore::new());
        let services = Self::new(store.clone(), store.clone());
        (services, store)
    }
}
