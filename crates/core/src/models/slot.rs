use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::errors::{BookError, BookResult};

/// A bookable window `[start_time, end_time)` owned by one provider.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Slot {
    pub id: Uuid,
    pub handle: String,
    pub staff_id: Option<Uuid>,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    pub available: bool,
    pub created_at: DateTime<Utc>,
}

impl Slot {
    pub fn ensure_owned_by(&self, handle: &str) -> BookResult<()> {
        if self.handle == handle {
            Ok(())
        } else {
            Err(BookError::OwnershipMismatch(format!(
                "slot {} does not belong to provider {}",
                self.id, handle
            )))
        }
    }
}

/// Insert path used by the availability generator.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewSlot {
    pub handle: String,
    pub staff_id: Option<Uuid>,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
}

impl NewSlot {
    pub fn validate(&self) -> BookResult<()> {
        if self.handle.trim().is_empty() {
            return Err(BookError::Validation("slot handle is required".to_string()));
        }
        if self.end_time <= self.start_time {
            return Err(BookError::Validation(format!(
                "slot end {} must be after start {}",
                self.end_time, self.start_time
            )));
        }
        Ok(())
    }
}

/// Result of the store-level compare-and-swap on the availability flag.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClaimOutcome {
    Claimed,
    AlreadyClaimed,
    Missing,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SlotResponse {
    pub id: Uuid,
    pub staff_id: Option<Uuid>,
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
    pub available: bool,
}

impl From<Slot> for SlotResponse {
    fn from(slot: Slot) -> Self {
        Self {
            id: slot.id,
            staff_id: slot.staff_id,
            start: slot.start_time,
            end: slot.end_time,
            available: slot.available,
        }
    }
}
