use std::sync::Arc;

use tracing::debug;
use uuid::Uuid;

use crate::errors::{BookError, BookResult};
use crate::models::slot::ClaimOutcome;
use crate::store::SlotStore;

/// Sole writer of the slot availability flag.
#[derive(Clone)]
pub struct SlotAllocator {
    slots: Arc<dyn SlotStore>,
}

impl SlotAllocator {
    pub fn new(slots: Arc<dyn SlotStore>) -> Self {
        Self { slots }
    }

    /// Claim a free slot. Losing the race is reported as `Conflict` and is
    /// never retried here.
    pub async fn reserve(&self, slot_id: Uuid) -> BookResult<()> {
        match self.slots.try_claim(slot_id).await? {
            ClaimOutcome::Claimed => {
                debug!(%slot_id, "slot reserved");
                Ok(())
            }
            ClaimOutcome::AlreadyClaimed => {
                debug!(%slot_id, "slot already claimed");
                Err(BookError::Conflict(format!("slot {slot_id} is already taken")))
            }
            ClaimOutcome::Missing => Err(BookError::NotFound(format!("slot {slot_id} not found"))),
        }
    }

    /// Mark a slot free. Releasing a free slot is a no-op success.
    pub async fn release(&self, slot_id: Uuid) -> BookResult<()> {
        if self.slots.mark_free(slot_id).await? {
            debug!(%slot_id, "slot released");
            Ok(())
        } else {
            Err(BookError::NotFound(format!("slot {slot_id} not found")))
        }
    }

    /// Advisory only: the answer may be stale as soon as it is returned.
    pub async fn is_free(&self, slot_id: Uuid) -> BookResult<bool> {
        self.slots
            .get_slot(slot_id)
            .await?
            .map(|slot| slot.available)
            .ok_or_else(|| BookError::NotFound(format!("slot {slot_id} not found")))
    }
}
