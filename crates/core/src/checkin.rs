use std::sync::Arc;

use chrono::Utc;
use tracing::info;
use uuid::Uuid;

use crate::errors::{BookError, BookResult, CheckinRejection};
use crate::lifecycle::booking_not_found;
use crate::models::booking::{Booking, BookingStatus, CheckinOutcome, CheckinResponse};
use crate::store::BookingStore;

/// Records arrival against confirmed bookings. The only writer of the
/// checked-in fields.
#[derive(Clone)]
pub struct CheckinGate {
    bookings: Arc<dyn BookingStore>,
}

impl CheckinGate {
    pub fn new(bookings: Arc<dyn BookingStore>) -> Self {
        Self { bookings }
    }

    pub async fn checkin(&self, handle: &str, id: Uuid) -> BookResult<CheckinResponse> {
        let booking = self.load(id).await?;
        booking.ensure_owned_by(handle)?;
        if let Some(settled) = settled(booking)? {
            return Ok(settled);
        }

        match self.bookings.mark_checked_in(id, Utc::now()).await? {
            Some(booking) => {
                info!(booking_id = %id, "customer checked in");
                Ok(CheckinResponse {
                    outcome: CheckinOutcome::CheckedIn,
                    booking,
                })
            }
            None => {
                // Someone else changed the row between our read and write.
                let current = self.load(id).await?;
                settled(current)?.ok_or_else(|| {
                    BookError::CheckinRejected(CheckinRejection::NotConfirmed)
                })
            }
        }
    }

    async fn load(&self, id: Uuid) -> BookResult<Booking> {
        self.bookings
            .get_booking(id)
            .await?
            .ok_or_else(|| booking_not_found(id))
    }
}

/// `Ok(None)` means the booking can still be checked in.
fn settled(booking: Booking) -> BookResult<Option<CheckinResponse>> {
    match booking.status {
        BookingStatus::Pending => Err(BookError::CheckinRejected(CheckinRejection::NotConfirmed)),
        BookingStatus::Cancelled => Err(BookError::CheckinRejected(CheckinRejection::Cancelled)),
        BookingStatus::Confirmed if booking.checked_in => Ok(Some(CheckinResponse {
            outcome: CheckinOutcome::AlreadyCheckedIn,
            booking,
        })),
        BookingStatus::Confirmed => Ok(None),
    }
}
