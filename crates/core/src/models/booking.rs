use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::errors::{BookError, BookResult};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BookingStatus {
    Pending,
    Confirmed,
    Cancelled,
}

impl BookingStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            BookingStatus::Pending => "pending",
            BookingStatus::Confirmed => "confirmed",
            BookingStatus::Cancelled => "cancelled",
        }
    }

    /// Pending and confirmed bookings hold an exclusive claim on their slot.
    pub fn is_active(&self) -> bool {
        !matches!(self, BookingStatus::Cancelled)
    }

    /// Statuses a booking may be in for a conditional transition to `self`.
    pub fn predecessors(&self) -> &'static [BookingStatus] {
        match self {
            BookingStatus::Pending => &[],
            BookingStatus::Confirmed => &[BookingStatus::Pending],
            BookingStatus::Cancelled => &[BookingStatus::Pending, BookingStatus::Confirmed],
        }
    }
}

impl fmt::Display for BookingStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for BookingStatus {
    type Err = BookError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(BookingStatus::Pending),
            "confirmed" => Ok(BookingStatus::Confirmed),
            "cancelled" => Ok(BookingStatus::Cancelled),
            other => Err(BookError::Validation(format!("unknown booking status: {other}"))),
        }
    }
}

/// Provider view of a reservation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Booking {
    pub id: Uuid,
    pub handle: String,
    /// `None` for walk-ins.
    pub slot_id: Option<Uuid>,
    pub customer_name: String,
    pub customer_email: String,
    pub customer_phone: Option<String>,
    pub item: Option<String>,
    pub amount_cents: i64,
    pub status: BookingStatus,
    pub checked_in: bool,
    pub checked_in_at: Option<DateTime<Utc>>,
    pub payment_session_id: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Booking {
    pub fn ensure_owned_by(&self, handle: &str) -> BookResult<()> {
        if self.handle == handle {
            Ok(())
        } else {
            Err(BookError::OwnershipMismatch(format!(
                "booking {} does not belong to provider {}",
                self.id, handle
            )))
        }
    }
}

/// Fields written when a booking row is created. The store assigns the id
/// and timestamps.
#[derive(Debug, Clone, PartialEq)]
pub struct NewBooking {
    pub handle: String,
    pub slot_id: Option<Uuid>,
    pub customer_name: String,
    pub customer_email: String,
    pub customer_phone: Option<String>,
    pub item: Option<String>,
    pub amount_cents: i64,
    pub payment_session_id: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateBookingRequest {
    pub handle: String,
    pub slot_id: Option<Uuid>,
    pub customer_name: String,
    pub customer_email: String,
    pub customer_phone: Option<String>,
    pub item: Option<String>,
    #[serde(default)]
    pub amount_cents: i64,
    pub payment_session_id: Option<String>,
}

fn required(value: &str, field: &str) -> BookResult<()> {
    if value.trim().is_empty() {
        Err(BookError::Validation(format!("{field} is required")))
    } else {
        Ok(())
    }
}

impl CreateBookingRequest {
    pub fn validate(&self) -> BookResult<()> {
        required(&self.handle, "handle")?;
        required(&self.customer_name, "customer_name")?;
        required(&self.customer_email, "customer_email")?;
        if !self.customer_email.contains('@') {
            return Err(BookError::Validation(format!(
                "customer_email {:?} is not an email address",
                self.customer_email
            )));
        }
        if self.amount_cents < 0 {
            return Err(BookError::Validation("amount_cents must not be negative".to_string()));
        }
        Ok(())
    }

    pub fn into_new_booking(self) -> NewBooking {
        fn non_blank(value: Option<String>) -> Option<String> {
            value.filter(|v| !v.trim().is_empty())
        }

        NewBooking {
            handle: self.handle,
            slot_id: self.slot_id,
            customer_name: self.customer_name.trim().to_string(),
            customer_email: self.customer_email.trim().to_string(),
            customer_phone: non_blank(self.customer_phone),
            item: non_blank(self.item),
            amount_cents: self.amount_cents,
            payment_session_id: non_blank(self.payment_session_id),
        }
    }
}

/// What a customer may see about a booking: no contact details.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PublicBookingView {
    pub id: Uuid,
    pub handle: String,
    pub status: BookingStatus,
    pub item: Option<String>,
    pub start: Option<DateTime<Utc>>,
    pub end: Option<DateTime<Utc>>,
    pub checked_in: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CheckinOutcome {
    CheckedIn,
    AlreadyCheckedIn,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CheckinResponse {
    pub outcome: CheckinOutcome,
    pub booking: Booking,
}
