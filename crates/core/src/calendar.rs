//! # Calendar export
//!
//! Renders a confirmed booking as an iCalendar (RFC 5545) document holding a
//! single `VEVENT`. Rendering itself is pure; `CalendarExporter` only loads
//! the booking and its slot and enforces the confirmed-only gate.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::errors::{BookError, BookResult};
use crate::lifecycle::booking_not_found;
use crate::models::{
    booking::{Booking, BookingStatus},
    slot::Slot,
};
use crate::store::{BookingStore, SlotStore};

const PRODUCT_ID: &str = "-//slotbook//booking engine//EN";
const MAX_LINE_OCTETS: usize = 75;

#[derive(Clone)]
pub struct CalendarExporter {
    slots: Arc<dyn SlotStore>,
    bookings: Arc<dyn BookingStore>,
}

impl CalendarExporter {
    pub fn new(slots: Arc<dyn SlotStore>, bookings: Arc<dyn BookingStore>) -> Self {
        Self { slots, bookings }
    }

    pub async fn export(&self, booking_id: Uuid) -> BookResult<String> {
        let booking = self
            .bookings
            .get_booking(booking_id)
            .await?
            .ok_or_else(|| booking_not_found(booking_id))?;

        if booking.status != BookingStatus::Confirmed {
            return Err(BookError::NotConfirmed(format!(
                "booking {booking_id} is not confirmed (status {})",
                booking.status
            )));
        }

        let slot_id = booking.slot_id.ok_or_else(|| {
            BookError::NotFound(format!("booking {booking_id} has no slot to export"))
        })?;
        let slot = self
            .slots
            .get_slot(slot_id)
            .await?
            .ok_or_else(|| BookError::NotFound(format!("slot {slot_id} not found")))?;

        Ok(render_event(&booking, &slot))
    }
}

/// Escape a TEXT value: backslash, newline, comma and semicolon.
pub fn escape_text(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    let mut chars = value.chars().peekable();
    while let Some(c) = chars.next() {
        match c {
            '\\' => escaped.push_str("\\\\"),
            ';' => escaped.push_str("\\;"),
            ',' => escaped.push_str("\\,"),
            '\n' => escaped.push_str("\\n"),
            '\r' => {
                if chars.peek() == Some(&'\n') {
                    chars.next();
                }
                escaped.push_str("\\n");
            }
            c => escaped.push(c),
        }
    }
    escaped
}

fn format_utc(at: DateTime<Utc>) -> String {
    at.format("%Y%m%dT%H%M%SZ").to_string()
}

/// Fold a content line to at most 75 octets per physical line, never
/// splitting a UTF-8 sequence.
fn fold_line(line: &str) -> String {
    if line.len() <= MAX_LINE_OCTETS {
        return line.to_string();
    }

    let mut folded = String::with_capacity(line.len() + line.len() / MAX_LINE_OCTETS * 3);
    let mut budget = MAX_LINE_OCTETS;
    let mut used = 0;
    for c in line.chars() {
        if used + c.len_utf8() > budget {
            folded.push_str("\r\n ");
            // The leading space counts against the continuation line.
            budget = MAX_LINE_OCTETS - 1;
            used = 0;
        }
        folded.push(c);
        used += c.len_utf8();
    }
    folded
}

pub fn event_summary(booking: &Booking) -> String {
    match booking.item.as_deref().map(str::trim) {
        Some(item) if !item.is_empty() => item.to_string(),
        _ => format!("Booking with {}", booking.handle),
    }
}

/// Render the event document for `booking` over the window of `slot`.
pub fn render_event(booking: &Booking, slot: &Slot) -> String {
    let description = format!(
        "Booking for {} with {}",
        booking.customer_name, booking.handle
    );

    let lines = [
        "BEGIN:VCALENDAR".to_string(),
        "VERSION:2.0".to_string(),
        format!("PRODID:{PRODUCT_ID}"),
        "CALSCALE:GREGORIAN".to_string(),
        "METHOD:PUBLISH".to_string(),
        "BEGIN:VEVENT".to_string(),
        format!("UID:{}@slotbook", booking.id),
        format!("DTSTAMP:{}", format_utc(booking.updated_at)),
        format!("DTSTART:{}", format_utc(slot.start_time)),
        format!("DTEND:{}", format_utc(slot.end_time)),
        format!("SUMMARY:{}", escape_text(&event_summary(booking))),
        format!("DESCRIPTION:{}", escape_text(&description)),
        "STATUS:CONFIRMED".to_string(),
        "END:VEVENT".to_string(),
        "END:VCALENDAR".to_string(),
    ];

    let mut document = String::new();
    for line in &lines {
        document.push_str(&fold_line(line));
        document.push_str("\r\n");
    }
    document
}
