use axum::http::StatusCode;
use pretty_assertions::assert_eq;
use serde_json::Value;
use slotbook_core::models::{
    booking::{Booking, BookingStatus, CheckinOutcome, CheckinResponse},
    slot::SlotResponse,
};
use uuid::Uuid;

use crate::test_utils::{HANDLE, TestContext, booking_body};

fn booking_path(id: Uuid) -> String {
    format!("/api/providers/{HANDLE}/bookings/{id}")
}

#[test_log::test(tokio::test)]
async fn test_confirm_then_checkin() {
    let ctx = TestContext::new().await;
    let booking = ctx.create_booking("Ada").await;

    let confirmed = ctx
        .server
        .post(&format!("{}/confirm", booking_path(booking.id)))
        .await
        .json::<Booking>();
    assert_eq!(confirmed.status, BookingStatus::Confirmed);

    let first = ctx
        .server
        .post(&format!("{}/checkin", booking_path(booking.id)))
        .await;
    first.assert_status_ok();
    let first = first.json::<CheckinResponse>();
    assert_eq!(first.outcome, CheckinOutcome::CheckedIn);
    assert!(first.booking.checked_in);
    assert!(first.booking.checked_in_at.is_some());

    let second = ctx
        .server
        .post(&format!("{}/checkin", booking_path(booking.id)))
        .await
        .json::<CheckinResponse>();
    assert_eq!(second.outcome, CheckinOutcome::AlreadyCheckedIn);
    assert_eq!(second.booking.checked_in_at, first.booking.checked_in_at);
}

#[test_log::test(tokio::test)]
async fn test_checkin_of_pending_booking_is_rejected() {
    let ctx = TestContext::new().await;
    let booking = ctx.create_booking("Ada").await;

    let response = ctx
        .server
        .post(&format!("{}/checkin", booking_path(booking.id)))
        .await;

    response.assert_status(StatusCode::UNPROCESSABLE_ENTITY);
}

#[test_log::test(tokio::test)]
async fn test_cancel_frees_slot_for_next_customer() {
    let ctx = TestContext::new().await;
    let booking = ctx.create_booking("Ada").await;

    let cancelled = ctx
        .server
        .post(&format!("{}/cancel", booking_path(booking.id)))
        .await
        .json::<Booking>();
    assert_eq!(cancelled.status, BookingStatus::Cancelled);
    assert!(ctx.slot_is_free().await);

    ctx.server
        .post(&format!("{}/cancel", booking_path(booking.id)))
        .await
        .assert_status(StatusCode::CONFLICT);
    ctx.server
        .post(&format!("{}/confirm", booking_path(booking.id)))
        .await
        .assert_status(StatusCode::CONFLICT);

    let next = ctx.create_booking("Grace").await;
    assert_eq!(next.slot_id, Some(ctx.slot.id));
}

#[test_log::test(tokio::test)]
async fn test_delete_active_booking_frees_slot() {
    let ctx = TestContext::new().await;
    let booking = ctx.create_booking("Ada").await;

    ctx.server
        .delete(&booking_path(booking.id))
        .await
        .assert_status(StatusCode::NO_CONTENT);

    assert!(ctx.slot_is_free().await);
    ctx.server
        .get(&booking_path(booking.id))
        .await
        .assert_status_not_found();
}

#[test_log::test(tokio::test)]
async fn test_other_provider_cannot_touch_booking() {
    let ctx = TestContext::new().await;
    let booking = ctx.create_booking("Ada").await;
    let foreign = format!("/api/providers/intruder/bookings/{}", booking.id);

    ctx.server.get(&foreign).await.assert_status(StatusCode::FORBIDDEN);
    ctx.server
        .post(&format!("{foreign}/cancel"))
        .await
        .assert_status(StatusCode::FORBIDDEN);
    ctx.server
        .delete(&foreign)
        .await
        .assert_status(StatusCode::FORBIDDEN);

    assert!(!ctx.slot_is_free().await);
}

#[test_log::test(tokio::test)]
async fn test_provider_view_includes_contact_details() {
    let ctx = TestContext::new().await;
    let booking = ctx.create_booking("Ada").await;

    let response = ctx.server.get(&booking_path(booking.id)).await;

    response.assert_status_ok();
    let body = response.json::<Value>();
    assert_eq!(body["customer_email"], "ada@example.com");
    assert_eq!(body["customer_phone"], "+1 555 0100");
}

#[test_log::test(tokio::test)]
async fn test_list_bookings_filters_by_status() {
    let ctx = TestContext::new().await;
    let first = ctx.create_booking("Ada").await;
    ctx.confirm(first.id).await;

    let walk_in = ctx
        .server
        .post("/api/bookings")
        .json(&booking_body(HANDLE, None, "Grace"))
        .await;
    walk_in.assert_status(StatusCode::CREATED);

    let all = ctx
        .server
        .get(&format!("/api/providers/{HANDLE}/bookings"))
        .await
        .json::<Vec<Booking>>();
    assert_eq!(all.len(), 2);

    let confirmed = ctx
        .server
        .get(&format!("/api/providers/{HANDLE}/bookings"))
        .add_query_param("status", "confirmed")
        .await
        .json::<Vec<Booking>>();
    assert_eq!(confirmed.len(), 1);
    assert_eq!(confirmed[0].id, first.id);
}

#[test_log::test(tokio::test)]
async fn test_list_slots_free_only() {
    let ctx = TestContext::new().await;
    let path = format!("/api/providers/{HANDLE}/slots");

    let free = ctx
        .server
        .get(&path)
        .add_query_param("free_only", true)
        .await
        .json::<Vec<SlotResponse>>();
    assert_eq!(free.len(), 1);
    assert_eq!(free[0].id, ctx.slot.id);

    ctx.create_booking("Ada").await;

    let free = ctx
        .server
        .get(&path)
        .add_query_param("free_only", true)
        .await
        .json::<Vec<SlotResponse>>();
    assert!(free.is_empty());

    let all = ctx.server.get(&path).await.json::<Vec<SlotResponse>>();
    assert_eq!(all.len(), 1);
    assert!(!all[0].available);
}
