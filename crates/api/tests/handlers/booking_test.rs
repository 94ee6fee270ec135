use axum::http::StatusCode;
use pretty_assertions::assert_eq;
use serde_json::Value;
use slotbook_core::models::booking::{BookingStatus, PublicBookingView};
use uuid::Uuid;

use crate::test_utils::{HANDLE, TestContext, booking_body, nine_am};

#[test_log::test(tokio::test)]
async fn test_create_booking_claims_slot() {
    let ctx = TestContext::new().await;

    let booking = ctx.create_booking("Ada").await;

    assert_eq!(booking.status, BookingStatus::Pending);
    assert_eq!(booking.slot_id, Some(ctx.slot.id));
    assert_eq!(booking.amount_cents, 8500);
    assert!(!ctx.slot_is_free().await);
}

#[test_log::test(tokio::test)]
async fn test_second_create_for_same_slot_conflicts() {
    let ctx = TestContext::new().await;
    ctx.create_booking("Ada").await;

    let response = ctx
        .server
        .post("/api/bookings")
        .json(&booking_body(HANDLE, Some(ctx.slot.id), "Grace"))
        .await;

    response.assert_status(StatusCode::CONFLICT);
    let body = response.json::<Value>();
    assert!(body["error"].as_str().unwrap().starts_with("Conflict"));
}

#[test_log::test(tokio::test)]
async fn test_create_with_missing_fields_is_bad_request() {
    let ctx = TestContext::new().await;
    let mut body = booking_body(HANDLE, Some(ctx.slot.id), "Ada");
    body["customer_email"] = Value::String("not-an-email".to_string());

    let response = ctx.server.post("/api/bookings").json(&body).await;

    response.assert_status(StatusCode::BAD_REQUEST);
    assert!(ctx.slot_is_free().await);
}

#[test_log::test(tokio::test)]
async fn test_create_for_other_providers_slot_is_forbidden() {
    let ctx = TestContext::new().await;

    let response = ctx
        .server
        .post("/api/bookings")
        .json(&booking_body("someone-else", Some(ctx.slot.id), "Ada"))
        .await;

    response.assert_status(StatusCode::FORBIDDEN);
    assert!(ctx.slot_is_free().await);
}

#[test_log::test(tokio::test)]
async fn test_create_for_unknown_slot_is_not_found() {
    let ctx = TestContext::new().await;

    let response = ctx
        .server
        .post("/api/bookings")
        .json(&booking_body(HANDLE, Some(Uuid::new_v4()), "Ada"))
        .await;

    response.assert_status_not_found();
}

#[test_log::test(tokio::test)]
async fn test_public_view_hides_contact_details() {
    let ctx = TestContext::new().await;
    let booking = ctx.create_booking("Ada").await;

    let response = ctx.server.get(&format!("/api/bookings/{}", booking.id)).await;

    response.assert_status_ok();
    let raw = response.json::<Value>();
    assert!(raw.get("customer_email").is_none());
    assert!(raw.get("customer_phone").is_none());
    assert!(raw.get("customer_name").is_none());

    let view = response.json::<PublicBookingView>();
    assert_eq!(view.id, booking.id);
    assert_eq!(view.status, BookingStatus::Pending);
    assert_eq!(view.start, Some(nine_am()));
}

#[test_log::test(tokio::test)]
async fn test_lookup_by_payment_session() {
    let ctx = TestContext::new().await;
    let booking = ctx.create_booking("Ada").await;

    let response = ctx.server.get("/api/payment-sessions/cs_ada/booking").await;
    response.assert_status_ok();
    assert_eq!(response.json::<PublicBookingView>().id, booking.id);

    ctx.server
        .get("/api/payment-sessions/cs_unknown/booking")
        .await
        .assert_status_not_found();
}

#[test_log::test(tokio::test)]
async fn test_calendar_requires_confirmation() {
    let ctx = TestContext::new().await;
    let booking = ctx.create_booking("Ada").await;
    let path = format!("/api/bookings/{}/calendar.ics", booking.id);

    ctx.server.get(&path).await.assert_status(StatusCode::CONFLICT);

    ctx.confirm(booking.id).await;
    let response = ctx.server.get(&path).await;

    response.assert_status_ok();
    assert_eq!(
        response.header("content-type").to_str().unwrap(),
        "text/calendar; charset=utf-8"
    );
    let disposition = response.header("content-disposition");
    assert!(
        disposition
            .to_str()
            .unwrap()
            .contains(&format!("booking-{}.ics", booking.id))
    );

    let document = response.text();
    assert!(document.starts_with("BEGIN:VCALENDAR\r\n"));
    assert!(document.contains("DTSTART:20310303T090000Z\r\n"));
    assert!(document.contains("DTEND:20310303T093000Z\r\n"));
    assert!(document.contains(r"SUMMARY:Colour & cut"));
    assert!(document.ends_with("END:VCALENDAR\r\n"));
}

#[test_log::test(tokio::test)]
async fn test_malformed_booking_id_is_rejected() {
    let ctx = TestContext::new().await;

    let response = ctx.server.get("/api/bookings/not-a-uuid").await;

    response.assert_status(StatusCode::BAD_REQUEST);
}
