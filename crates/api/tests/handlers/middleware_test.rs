use std::sync::Arc;

use axum::{body::to_bytes, http::StatusCode};
use pretty_assertions::assert_eq;
use rstest::rstest;
use serde_json::Value;
use slotbook_api::middleware::error_handling::{AppError, map_error};
use slotbook_core::{
    Services,
    errors::{BookError, CheckinRejection},
    store::memory::InMemoryStore,
};
use slotbook_db::mock::repositories::MockBookingRepo;
use uuid::Uuid;

use crate::test_utils::server_for;

#[rstest]
#[case::not_found(BookError::NotFound("booking".into()), StatusCode::NOT_FOUND)]
#[case::conflict(BookError::Conflict("slot taken".into()), StatusCode::CONFLICT)]
#[case::invalid_transition(
    BookError::InvalidTransition("cancelled -> confirmed".into()),
    StatusCode::CONFLICT
)]
#[case::not_confirmed(BookError::NotConfirmed("pending".into()), StatusCode::CONFLICT)]
#[case::checkin_rejected(
    BookError::CheckinRejected(CheckinRejection::Cancelled),
    StatusCode::UNPROCESSABLE_ENTITY
)]
#[case::ownership(BookError::OwnershipMismatch("other".into()), StatusCode::FORBIDDEN)]
#[case::validation(BookError::Validation("email".into()), StatusCode::BAD_REQUEST)]
#[case::dependency(
    BookError::Dependency(eyre::eyre!("connection reset")),
    StatusCode::INTERNAL_SERVER_ERROR
)]
fn test_error_status_mapping(#[case] error: BookError, #[case] expected: StatusCode) {
    assert_eq!(AppError(error).status(), expected);
}

#[tokio::test]
async fn test_error_body_carries_message() {
    let response = map_error(BookError::Conflict("slot 7 is already claimed".to_string()));

    assert_eq!(response.status(), StatusCode::CONFLICT);
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let body: Value = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(body["error"], "Conflict: slot 7 is already claimed");
}

#[test]
fn test_eyre_report_becomes_dependency_failure() {
    let error = AppError::from(eyre::eyre!("pool timed out"));

    assert!(matches!(error.0, BookError::Dependency(_)));
    assert_eq!(error.status(), StatusCode::INTERNAL_SERVER_ERROR);
}

#[test_log::test(tokio::test)]
async fn test_store_failure_is_internal_error() {
    let mut bookings = MockBookingRepo::new();
    bookings
        .expect_get_booking()
        .returning(|_| Err(BookError::Dependency(eyre::eyre!("database unavailable"))));

    let slots = Arc::new(InMemoryStore::new());
    let server = server_for(Services::new(slots, Arc::new(bookings)));

    let response = server.get(&format!("/api/bookings/{}", Uuid::new_v4())).await;

    response.assert_status(StatusCode::INTERNAL_SERVER_ERROR);
    let body = response.json::<Value>();
    assert!(body["error"].as_str().unwrap().contains("database unavailable"));
}
