//! # Public Booking Handlers
//!
//! Endpoints reachable from a provider's public page. Lookups return
//! `PublicBookingView`, which carries no customer contact details.

use axum::{
    Json,
    extract::{Path, State},
    http::{StatusCode, header},
    response::IntoResponse,
};
use slotbook_core::{
    errors::BookError,
    models::booking::{Booking, CreateBookingRequest, PublicBookingView},
};
use std::sync::Arc;
use uuid::Uuid;

use crate::{ApiState, middleware::error_handling::AppError};

/// Reserves a slot and records a pending booking.
///
/// The operation runs in its own task: if the client disconnects or the
/// request times out, the handler future is dropped but the task still
/// either writes the booking or releases the slot again.
#[axum::debug_handler]
pub async fn create_booking(
    State(state): State<Arc<ApiState>>,
    Json(payload): Json<CreateBookingRequest>,
) -> Result<(StatusCode, Json<Booking>), AppError> {
    let services = state.services.clone();
    let booking = tokio::spawn(async move { services.bookings.create(payload).await })
        .await
        .map_err(|e| BookError::Dependency(eyre::eyre!("create task failed: {}", e)))??;

    Ok((StatusCode::CREATED, Json(booking)))
}

#[axum::debug_handler]
pub async fn get_booking(
    State(state): State<Arc<ApiState>>,
    Path(id): Path<Uuid>,
) -> Result<Json<PublicBookingView>, AppError> {
    let booking = state.services.bookings.get(id).await?;
    let view = state.services.bookings.public_view(booking).await?;

    Ok(Json(view))
}

/// Lets the payment return page find the booking it paid for.
#[axum::debug_handler]
pub async fn get_booking_by_payment_session(
    State(state): State<Arc<ApiState>>,
    Path(session_id): Path<String>,
) -> Result<Json<PublicBookingView>, AppError> {
    let booking = state
        .services
        .bookings
        .find_by_payment_session(&session_id)
        .await?;
    let view = state.services.bookings.public_view(booking).await?;

    Ok(Json(view))
}

#[axum::debug_handler]
pub async fn export_calendar(
    State(state): State<Arc<ApiState>>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    let document = state.services.calendar.export(id).await?;

    Ok((
        [
            (header::CONTENT_TYPE, "text/calendar; charset=utf-8".to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"booking-{}.ics\"", id),
            ),
        ],
        document,
    ))
}
