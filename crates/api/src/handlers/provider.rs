//! # Provider Handlers
//!
//! Dashboard endpoints, all scoped by the `:handle` path segment. The handle
//! is passed down to the engine, which checks ownership on every call.
//! Authenticating the caller as that provider happens in front of this
//! service.

use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use chrono::{DateTime, Utc};
use serde::Deserialize;
use slotbook_core::models::{
    booking::{Booking, BookingStatus, CheckinResponse},
    slot::SlotResponse,
};
use std::sync::Arc;
use uuid::Uuid;

use crate::{ApiState, middleware::error_handling::AppError};

#[derive(Debug, Deserialize)]
pub struct SlotQuery {
    /// Earliest start time to include (default: now)
    pub from: Option<DateTime<Utc>>,

    /// Only return slots that are still free
    #[serde(default)]
    pub free_only: bool,
}

#[derive(Debug, Deserialize)]
pub struct BookingQuery {
    pub status: Option<BookingStatus>,
}

#[axum::debug_handler]
pub async fn list_slots(
    State(state): State<Arc<ApiState>>,
    Path(handle): Path<String>,
    Query(query): Query<SlotQuery>,
) -> Result<Json<Vec<SlotResponse>>, AppError> {
    let from = query.from.unwrap_or_else(Utc::now);
    let slots = state
        .services
        .bookings
        .list_slots(&handle, from, query.free_only)
        .await?;

    Ok(Json(slots.into_iter().map(SlotResponse::from).collect()))
}

#[axum::debug_handler]
pub async fn list_bookings(
    State(state): State<Arc<ApiState>>,
    Path(handle): Path<String>,
    Query(query): Query<BookingQuery>,
) -> Result<Json<Vec<Booking>>, AppError> {
    let bookings = state.services.bookings.list(&handle, query.status).await?;
    Ok(Json(bookings))
}

#[axum::debug_handler]
pub async fn get_booking(
    State(state): State<Arc<ApiState>>,
    Path((handle, id)): Path<(String, Uuid)>,
) -> Result<Json<Booking>, AppError> {
    let booking = state.services.bookings.get_for_provider(&handle, id).await?;
    Ok(Json(booking))
}

#[axum::debug_handler]
pub async fn confirm_booking(
    State(state): State<Arc<ApiState>>,
    Path((handle, id)): Path<(String, Uuid)>,
) -> Result<Json<Booking>, AppError> {
    let booking = state.services.bookings.confirm(&handle, id).await?;
    Ok(Json(booking))
}

/// Cancels and frees the slot. Notifying the customer is left to the caller.
#[axum::debug_handler]
pub async fn cancel_booking(
    State(state): State<Arc<ApiState>>,
    Path((handle, id)): Path<(String, Uuid)>,
) -> Result<Json<Booking>, AppError> {
    let booking = state.services.bookings.cancel(&handle, id).await?;
    Ok(Json(booking))
}

#[axum::debug_handler]
pub async fn delete_booking(
    State(state): State<Arc<ApiState>>,
    Path((handle, id)): Path<(String, Uuid)>,
) -> Result<StatusCode, AppError> {
    state.services.bookings.delete(&handle, id).await?;
    Ok(StatusCode::NO_CONTENT)
}

#[axum::debug_handler]
pub async fn checkin_booking(
    State(state): State<Arc<ApiState>>,
    Path((handle, id)): Path<(String, Uuid)>,
) -> Result<Json<CheckinResponse>, AppError> {
    let response = state.services.checkin.checkin(&handle, id).await?;
    Ok(Json(response))
}
