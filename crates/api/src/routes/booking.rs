use axum::{
    Router,
    routing::{get, post},
};
use std::sync::Arc;

use crate::{ApiState, handlers};

pub fn routes() -> Router<Arc<ApiState>> {
    Router::new()
        .route("/api/bookings", post(handlers::booking::create_booking))
        .route("/api/bookings/:id", get(handlers::booking::get_booking))
        .route(
            "/api/bookings/:id/calendar.ics",
            get(handlers::booking::export_calendar),
        )
        .route(
            "/api/payment-sessions/:session_id/booking",
            get(handlers::booking::get_booking_by_payment_session),
        )
}
