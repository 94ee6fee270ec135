use axum::{
    Router,
    routing::{get, post},
};
use std::sync::Arc;

use crate::{ApiState, handlers};

pub fn routes() -> Router<Arc<ApiState>> {
    Router::new()
        .route(
            "/api/providers/:handle/slots",
            get(handlers::provider::list_slots),
        )
        .route(
            "/api/providers/:handle/bookings",
            get(handlers::provider::list_bookings),
        )
        .route(
            "/api/providers/:handle/bookings/:id",
            get(handlers::provider::get_booking).delete(handlers::provider::delete_booking),
        )
        .route(
            "/api/providers/:handle/bookings/:id/confirm",
            post(handlers::provider::confirm_booking),
        )
        .route(
            "/api/providers/:handle/bookings/:id/cancel",
            post(handlers::provider::cancel_booking),
        )
        .route(
            "/api/providers/:handle/bookings/:id/checkin",
            post(handlers::provider::checkin_booking),
        )
}
