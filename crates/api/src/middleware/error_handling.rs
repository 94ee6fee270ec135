//! # Error Handling Middleware
//!
//! Maps `BookError` onto HTTP status codes and a JSON body of the form
//! `{"error": "<message>"}`. Conflicts and invalid transitions are ordinary
//! outcomes of the booking flow and are answered with 409, not 5xx.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use slotbook_core::errors::BookError;

/// Application error wrapper that provides HTTP status code mapping
///
/// # Example
///
/// ```
/// use axum::Json;
/// use slotbook_api::middleware::error_handling::AppError;
/// use slotbook_core::errors::BookError;
///
/// async fn handler(found: bool) -> Result<Json<&'static str>, AppError> {
///     if !found {
///         return Err(AppError(BookError::NotFound("booking 42".to_string())));
///     }
///     Ok(Json("ok"))
/// }
/// # fn main() {}
/// ```
#[derive(Debug)]
pub struct AppError(pub BookError);

impl AppError {
    pub fn status(&self) -> StatusCode {
        match &self.0 {
            BookError::NotFound(_) => StatusCode::NOT_FOUND,
            BookError::Conflict(_) => StatusCode::CONFLICT,
            BookError::InvalidTransition(_) => StatusCode::CONFLICT,
            BookError::NotConfirmed(_) => StatusCode::CONFLICT,
            BookError::CheckinRejected(_) => StatusCode::UNPROCESSABLE_ENTITY,
            BookError::OwnershipMismatch(_) => StatusCode::FORBIDDEN,
            BookError::Validation(_) => StatusCode::BAD_REQUEST,
            BookError::Dependency(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        if let BookError::Dependency(report) = &self.0 {
            tracing::error!("Dependency failure: {:?}", report);
        } else {
            tracing::debug!("Request rejected with {}: {}", status, self.0);
        }

        let message = self.0.to_string();
        let body = Json(json!({ "error": message }));

        (status, body).into_response()
    }
}

/// Allows `?` on `BookResult` inside handlers.
impl From<BookError> for AppError {
    fn from(err: BookError) -> Self {
        AppError(err)
    }
}

impl From<eyre::Report> for AppError {
    fn from(err: eyre::Report) -> Self {
        AppError(BookError::Dependency(err))
    }
}

/// Maps a BookError to an HTTP response
pub fn map_error(err: BookError) -> Response {
    AppError(err).into_response()
}
