//! HTTP error response mapping.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;

use domo_domain::error::{DomoError, NotFoundError, ValidationError};

/// JSON error body returned by API endpoints.
#[derive(Serialize)]
struct ErrorBody {
    /// Machine-readable kind (`validation`, `not_found`).
    error: &'static str,
    /// Human-readable, field-level reason.
    message: String,
}

/// Maps [`DomoError`] to an HTTP response with the appropriate status code.
pub struct ApiError(DomoError);

impl From<DomoError> for ApiError {
    fn from(err: DomoError) -> Self {
        Self(err)
    }
}

impl From<ValidationError> for ApiError {
    fn from(err: ValidationError) -> Self {
        Self(err.into())
    }
}

impl From<NotFoundError> for ApiError {
    fn from(err: NotFoundError) -> Self {
        Self(err.into())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match &self.0 {
            DomoError::Validation(_) => StatusCode::UNPROCESSABLE_ENTITY,
            DomoError::NotFound(_) => StatusCode::NOT_FOUND,
        };
        let body = ErrorBody {
            error: self.0.kind(),
            message: self.0.to_string(),
        };
        (status, Json(body)).into_response()
    }
}
