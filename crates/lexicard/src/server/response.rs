//! JSON envelope and error mapping for the HTTP API.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use tracing::error;

use crate::error::Error;

/// Body returned to clients for any unexpected failure.
pub const INTERNAL_ERROR_MESSAGE: &str = "Internal server error";

/// Body returned when a card id is unknown.
pub const NOT_FOUND_MESSAGE: &str = "Card not found";

/// Success envelope: `{success: true, data}` or `{success: true, message}`.
#[derive(Debug, Serialize)]
pub struct Envelope<T> {
    success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    message: Option<String>,
}

impl<T: Serialize> Envelope<T> {
    /// Wrap a payload.
    #[must_use]
    pub fn data(data: T) -> Json<Self> {
        Json(Self {
            success: true,
            data: Some(data),
            message: None,
        })
    }
}

impl Envelope<()> {
    /// A payload-free success with a human-readable message.
    #[must_use]
    pub fn message(message: impl Into<String>) -> Json<Self> {
        Json(Self {
            success: true,
            data: None,
            message: Some(message.into()),
        })
    }
}

#[derive(Debug, Serialize)]
struct ErrorBody {
    success: bool,
    error: String,
}

/// Error side of every handler.
///
/// Validation errors keep their message, unknown ids become a fixed 404
/// body, and everything else is logged and reported without detail.
#[derive(Debug)]
pub struct ApiError(Error);

impl ApiError {
    /// Shorthand for a 400 with the given message.
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self(Error::validation(message))
    }

    /// HTTP status for this error.
    #[must_use]
    pub fn status(&self) -> StatusCode {
        if self.0.is_validation() {
            StatusCode::BAD_REQUEST
        } else if self.0.is_not_found() {
            StatusCode::NOT_FOUND
        } else {
            StatusCode::INTERNAL_SERVER_ERROR
        }
    }
}

impl From<Error> for ApiError {
    fn from(err: Error) -> Self {
        Self(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let message = match status {
            StatusCode::BAD_REQUEST => self.0.to_string(),
            StatusCode::NOT_FOUND => NOT_FOUND_MESSAGE.to_string(),
            _ => {
                error!("Request failed: {}", self.0);
                INTERNAL_ERROR_MESSAGE.to_string()
            }
        };
        let body = ErrorBody {
            success: false,
            error: message,
        };
        (status, Json(body)).into_response()
    }
}
