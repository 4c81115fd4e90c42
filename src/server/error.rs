//! API error mapping

use axum::http::StatusCode;
use axum::response::{IntoResponse, Json, Response};
use serde::Serialize;

use crate::error::Error;

#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub message: String,
}

/// Wrapper turning domain errors into HTTP responses
#[derive(Debug)]
pub struct ApiError(pub Error);

impl From<Error> for ApiError {
    fn from(err: Error) -> Self {
        Self(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match &self.0 {
            Error::Validation(msg) => (StatusCode::UNPROCESSABLE_ENTITY, msg.clone()),
            Error::NotFound(_) => (StatusCode::NOT_FOUND, "Not found".to_string()),
            Error::Unsupported(msg) => (StatusCode::FORBIDDEN, msg.clone()),
            Error::StoreUnavailable(_) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "Store unavailable".to_string(),
            ),
            Error::MalformedContent { .. } => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "Invalid content format".to_string(),
            ),
            Error::Io(_) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "Internal server error".to_string(),
            ),
        };

        if status.is_server_error() {
            tracing::error!("Request failed: {}", self.0);
        }

        (status, Json(ErrorBody { message })).into_response()
    }
}
