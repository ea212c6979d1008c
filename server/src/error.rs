//! HTTP-facing errors.
//!
//! Every error renders as `{"error": "<message>"}`. Store failures are logged
//! with their cause and reach the client only as a generic 500.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use thiserror::Error;
use todo_core::StoreError;

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Body is required")]
    BodyRequired,

    #[error("Invalid ID")]
    InvalidId,

    #[error("Invalid request body")]
    InvalidBody(#[source] serde_json::Error),

    #[error("Internal Server Error")]
    Store(#[from] StoreError),
}

#[derive(Serialize)]
struct ErrorBody {
    error: String,
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::BodyRequired | ApiError::InvalidId | ApiError::InvalidBody(_) => {
                StatusCode::BAD_REQUEST
            }
            ApiError::Store(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match &self {
            ApiError::Store(err) => tracing::error!(error = %err, "store operation failed"),
            ApiError::InvalidBody(err) => tracing::debug!(error = %err, "rejected request body"),
            _ => {}
        }
        let body = ErrorBody {
            error: self.to_string(),
        };
        (self.status(), Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn client_errors_are_400() {
        assert_eq!(ApiError::BodyRequired.status(), StatusCode::BAD_REQUEST);
        assert_eq!(ApiError::InvalidId.status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn store_errors_hide_their_cause() {
        let err = ApiError::from(StoreError::Unavailable("replica set down".to_string()));
        assert_eq!(err.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(err.to_string(), "Internal Server Error");
    }
}
