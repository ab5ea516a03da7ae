use axum::{
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use shared::ErrorResponse;
use tracing::error;

use crate::domain::LibraryError;

fn status_for(err: &LibraryError) -> StatusCode {
    match err {
        LibraryError::Validation(_) => StatusCode::BAD_REQUEST,
        LibraryError::NotFound(_) => StatusCode::NOT_FOUND,
        LibraryError::Conflict(_) => StatusCode::BAD_REQUEST,
        LibraryError::Storage(_) => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

impl IntoResponse for LibraryError {
    fn into_response(self) -> Response {
        let status = status_for(&self);
        let message = match self {
            LibraryError::Storage(err) => {
                // Do not leak storage details to clients.
                error!("Storage failure: {:#}", err);
                "Internal server error".to_string()
            }
            other => other.to_string(),
        };
        (status, Json(ErrorResponse::new(message))).into_response()
    }
}

/// Fallback for paths no router claims
pub async fn not_found() -> LibraryError {
    LibraryError::NotFound("Not found".to_string())
}
