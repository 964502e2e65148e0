//! Turning storage responses into HTTP responses.
//!
//! Movie endpoints send the storage payload as the bare JSON body (a movie,
//! an array, `{ "error": ... }` or `{ "message": ... }`) with the status the
//! backend chose.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use movies_core::response::MovieResponse;

use crate::error::AppError;

/// HTTP wrapper around a [`MovieResponse`].
#[derive(Debug)]
pub struct StoreReply(pub MovieResponse);

impl IntoResponse for StoreReply {
    fn into_response(self) -> Response {
        let MovieResponse { status, payload } = self.0;
        match StatusCode::from_u16(status) {
            Ok(status) => (status, Json(payload)).into_response(),
            Err(_) => AppError::InternalError(format!("backend answered with status {status}"))
                .into_response(),
        }
    }
}
