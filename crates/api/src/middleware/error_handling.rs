//! # Error Handling Middleware
//!
//! Maps domain errors to HTTP status codes and a JSON body of the form
//! `{"error": "<message>"}`, so every endpoint reports failures the same way.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use kickoff_core::errors::KickoffError;
use serde_json::json;

/// Application error wrapper that provides HTTP status code mapping
///
/// # Example
///
/// ```
/// use axum::Json;
/// use kickoff_api::middleware::error_handling::AppError;
/// use kickoff_core::errors::KickoffError;
///
/// async fn handler(id: i64) -> Result<Json<i64>, AppError> {
///     if id < 0 {
///         return Err(AppError(KickoffError::not_found("Field", id)));
///     }
///     Ok(Json(id))
/// }
/// # fn main() {}
/// ```
#[derive(Debug)]
pub struct AppError(pub KickoffError);

impl AppError {
    pub fn status(&self) -> StatusCode {
        match &self.0 {
            KickoffError::NotFound(_) => StatusCode::NOT_FOUND,
            KickoffError::Validation(_) => StatusCode::BAD_REQUEST,
            KickoffError::InvalidState(_) => StatusCode::BAD_REQUEST,
            KickoffError::Authentication(_) => StatusCode::UNAUTHORIZED,
            KickoffError::Forbidden(_) => StatusCode::FORBIDDEN,
            KickoffError::Conflict(_) => StatusCode::CONFLICT,
            KickoffError::Database(_) => StatusCode::INTERNAL_SERVER_ERROR,
            KickoffError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();

        if status.is_server_error() {
            tracing::error!(error = ?self.0, "Request failed");
        } else {
            tracing::debug!(%status, error = %self.0, "Request rejected");
        }

        let body = Json(json!({ "error": self.0.to_string() }));
        (status, body).into_response()
    }
}

/// Allows `?` on `KickoffResult` inside handlers returning `Result<T, AppError>`.
impl From<KickoffError> for AppError {
    fn from(err: KickoffError) -> Self {
        AppError(err)
    }
}

/// Wraps infrastructure failures as database errors.
impl From<eyre::Report> for AppError {
    fn from(err: eyre::Report) -> Self {
        AppError(KickoffError::Database(err))
    }
}

/// Maps a KickoffError to an HTTP response
pub fn map_error(err: KickoffError) -> Response {
    AppError(err).into_response()
}
