//! # Error Handling Middleware
//!
//! Maps [`ClinicError`] values to HTTP status codes and a JSON body of the
//! form `{"error": "<message>"}` so every endpoint reports failures the same way.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use clinic_core::errors::ClinicError;
use serde_json::json;
use tracing::error;

/// Application error wrapper that provides HTTP status code mapping
///
/// # Example
///
/// ```
/// use axum::Json;
/// use clinic_api::middleware::error_handling::AppError;
/// use clinic_core::errors::ClinicError;
///
/// async fn handler(name: String) -> Result<Json<String>, AppError> {
///     if name.is_empty() {
///         return Err(AppError(ClinicError::Validation("name is required".into())));
///     }
///     Ok(Json(name))
/// }
/// # fn main() {}
/// ```
#[derive(Debug)]
pub struct AppError(pub ClinicError);

impl AppError {
    pub fn status(&self) -> StatusCode {
        match &self.0 {
            ClinicError::NotFound(_) => StatusCode::NOT_FOUND,
            ClinicError::Validation(_) => StatusCode::BAD_REQUEST,
            ClinicError::SlotFull(_) | ClinicError::Conflict(_) => StatusCode::CONFLICT,
            ClinicError::Store(_) => StatusCode::INTERNAL_SERVER_ERROR,
            ClinicError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            error!("Request failed: {:?}", self.0);
        }

        let body = Json(json!({ "error": self.0.to_string() }));
        (status, body).into_response()
    }
}

/// Allows `?` on `ClinicResult` inside handlers.
impl From<ClinicError> for AppError {
    fn from(err: ClinicError) -> Self {
        AppError(err)
    }
}

/// Untyped failures are treated as store errors.
impl From<eyre::Report> for AppError {
    fn from(err: eyre::Report) -> Self {
        AppError(ClinicError::Store(err))
    }
}

/// Maps a ClinicError to an HTTP response
///
/// # Example
///
/// ```
/// use axum::http::StatusCode;
/// use clinic_api::middleware::error_handling::map_error;
/// use clinic_core::errors::ClinicError;
///
/// let response = map_error(ClinicError::SlotFull("08:00 - 09:00".into()));
/// assert_eq!(response.status(), StatusCode::CONFLICT);
/// ```
pub fn map_error(err: ClinicError) -> Response {
    AppError(err).into_response()
}
