use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use gearbook_core::conflict::LineConflict;
use gearbook_core::error::CoreError;
use gearbook_core::types::{CalendarDate, DbId};
use serde::Serialize;
use serde_json::json;

/// An existing booking that would exceed supply under a lowered item total,
/// enriched with the project name for the operator-facing warning.
#[derive(Debug, Clone, Serialize)]
pub struct QuantityWarning {
    pub booking_id: DbId,
    pub project_name: String,
    pub start_date: CalendarDate,
    pub end_date: CalendarDate,
    pub requested: i32,
    pub available_after: i32,
}

/// Application-level error type for HTTP handlers.
///
/// Wraps [`CoreError`] for domain errors and adds HTTP-specific variants,
/// including the two validation outcomes of the booking conflict checks.
/// Implements [`IntoResponse`] to produce consistent JSON error responses.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// A domain-level error from `gearbook_core`.
    #[error(transparent)]
    Core(#[from] CoreError),

    /// A database error from sqlx.
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// A bad request with a human-readable message.
    #[error("Bad request: {0}")]
    BadRequest(String),

    /// A booking save was refused because one or more lines exceed supply.
    /// Hard block: there is no override for this case.
    #[error("Booking conflicts with existing reservations")]
    BookingConflict { conflicts: Vec<LineConflict> },

    /// An item quantity reduction would strand existing bookings. Soft
    /// block: repeating the request with `?confirm=true` proceeds.
    #[error("Quantity reduction affects existing bookings")]
    NeedsConfirmation { affected: Vec<QuantityWarning> },

    /// An internal error with a human-readable message.
    #[error("Internal error: {0}")]
    InternalError(String),
}

/// Convenience type alias for handler return values.
pub type AppResult<T> = Result<T, AppError>;

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message) = match &self {
            // --- CoreError variants ---
            AppError::Core(core) => match core {
                CoreError::NotFound { entity, id } => (
                    StatusCode::NOT_FOUND,
                    "NOT_FOUND",
                    format!("{entity} with id {id} not found"),
                ),
                CoreError::Validation(msg) => {
                    (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", msg.clone())
                }
                CoreError::Conflict(msg) => (StatusCode::CONFLICT, "CONFLICT", msg.clone()),
                CoreError::Internal(msg) => {
                    tracing::error!(error = %msg, "Internal core error");
                    (
                        StatusCode::INTERNAL_SERVER_ERROR,
                        "INTERNAL_ERROR",
                        "An internal error occurred".to_string(),
                    )
                }
            },

            // --- Database errors ---
            AppError::Database(err) => classify_sqlx_error(err),

            // --- Validation outcomes ---
            AppError::BookingConflict { .. } => (
                StatusCode::CONFLICT,
                "BOOKING_CONFLICT",
                "Requested quantities exceed availability".to_string(),
            ),
            AppError::NeedsConfirmation { .. } => (
                StatusCode::CONFLICT,
                "NEEDS_CONFIRMATION",
                "Quantity reduction affects existing bookings; repeat with confirm=true to proceed"
                    .to_string(),
            ),

            // --- HTTP-specific errors ---
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, "BAD_REQUEST", msg.clone()),
            AppError::InternalError(msg) => {
                tracing::error!(error = %msg, "Internal error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "INTERNAL_ERROR",
                    "An internal error occurred".to_string(),
                )
            }
        };

        let mut body = json!({
            "error": message,
            "code": code,
        });

        // The validation outcomes carry structured detail the client renders.
        match &self {
            AppError::BookingConflict { conflicts } => {
                body["conflicts"] = json!(conflicts);
            }
            AppError::NeedsConfirmation { affected } => {
                body["affected"] = json!(affected);
            }
            _ => {}
        }

        (status, axum::Json(body)).into_response()
    }
}

/// Map a sqlx error to an HTTP status, error code, and client-safe message.
///
/// `RowNotFound` is a 404. Unique violations (23505, constraints named
/// `uq_*`) and foreign-key violations (23503) are 409s: the latter happens
/// when a booking line is inserted for an item deleted after the validation
/// snapshot was taken, and the client should reload and retry. Anything
/// else is logged and sanitized to a 500.
fn classify_sqlx_error(err: &sqlx::Error) -> (StatusCode, &'static str, String) {
    match err {
        sqlx::Error::RowNotFound => (
            StatusCode::NOT_FOUND,
            "NOT_FOUND",
            "Resource not found".to_string(),
        ),
        sqlx::Error::Database(db_err) => match db_err.code().as_deref() {
            Some("23505") if db_err.constraint().is_some_and(|c| c.starts_with("uq_")) => (
                StatusCode::CONFLICT,
                "CONFLICT",
                format!(
                    "Duplicate value violates unique constraint: {}",
                    db_err.constraint().unwrap_or("unknown")
                ),
            ),
            Some("23503") => (
                StatusCode::CONFLICT,
                "CONFLICT",
                "A referenced row no longer exists".to_string(),
            ),
            _ => {
                tracing::error!(error = %db_err, "Database error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "INTERNAL_ERROR",
                    "An internal error occurred".to_string(),
                )
            }
        },
        other => {
            tracing::error!(error = %other, "Database error");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                "INTERNAL_ERROR",
                "An internal error occurred".to_string(),
            )
        }
    }
}
