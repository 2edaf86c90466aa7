//! Error types and HTTP error response handling.
//!
//! This module defines all application errors and how they are converted
//! into HTTP responses with appropriate status codes and JSON bodies.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;

/// Application-wide error type.
///
/// Each variant maps to one HTTP status category:
///
/// - `InvalidRequest` → 400 (missing/invalid input)
/// - `InvalidCredentials` → 401 (bad email or password, indistinguishable)
/// - `AccountLocked` → 403 (the account status gate rejected the login)
/// - `NotFound` → 404
/// - `Conflict` → 409 (duplicate unique key)
/// - `Database` → 500 (anything else from the driver; details logged, not leaked)
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// Database operation failed (e.g., connection error, query error).
    ///
    /// Wraps any sqlx::Error via `#[from]`, so handlers can use `?` freely.
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Request body or parameters are invalid.
    #[error("{0}")]
    InvalidRequest(String),

    /// Email or password did not match a credential record.
    #[error("Invalid credentials")]
    InvalidCredentials,

    /// The viewer account is LOCKED; login is rejected outright so the
    /// caller can present a "contact support" message.
    #[error("Account is locked. Please contact support.")]
    AccountLocked,

    /// Requested resource does not exist.
    #[error("{0} not found")]
    NotFound(&'static str),

    /// A unique constraint was violated (duplicate email, racing country id).
    #[error("{0}")]
    Conflict(String),

    /// Invariant breakage that is not the caller's fault (corrupt credential
    /// row, password hashing failure). Surfaced as a generic 500.
    #[error("{0}")]
    Internal(String),
}

impl AppError {
    /// True when the wrapped driver error is a Postgres unique violation
    /// (SQLSTATE 23505). Handlers use this to turn duplicate-key failures
    /// into 409 responses instead of generic 500s.
    pub fn is_unique_violation(err: &sqlx::Error) -> bool {
        match err {
            sqlx::Error::Database(db) => db.code().as_deref() == Some("23505"),
            _ => false,
        }
    }

    /// Map a driver error to `Conflict` when it is a unique violation,
    /// otherwise pass it through as a `Database` error.
    pub fn conflict_on_unique(err: sqlx::Error, message: &str) -> Self {
        if Self::is_unique_violation(&err) {
            AppError::Conflict(message.to_string())
        } else {
            AppError::Database(err)
        }
    }
}

/// Convert AppError into an HTTP response.
///
/// All errors return JSON in the form `{"error": "..."}`. The locked-account
/// rejection additionally carries `"status": "LOCKED"` so the client can
/// distinguish it from other 403s without parsing the message.
impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message) = match &self {
            AppError::InvalidRequest(msg) => (StatusCode::BAD_REQUEST, msg.clone()),
            AppError::InvalidCredentials => (StatusCode::UNAUTHORIZED, self.to_string()),
            AppError::AccountLocked => (StatusCode::FORBIDDEN, self.to_string()),
            AppError::NotFound(_) => (StatusCode::NOT_FOUND, self.to_string()),
            AppError::Conflict(msg) => (StatusCode::CONFLICT, msg.clone()),
            AppError::Database(err) => {
                tracing::error!(error = %err, "database error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal server error".to_string(),
                )
            }
            AppError::Internal(msg) => {
                tracing::error!(error = %msg, "internal error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal server error".to_string(),
                )
            }
        };

        let body = if matches!(self, AppError::AccountLocked) {
            Json(json!({ "error": message, "status": "LOCKED" }))
        } else {
            Json(json!({ "error": message }))
        };

        (status, body).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::StatusCode;

    fn status_of(err: AppError) -> StatusCode {
        err.into_response().status()
    }

    #[test]
    fn maps_variants_to_expected_statuses() {
        assert_eq!(
            status_of(AppError::InvalidRequest("bad".into())),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            status_of(AppError::InvalidCredentials),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(status_of(AppError::AccountLocked), StatusCode::FORBIDDEN);
        assert_eq!(
            status_of(AppError::NotFound("Series")),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            status_of(AppError::Conflict("dup".into())),
            StatusCode::CONFLICT
        );
        assert_eq!(
            status_of(AppError::Database(sqlx::Error::RowNotFound)),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn not_found_message_names_the_resource() {
        assert_eq!(AppError::NotFound("Series").to_string(), "Series not found");
    }

    #[test]
    fn non_database_errors_are_not_unique_violations() {
        assert!(!AppError::is_unique_violation(&sqlx::Error::RowNotFound));
    }
}
