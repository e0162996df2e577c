use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use chirpy_core::error::CoreError;
use chirpy_db::StoreError;
use serde_json::json;

use crate::auth::jwt::TokenError;
use crate::auth::password::PasswordError;
use crate::auth::refresh_token::RefreshTokenError;
use crate::auth::service::AuthError;

/// Application-level error type for HTTP handlers.
///
/// Wraps [`CoreError`] for domain errors, [`StoreError`] for persistence,
/// and [`AuthError`] for authentication, and adds HTTP-specific variants.
/// Implements [`IntoResponse`] to produce consistent JSON error responses.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// A domain-level error from `chirpy_core`.
    #[error(transparent)]
    Core(#[from] CoreError),

    /// A storage error from `chirpy_db`.
    #[error(transparent)]
    Store(#[from] StoreError),

    /// An authentication failure. The response never says which check failed.
    #[error(transparent)]
    Auth(#[from] AuthError),

    /// A bad request with a human-readable message.
    #[error("Bad request: {0}")]
    BadRequest(String),

    /// An internal error with a human-readable message.
    #[error("Internal error: {0}")]
    InternalError(String),
}

/// Convenience type alias for handler return values.
pub type AppResult<T> = Result<T, AppError>;

type Classified = (StatusCode, &'static str, String);

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
                CoreError::Forbidden(msg) => (StatusCode::FORBIDDEN, "FORBIDDEN", msg.clone()),
                CoreError::Internal(msg) => {
                    tracing::error!(error = %msg, "Internal core error");
                    internal()
                }
            },

            // --- Store errors ---
            AppError::Store(err) => classify_store_error(err),

            // --- Auth errors ---
            AppError::Auth(err) => classify_auth_error(err),

            // --- HTTP-specific errors ---
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, "BAD_REQUEST", msg.clone()),
            AppError::InternalError(msg) => {
                tracing::error!(error = %msg, "Internal error");
                internal()
            }
        };

        let body = json!({
            "error": message,
            "code": code,
        });

        (status, axum::Json(body)).into_response()
    }
}

fn internal() -> Classified {
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        "INTERNAL_ERROR",
        "An internal error occurred".to_string(),
    )
}

fn unauthorized(message: &str) -> Classified {
    (StatusCode::UNAUTHORIZED, "UNAUTHORIZED", message.to_string())
}

/// Classify a store error into an HTTP status, error code, and message.
///
/// - Unique constraint violations map to 409; the constraint is only logged.
/// - A write referencing a vanished row maps to 404.
/// - Everything else maps to 500 with a sanitized message.
fn classify_store_error(err: &StoreError) -> Classified {
    match err {
        StoreError::Conflict(constraint) => {
            tracing::warn!(%constraint, "Write rejected by unique constraint");
            (
                StatusCode::CONFLICT,
                "CONFLICT",
                "Resource already exists".to_string(),
            )
        }
        StoreError::MissingReference(constraint) => {
            tracing::warn!(%constraint, "Write referenced a missing row");
            (
                StatusCode::NOT_FOUND,
                "NOT_FOUND",
                "Referenced resource not found".to_string(),
            )
        }
        StoreError::Database(db_err) => {
            tracing::error!(error = %db_err, "Database error");
            internal()
        }
    }
}

/// Classify an auth failure.
///
/// Rejections are logged at warn with the precise cause; the response
/// carries only a fixed message. Unknown email and wrong password share one
/// response.
fn classify_auth_error(err: &AuthError) -> Classified {
    match err {
        AuthError::Credentials(_) => {
            tracing::warn!(error = %err, "Rejected request credentials");
            unauthorized("Missing or malformed Authorization header")
        }
        AuthError::UnknownEmail | AuthError::Password(PasswordError::Mismatch) => {
            tracing::warn!(error = %err, "Login rejected");
            unauthorized("Incorrect email or password")
        }
        AuthError::Password(PasswordError::Hashing(e)) => {
            tracing::error!(error = %e, "Stored password hash is unusable");
            internal()
        }
        AuthError::SessionToken(TokenError::Signing(e)) => {
            tracing::error!(error = %e, "Session token signing failed");
            internal()
        }
        AuthError::SessionToken(TokenError::ExpiryOverflow) => {
            tracing::error!(error = %err, "Session token expiry overflowed");
            internal()
        }
        AuthError::SessionToken(_) => {
            tracing::warn!(error = %err, "Session token rejected");
            unauthorized("Invalid or expired token")
        }
        AuthError::RefreshToken(RefreshTokenError::Store(store_err)) | AuthError::Store(store_err) => {
            classify_store_error(store_err)
        }
        AuthError::RefreshToken(RefreshTokenError::RandomSource(msg)) => {
            tracing::error!(error = %msg, "Refresh token generation failed");
            internal()
        }
        AuthError::RefreshToken(RefreshTokenError::ExpiryOverflow) => {
            tracing::error!(error = %err, "Refresh token expiry overflowed");
            internal()
        }
        AuthError::RefreshToken(_) => {
            tracing::warn!(error = %err, "Refresh token rejected");
            unauthorized("Invalid or expired refresh token")
        }
        AuthError::StoreTimeout(_) => (
            StatusCode::SERVICE_UNAVAILABLE,
            "SERVICE_UNAVAILABLE",
            "Storage is temporarily unavailable".to_string(),
        ),
    }
}
