//! Handlers for login, refresh, and revoke.

use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use chirpy_db::models::user::UserResponse;
use serde::{Deserialize, Serialize};

use crate::error::AppResult;
use crate::middleware::auth::BearerToken;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Request / response types
// ---------------------------------------------------------------------------

/// Request body for `POST /api/login`.
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// The user record plus a session token and a refresh token.
#[derive(Debug, Serialize)]
pub struct LoginResponse {
    #[serde(flatten)]
    pub user: UserResponse,
    pub token: String,
    pub refresh_token: String,
}

/// Response body for `POST /api/refresh`.
#[derive(Debug, Serialize)]
pub struct RefreshResponse {
    pub token: String,
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// POST /api/login
///
/// Authenticate with email + password. Unknown email and wrong password
/// produce the same 401.
pub async fn login(
    State(state): State<AppState>,
    Json(input): Json<LoginRequest>,
) -> AppResult<Json<LoginResponse>> {
    let session = state.auth.login(&input.email, &input.password).await?;

    Ok(Json(LoginResponse {
        user: UserResponse::from(&session.user),
        token: session.access_token,
        refresh_token: session.refresh_token,
    }))
}

/// POST /api/refresh
///
/// Exchange the refresh token in the bearer header for a new session token.
pub async fn refresh(
    State(state): State<AppState>,
    BearerToken(refresh_token): BearerToken,
) -> AppResult<Json<RefreshResponse>> {
    let token = state.auth.refresh(&refresh_token).await?;
    Ok(Json(RefreshResponse { token }))
}

/// POST /api/revoke
///
/// Revoke the refresh token in the bearer header.
pub async fn revoke(
    State(state): State<AppState>,
    BearerToken(refresh_token): BearerToken,
) -> AppResult<StatusCode> {
    state.auth.revoke(&refresh_token).await?;
    Ok(StatusCode::NO_CONTENT)
}
