//! Handlers for the `/users` resource.

use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use chirpy_core::error::CoreError;
use chirpy_core::user::validate_credentials;
use chirpy_db::models::user::{CreateUser, UpdateCredentials, UserResponse};
use serde::Deserialize;

use crate::auth::password::hash_password;
use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::state::AppState;

/// Request body for `POST /api/users` and `PUT /api/users`.
#[derive(Debug, Deserialize)]
pub struct UserCredentialsRequest {
    pub email: String,
    pub password: String,
}

/// POST /api/users
pub async fn create_user(
    State(state): State<AppState>,
    Json(input): Json<UserCredentialsRequest>,
) -> AppResult<(StatusCode, Json<UserResponse>)> {
    validate_credentials(&input.email, &input.password)?;

    let user = state
        .store
        .create_user(&CreateUser {
            email: input.email,
            hashed_password: hash(&input.password)?,
        })
        .await?;

    tracing::info!(user_id = %user.id, "User created");
    Ok((StatusCode::CREATED, Json(UserResponse::from(&user))))
}

/// PUT /api/users
///
/// Replace the caller's email and password.
pub async fn update_user(
    auth: AuthUser,
    State(state): State<AppState>,
    Json(input): Json<UserCredentialsRequest>,
) -> AppResult<Json<UserResponse>> {
    validate_credentials(&input.email, &input.password)?;

    let user = state
        .store
        .update_user_credentials(
            auth.user_id,
            &UpdateCredentials {
                email: input.email,
                hashed_password: hash(&input.password)?,
            },
        )
        .await?
        .ok_or(CoreError::NotFound {
            entity: "User",
            id: auth.user_id,
        })?;

    tracing::info!(user_id = %user.id, "User credentials updated");
    Ok(Json(UserResponse::from(&user)))
}

fn hash(password: &str) -> AppResult<String> {
    hash_password(password).map_err(|e| AppError::InternalError(e.to_string()))
}
