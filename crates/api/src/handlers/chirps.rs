//! Handlers for the `/chirps` resource.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use chirpy_core::chirp::{clean_chirp_body, validate_chirp_body};
use chirpy_core::error::CoreError;
use chirpy_core::types::DbId;
use chirpy_db::models::chirp::{Chirp, ChirpFilter, CreateChirp, SortDirection};
use serde::Deserialize;

use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::state::AppState;

/// Request body for `POST /api/chirps`.
#[derive(Debug, Deserialize)]
pub struct CreateChirpRequest {
    pub body: String,
}

/// Query parameters for `GET /api/chirps`.
#[derive(Debug, Default, Deserialize)]
pub struct ListChirpsParams {
    pub author_id: Option<String>,
    pub sort: Option<String>,
}

impl ListChirpsParams {
    fn into_filter(self) -> AppResult<ChirpFilter> {
        let author_id = match self.author_id.as_deref().map(str::trim) {
            None | Some("") => None,
            Some(raw) => Some(
                DbId::parse_str(raw)
                    .map_err(|_| AppError::BadRequest(format!("Invalid author_id: {raw}")))?,
            ),
        };
        Ok(ChirpFilter {
            author_id,
            sort: SortDirection::from_query(self.sort.as_deref()),
        })
    }
}

/// POST /api/chirps
pub async fn create_chirp(
    auth: AuthUser,
    State(state): State<AppState>,
    Json(input): Json<CreateChirpRequest>,
) -> AppResult<(StatusCode, Json<Chirp>)> {
    validate_chirp_body(&input.body)?;

    let chirp = state
        .store
        .create_chirp(&CreateChirp {
            user_id: auth.user_id,
            body: clean_chirp_body(&input.body),
        })
        .await?;

    tracing::debug!(chirp_id = %chirp.id, user_id = %auth.user_id, "Chirp created");
    Ok((StatusCode::CREATED, Json(chirp)))
}

/// GET /api/chirps?author_id=<uuid>&sort=asc|desc
pub async fn list_chirps(
    State(state): State<AppState>,
    Query(params): Query<ListChirpsParams>,
) -> AppResult<Json<Vec<Chirp>>> {
    let filter = params.into_filter()?;
    let chirps = state.store.list_chirps(&filter).await?;
    Ok(Json(chirps))
}

/// GET /api/chirps/{chirp_id}
pub async fn get_chirp(
    State(state): State<AppState>,
    Path(chirp_id): Path<DbId>,
) -> AppResult<Json<Chirp>> {
    let chirp = state
        .store
        .find_chirp(chirp_id)
        .await?
        .ok_or(CoreError::NotFound {
            entity: "Chirp",
            id: chirp_id,
        })?;
    Ok(Json(chirp))
}

/// DELETE /api/chirps/{chirp_id}
///
/// Only the author may delete a chirp.
pub async fn delete_chirp(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(chirp_id): Path<DbId>,
) -> AppResult<StatusCode> {
    let chirp = state
        .store
        .find_chirp(chirp_id)
        .await?
        .ok_or(CoreError::NotFound {
            entity: "Chirp",
            id: chirp_id,
        })?;

    if chirp.user_id != auth.user_id {
        return Err(CoreError::Forbidden("You can only delete your own chirps".into()).into());
    }

    if !state.store.delete_chirp(chirp_id).await? {
        return Err(CoreError::NotFound {
            entity: "Chirp",
            id: chirp_id,
        }
        .into());
    }

    tracing::debug!(%chirp_id, user_id = %auth.user_id, "Chirp deleted");
    Ok(StatusCode::NO_CONTENT)
}
