//! Session-token authentication extractor for Axum handlers.

use axum::extract::FromRequestParts;
use axum::http::request::Parts;

use crate::auth::credentials::extract_bearer;
use crate::auth::service::AuthError;
pub use crate::auth::service::AuthUser;
use crate::error::AppError;
use crate::state::AppState;

/// Any handler taking an [`AuthUser`] parameter is protected: the request is
/// rejected with 401 before the handler body runs unless it carries a valid
/// `Authorization: Bearer <session token>` header.
///
/// ```ignore
/// async fn my_handler(user: AuthUser) -> AppResult<Json<()>> {
///     tracing::info!(user_id = %user.user_id, "handling request");
///     Ok(Json(()))
/// }
/// ```
impl FromRequestParts<AppState> for AuthUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        Ok(state.auth.authenticate(&parts.headers)?)
    }
}

/// The raw bearer value of a request, for endpoints where the bearer is a
/// refresh token rather than a session token.
#[derive(Debug, Clone)]
pub struct BearerToken(pub String);

impl FromRequestParts<AppState> for BearerToken {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        _state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let token = extract_bearer(&parts.headers).map_err(AuthError::from)?;
        Ok(BearerToken(token))
    }
}
