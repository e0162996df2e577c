//! API key guard for the payment provider webhook.

use axum::extract::FromRequestParts;
use axum::http::request::Parts;

use crate::auth::credentials::verify_api_key;
use crate::auth::service::AuthError;
use crate::error::AppError;
use crate::state::AppState;

/// Proof that the request carried `Authorization: ApiKey <POLKA_KEY>`.
#[derive(Debug, Clone, Copy)]
pub struct PolkaApiKey;

impl FromRequestParts<AppState> for PolkaApiKey {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        verify_api_key(&parts.headers, &state.config.polka_key).map_err(AuthError::from)?;
        Ok(PolkaApiKey)
    }
}
