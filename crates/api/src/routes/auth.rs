//! Route definitions for login and refresh token handling.

use axum::routing::post;
use axum::Router;

use crate::handlers::auth;
use crate::state::AppState;

/// Routes mounted at `/api`.
///
/// ```text
/// POST /login    -> login
/// POST /refresh  -> refresh
/// POST /revoke   -> revoke
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/login", post(auth::login))
        .route("/refresh", post(auth::refresh))
        .route("/revoke", post(auth::revoke))
}
