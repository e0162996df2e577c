pub mod admin;
pub mod auth;
pub mod chirps;
pub mod fileserver;
pub mod health;
pub mod users;
pub mod webhooks;

use axum::Router;

use crate::state::AppState;

/// Build the `/api` route tree.
///
/// Route hierarchy:
///
/// ```text
/// /healthz                     liveness + store reachability
///
/// /login                       login (public)
/// /refresh                     new session token (refresh token as bearer)
/// /revoke                      revoke refresh token (refresh token as bearer)
///
/// /users                       create (public), update own credentials (auth)
///
/// /chirps                      list (public), create (auth)
/// /chirps/{chirp_id}           get (public), delete (author only)
///
/// /polka/webhooks              payment provider events (API key)
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .merge(health::router())
        .merge(auth::router())
        .nest("/users", users::router())
        .nest("/chirps", chirps::router())
        .nest("/polka", webhooks::router())
}
