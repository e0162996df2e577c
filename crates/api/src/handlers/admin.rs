//! Operator endpoints: fileserver metrics and the dev-only reset.

use axum::extract::State;
use axum::response::Html;
use chirpy_core::error::CoreError;

use crate::config::Platform;
use crate::error::AppResult;
use crate::state::AppState;

/// GET /admin/metrics
pub async fn metrics(State(state): State<AppState>) -> Html<String> {
    Html(format!(
        "<html>\n  <body>\n    <h1>Welcome, Chirpy Admin</h1>\n    <p>Chirpy has been visited {} times!</p>\n  </body>\n</html>\n",
        state.fileserver_hits()
    ))
}

/// POST /admin/reset
///
/// Deletes every user (with their chirps and refresh tokens) and zeroes the
/// hit counter. Refused unless the platform is `dev`.
pub async fn reset(State(state): State<AppState>) -> AppResult<&'static str> {
    if state.config.platform != Platform::Dev {
        return Err(CoreError::Forbidden("Reset is only allowed in dev environment".into()).into());
    }

    let deleted = state.store.delete_all_users().await?;
    state.reset_fileserver_hits();

    tracing::warn!(deleted, "Database reset");
    Ok("Hits reset to 0 and database reset to initial state.")
}
