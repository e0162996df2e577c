use axum::routing::{get, post};
use axum::Router;

use crate::handlers::admin;
use crate::state::AppState;

/// Routes mounted at `/admin`.
///
/// ```text
/// GET  /metrics -> metrics (HTML)
/// POST /reset   -> reset (PLATFORM=dev only)
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/metrics", get(admin::metrics))
        .route("/reset", post(admin::reset))
}
