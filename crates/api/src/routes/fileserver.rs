//! Static files under `/app`.

use axum::middleware;
use axum::Router;
use tower_http::services::ServeDir;

use crate::middleware::metrics::count_fileserver_hits;
use crate::state::AppState;

/// Serve `FILESERVER_ROOT` at `/app`, counting every request.
pub fn router(state: &AppState) -> Router<AppState> {
    Router::new()
        .nest_service("/app", ServeDir::new(&state.config.fileserver_root))
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            count_fileserver_hits,
        ))
}
