//! Fileserver hit counter.

use axum::extract::{Request, State};
use axum::middleware::Next;
use axum::response::Response;

use crate::state::AppState;

/// Count every request that reaches the static fileserver.
pub async fn count_fileserver_hits(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> Response {
    state.record_fileserver_hit();
    next.run(request).await
}
