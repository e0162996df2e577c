use axum::routing::post;
use axum::Router;

use crate::handlers::webhooks;
use crate::state::AppState;

/// Routes mounted at `/api/polka`.
///
/// ```text
/// POST /webhooks -> polka_webhook (API key)
/// ```
pub fn router() -> Router<AppState> {
    Router::new().route("/webhooks", post(webhooks::polka_webhook))
}
