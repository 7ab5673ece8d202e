//! Route definitions for the `/admin` resource.

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::admin;
use crate::state::AppState;

/// Routes mounted at `/admin`.
///
/// ```text
/// POST /login    -> login
/// GET  /session  -> session (requires admin)
/// GET  /stats    -> stats (requires admin)
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/login", post(admin::login))
        .route("/session", get(admin::session))
        .route("/stats", get(admin::stats))
}
