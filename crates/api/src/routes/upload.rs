//! Route definitions for `/upload`.

use axum::extract::DefaultBodyLimit;
use axum::routing::post;
use axum::Router;

use crate::handlers::upload;
use crate::state::AppState;

/// Slack on top of the file size for multipart boundaries and headers.
const MULTIPART_OVERHEAD: usize = 64 * 1024;

/// Routes mounted at `/upload`.
///
/// ```text
/// POST /   -> upload_image (requires admin)
/// ```
///
/// The default 2 MB body limit is replaced by `upload_max_bytes`.
pub fn router(upload_max_bytes: usize) -> Router<AppState> {
    Router::new()
        .route("/", post(upload::upload_image))
        .layer(DefaultBodyLimit::max(upload_max_bytes + MULTIPART_OVERHEAD))
}
