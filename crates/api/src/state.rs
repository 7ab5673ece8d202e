use std::sync::Arc;

use senso_media::ImageHost;

use crate::config::ServerConfig;

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// Cheap to clone: the pool and everything else is reference counted.
#[derive(Clone)]
pub struct AppState {
    pub pool: senso_db::DbPool,
    pub config: Arc<ServerConfig>,
    /// `None` when no image host is configured; uploads then fail with 503.
    pub image_host: Option<Arc<dyn ImageHost>>,
}
