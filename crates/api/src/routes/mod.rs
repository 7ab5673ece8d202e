pub mod admin;
pub mod health;
pub mod products;
pub mod upload;

use axum::Router;

use crate::config::ServerConfig;
use crate::state::AppState;

/// Build the `/api` route tree.
///
/// ```text
/// /admin/login                 POST   login
/// /admin/session               GET    session check (admin)
/// /admin/stats                 GET    dashboard counts (admin)
///
/// /products                    GET    list, or ?slug= lookup
/// /products                    POST   create (admin)
/// /products/{id}               GET    get
/// /products/{id}               PUT    update (admin)
/// /products/{id}               DELETE delete (admin)
/// /products/{id}/related       GET    same-category products
///
/// /upload                      POST   image upload (admin)
/// ```
pub fn api_routes(config: &ServerConfig) -> Router<AppState> {
    Router::new()
        .nest("/admin", admin::router())
        .nest("/products", products::router())
        .nest("/upload", upload::router(config.upload_max_bytes))
}
