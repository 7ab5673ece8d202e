//! Route definitions for the `/products` resource.

use axum::routing::get;
use axum::Router;

use crate::handlers::products;
use crate::state::AppState;

/// Routes mounted at `/products`.
///
/// ```text
/// GET    /               -> list_products (or single by ?slug=)
/// POST   /               -> create_product (requires admin)
/// GET    /{id}           -> get_product
/// PUT    /{id}           -> update_product (requires admin)
/// DELETE /{id}           -> delete_product (requires admin)
/// GET    /{id}/related   -> list_related
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route(
            "/",
            get(products::list_products).post(products::create_product),
        )
        .route(
            "/{id}",
            get(products::get_product)
                .put(products::update_product)
                .delete(products::delete_product),
        )
        .route("/{id}/related", get(products::list_related))
}
