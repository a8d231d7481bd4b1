//! Admin dashboard routes (product management).

pub mod form;
pub mod products;

use axum::{
    Router,
    routing::{get, post},
};

use crate::state::AppState;

/// Create the admin routes router. Every route requires authentication.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/products", get(products::index))
        .route(
            "/products/{id}",
            get(products::edit).post(products::submit),
        )
        .route("/products/{id}/sizes", post(products::toggle_sizes))
}
