//! HTTP route handlers for the storefront and admin surfaces.
//!
//! # Route Structure
//!
//! ```text
//! GET  /                         - Home page (full catalog, paginated)
//! GET  /health                   - Health check (registered in main)
//!
//! # Store front
//! GET  /gender/{gender}          - Gender-filtered listing
//! GET  /product/{id_slug}        - Product detail
//!
//! # Auth
//! GET  /auth/login               - Login page
//! POST /auth/login               - Login action
//! GET  /auth/register            - Register page
//! POST /auth/register            - Register action
//! POST /auth/logout              - Logout action
//!
//! # Admin (requires auth)
//! GET  /admin/products           - Product table
//! GET  /admin/products/{id}      - Edit form ({id} may be "new")
//! POST /admin/products/{id}      - Submit create/update (multipart)
//! POST /admin/products/{id}/sizes - Size picker fragment (HTMX)
//! ```

pub mod admin;
pub mod auth;
pub mod gender;
pub mod home;
pub mod products;

use axum::{
    Router,
    routing::{get, post},
};

use crate::state::AppState;

/// Create the auth routes router.
pub fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/login", get(auth::login_page).post(auth::login))
        .route("/register", get(auth::register_page).post(auth::register))
        .route("/logout", post(auth::logout))
}

/// Create all routes for the storefront.
pub fn routes() -> Router<AppState> {
    Router::new()
        // Home page
        .route("/", get(home::home))
        // Store front
        .route("/gender/{gender}", get(gender::show))
        .route("/product/{id_slug}", get(products::show))
        // Auth routes
        .nest("/auth", auth_routes())
        // Admin routes
        .nest("/admin", admin::routes())
}
