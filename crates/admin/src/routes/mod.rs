//! HTTP route handlers for the admin panel.
//!
//! # Route Structure
//!
//! ```text
//! GET  /                         - Dashboard (per-resource counts)
//! GET  /health                   - Health check
//!
//! # Auth
//! GET  /auth/login               - Login page (ADMIN role only)
//! POST /auth/login               - Login action
//! POST /auth/logout              - Logout action
//!
//! # Resource pages (all require admin auth)
//! GET  /productos                - List + client-side search (?q=)
//! GET  /productos/nuevo          - Create form
//! POST /productos                - Create action (multipart, optional image)
//! GET  /productos/{id}/editar    - Edit form
//! POST /productos/{id}           - Update action
//! POST /productos/{id}/estado    - Toggle active flag
//! POST /productos/{id}/eliminar  - Delete
//! GET  /productos/exportar       - CSV export (streamed from backend)
//!
//! /categorias, /proveedores, /usuarios follow the same shape
//! (Form-encoded, no image upload).
//!
//! # Orders
//! GET  /pedidos                  - List + search
//! POST /pedidos/{id}/estado      - Update status
//! POST /pedidos/{id}/eliminar    - Delete
//! GET  /pedidos/exportar         - CSV export
//!
//! # Reports
//! GET  /reportes                 - Sales report rows
//! GET  /reportes/exportar        - CSV/XLSX export (?formato=)
//! ```

pub mod auth;
pub mod categories;
pub mod dashboard;
pub mod orders;
pub mod products;
pub mod providers;
pub mod reports;
pub mod users;

use axum::{
    Router,
    routing::{get, post},
};

use crate::api::Export;
use crate::state::AppState;

/// Create the auth routes router.
pub fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/login", get(auth::login_page).post(auth::login))
        .route("/logout", post(auth::logout))
}

/// Create the product routes router.
pub fn product_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(products::index).post(products::create))
        .route("/nuevo", get(products::new_form))
        .route("/exportar", get(products::export))
        .route("/{id}", post(products::update))
        .route("/{id}/editar", get(products::edit_form))
        .route("/{id}/estado", post(products::toggle))
        .route("/{id}/eliminar", post(products::delete))
}

/// Create the category routes router.
pub fn category_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(categories::index).post(categories::create))
        .route("/nuevo", get(categories::new_form))
        .route("/exportar", get(categories::export))
        .route("/{id}", post(categories::update))
        .route("/{id}/editar", get(categories::edit_form))
        .route("/{id}/estado", post(categories::toggle))
        .route("/{id}/eliminar", post(categories::delete))
}

/// Create the provider routes router.
pub fn provider_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(providers::index).post(providers::create))
        .route("/nuevo", get(providers::new_form))
        .route("/exportar", get(providers::export))
        .route("/{id}", post(providers::update))
        .route("/{id}/editar", get(providers::edit_form))
        .route("/{id}/estado", post(providers::toggle))
        .route("/{id}/eliminar", post(providers::delete))
}

/// Create the user routes router.
pub fn user_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(users::index).post(users::create))
        .route("/nuevo", get(users::new_form))
        .route("/exportar", get(users::export))
        .route("/{id}", post(users::update))
        .route("/{id}/editar", get(users::edit_form))
        .route("/{id}/estado", post(users::toggle))
        .route("/{id}/eliminar", post(users::delete))
}

/// Create the order routes router.
pub fn order_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(orders::index))
        .route("/exportar", get(orders::export))
        .route("/{id}/estado", post(orders::update_status))
        .route("/{id}/eliminar", post(orders::delete))
}

/// Create the report routes router.
pub fn report_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(reports::index))
        .route("/exportar", get(reports::export))
}

/// Create all routes for the admin panel.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/", get(dashboard::index))
        .nest("/auth", auth_routes())
        .nest("/productos", product_routes())
        .nest("/categorias", category_routes())
        .nest("/proveedores", provider_routes())
        .nest("/usuarios", user_routes())
        .nest("/pedidos", order_routes())
        .nest("/reportes", report_routes())
}

/// Turn a backend export into a browser download response.
pub(crate) fn download_response(export: Export) -> axum::response::Response {
    use axum::http::header;
    use axum::response::IntoResponse;

    (
        [
            (header::CONTENT_TYPE, export.content_type),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{}\"", export.filename),
            ),
        ],
        export.bytes,
    )
        .into_response()
}

/// Case-insensitive substring match used by the list-page search boxes.
pub(crate) fn matches_search(needle: &str, fields: &[&str]) -> bool {
    if needle.is_empty() {
        return true;
    }
    let needle = needle.to_lowercase();
    fields
        .iter()
        .any(|field| field.to_lowercase().contains(&needle))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_matches_search_empty_needle() {
        assert!(matches_search("", &["anything"]));
    }

    #[test]
    fn test_matches_search_case_insensitive() {
        assert!(matches_search("PARA", &["Paracetamol", "Tableta"]));
        assert!(matches_search("tab", &["Paracetamol", "Tableta"]));
        assert!(!matches_search("jarabe", &["Paracetamol", "Tableta"]));
    }
}
