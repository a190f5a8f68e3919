//! HTTP route handlers for the storefront.
//!
//! # Route Structure
//!
//! ```text
//! GET  /                        - Home page
//! GET  /health                  - Health check
//!
//! # Catalog
//! GET  /productos               - Catalog listing (search/price/presentation/sort)
//! GET  /productos/{id}          - Product detail
//!
//! # Cart (HTMX fragments)
//! GET  /carrito                 - Cart page
//! POST /carrito/agregar         - Add to cart (returns count badge, triggers cart-updated)
//! POST /carrito/actualizar      - Update quantity (returns cart_items fragment)
//! POST /carrito/quitar          - Remove item (returns cart_items fragment)
//! GET  /carrito/badge           - Cart count badge (fragment)
//!
//! # Checkout (accordion wizard)
//! GET  /checkout                - Wizard page
//! POST /checkout/entrega        - Submit step 1 (delivery)
//! POST /checkout/contacto       - Submit step 2 (contact)
//! POST /checkout/pago           - Submit step 3 (payment)
//! POST /checkout/abrir          - Toggle a step header open/closed
//! POST /checkout/confirmar      - Confirm order (only from step 4)
//!
//! # Auth
//! GET  /auth/login              - Login page
//! POST /auth/login              - Login action
//! GET  /auth/registro           - Register page
//! POST /auth/registro           - Register action
//! POST /auth/logout             - Logout action
//!
//! # Account (requires auth)
//! GET  /cuenta                  - Profile page
//! POST /cuenta                  - Profile update
//! GET  /cuenta/pedidos          - Order history
//! ```

pub mod account;
pub mod auth;
pub mod cart;
pub mod catalog;
pub mod checkout;
pub mod home;

use axum::{
    Router,
    routing::{get, post},
};

use crate::state::AppState;

/// Create the catalog routes router.
pub fn catalog_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(catalog::index))
        .route("/{id}", get(catalog::show))
}

/// Create the cart routes router.
pub fn cart_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(cart::show))
        .route("/agregar", post(cart::add))
        .route("/actualizar", post(cart::update))
        .route("/quitar", post(cart::remove))
        .route("/badge", get(cart::count))
}

/// Create the checkout routes router.
pub fn checkout_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(checkout::show))
        .route("/entrega", post(checkout::submit_delivery))
        .route("/contacto", post(checkout::submit_contact))
        .route("/pago", post(checkout::submit_payment))
        .route("/abrir", post(checkout::toggle_step))
        .route("/confirmar", post(checkout::confirm))
}

/// Create the auth routes router.
pub fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/login", get(auth::login_page).post(auth::login))
        .route("/registro", get(auth::register_page).post(auth::register))
        .route("/logout", post(auth::logout))
}

/// Create the account routes router.
pub fn account_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(account::show).post(account::update))
        .route("/pedidos", get(account::orders))
}

/// Create all routes for the storefront.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/", get(home::home))
        .nest("/productos", catalog_routes())
        .nest("/carrito", cart_routes())
        .nest("/checkout", checkout_routes())
        .nest("/auth", auth_routes())
        .nest("/cuenta", account_routes())
}
