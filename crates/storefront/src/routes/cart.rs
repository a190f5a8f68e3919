//! Cart route handlers.
//!
//! Cart operations use HTMX for dynamic updates without full page
//! reloads. The cart itself is serialized into the session; handlers
//! load it, mutate it through the cart store, and save it back.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form,
    extract::State,
    http::StatusCode,
    response::{AppendHeaders, Html, IntoResponse, Response},
};
use serde::Deserialize;
use tower_sessions::Session;
use tracing::instrument;

use botica_core::ProductId;

use crate::cart::{Cart, CartLine, parse_quantity};
use crate::filters;
use crate::flash::{Flash, take_flash};
use crate::middleware::OptionalUser;
use crate::models::session_keys;
use crate::state::AppState;

// =============================================================================
// View Types
// =============================================================================

/// Cart line display data for templates.
#[derive(Debug, Clone)]
pub struct CartItemView {
    pub product_id: i32,
    pub name: String,
    pub presentation: String,
    pub quantity: u32,
    pub price: String,
    pub line_price: String,
    pub image: String,
    /// The decrement control is disabled at quantity 1.
    pub can_decrement: bool,
}

impl From<&CartLine> for CartItemView {
    fn from(line: &CartLine) -> Self {
        Self {
            product_id: line.product_id.as_i32(),
            name: line.name.clone(),
            presentation: line.presentation.clone(),
            quantity: line.quantity,
            price: line.unit_price().display(),
            line_price: line.line_total().display(),
            image: line.image.clone(),
            can_decrement: line.quantity > 1,
        }
    }
}

/// Cart display data for templates.
#[derive(Debug, Clone)]
pub struct CartView {
    pub items: Vec<CartItemView>,
    pub subtotal: String,
    pub item_count: u32,
}

impl From<&Cart> for CartView {
    fn from(cart: &Cart) -> Self {
        Self {
            items: cart.lines().iter().map(CartItemView::from).collect(),
            subtotal: cart.total().display(),
            item_count: cart.item_count(),
        }
    }
}

// =============================================================================
// Session Helpers
// =============================================================================

/// Load the cart from the session; corrupt data becomes an empty cart.
pub async fn load_cart(session: &Session) -> Cart {
    match session.get::<Cart>(session_keys::CART).await {
        Ok(cart) => cart.unwrap_or_default(),
        Err(e) => {
            tracing::warn!("Discarding corrupt session cart: {e}");
            Cart::default()
        }
    }
}

/// Save the cart back to the session.
pub async fn save_cart(
    session: &Session,
    cart: &Cart,
) -> Result<(), tower_sessions::session::Error> {
    session.insert(session_keys::CART, cart).await
}

// =============================================================================
// Form Types
// =============================================================================

/// Add to cart form data.
#[derive(Debug, Deserialize)]
pub struct AddToCartForm {
    pub product_id: i32,
    /// Raw numeric field; invalid parses default to 1.
    pub quantity: Option<String>,
}

/// Update cart form data.
#[derive(Debug, Deserialize)]
pub struct UpdateCartForm {
    pub product_id: i32,
    pub quantity: String,
}

/// Remove from cart form data.
#[derive(Debug, Deserialize)]
pub struct RemoveFromCartForm {
    pub product_id: i32,
}

// =============================================================================
// Templates
// =============================================================================

/// Cart page template.
#[derive(Template, WebTemplate)]
#[template(path = "cart/show.html")]
pub struct CartShowTemplate {
    pub cart: CartView,
    pub user_name: String,
    pub flash: Option<Flash>,
}

/// Cart items fragment template (for HTMX).
#[derive(Template, WebTemplate)]
#[template(path = "partials/cart_items.html")]
pub struct CartItemsTemplate {
    pub cart: CartView,
}

/// Cart count badge fragment template (for HTMX).
#[derive(Template, WebTemplate)]
#[template(path = "partials/cart_count.html")]
pub struct CartCountTemplate {
    pub count: u32,
}

// =============================================================================
// Handlers
// =============================================================================

/// Display cart page.
#[instrument(skip(session, user))]
pub async fn show(
    session: Session,
    OptionalUser(user): OptionalUser,
) -> impl IntoResponse {
    let cart = load_cart(&session).await;

    CartShowTemplate {
        cart: CartView::from(&cart),
        user_name: user.map(|u| u.name).unwrap_or_default(),
        flash: take_flash(&session).await,
    }
}

/// Add item to cart (HTMX).
///
/// Fetches the product snapshot from the backend, then appends or
/// increments the session line. Returns the count badge with an HTMX
/// trigger so other fragments refresh.
#[instrument(skip(state, session))]
pub async fn add(
    State(state): State<AppState>,
    session: Session,
    Form(form): Form<AddToCartForm>,
) -> Response {
    let quantity = form.quantity.as_deref().map_or(1, parse_quantity);

    let product = match state.api().get_product(ProductId::new(form.product_id)).await {
        Ok(product) => product,
        Err(e) => {
            tracing::error!("Failed to fetch product for cart add: {e}");
            return (
                StatusCode::BAD_GATEWAY,
                Html("<span class=\"cart-error\">No se pudo agregar al carrito</span>"),
            )
                .into_response();
        }
    };

    if !product.purchasable() {
        return (
            StatusCode::CONFLICT,
            Html("<span class=\"cart-error\">Producto no disponible</span>"),
        )
            .into_response();
    }

    let mut cart = load_cart(&session).await;
    cart.add(&product, quantity);

    if let Err(e) = save_cart(&session, &cart).await {
        tracing::error!("Failed to save cart to session: {e}");
    }

    (
        AppendHeaders([("HX-Trigger", "cart-updated")]),
        CartCountTemplate {
            count: cart.item_count(),
        },
    )
        .into_response()
}

/// Update cart item quantity (HTMX).
#[instrument(skip(session))]
pub async fn update(session: Session, Form(form): Form<UpdateCartForm>) -> Response {
    let mut cart = load_cart(&session).await;
    cart.update_quantity(ProductId::new(form.product_id), parse_quantity(&form.quantity));

    if let Err(e) = save_cart(&session, &cart).await {
        tracing::error!("Failed to save cart to session: {e}");
    }

    (
        AppendHeaders([("HX-Trigger", "cart-updated")]),
        CartItemsTemplate {
            cart: CartView::from(&cart),
        },
    )
        .into_response()
}

/// Remove item from cart (HTMX).
#[instrument(skip(session))]
pub async fn remove(session: Session, Form(form): Form<RemoveFromCartForm>) -> Response {
    let mut cart = load_cart(&session).await;
    cart.remove(ProductId::new(form.product_id));

    if let Err(e) = save_cart(&session, &cart).await {
        tracing::error!("Failed to save cart to session: {e}");
    }

    (
        AppendHeaders([("HX-Trigger", "cart-updated")]),
        CartItemsTemplate {
            cart: CartView::from(&cart),
        },
    )
        .into_response()
}

/// Get cart count badge (HTMX).
#[instrument(skip(session))]
pub async fn count(session: Session) -> impl IntoResponse {
    let cart = load_cart(&session).await;

    CartCountTemplate {
        count: cart.item_count(),
    }
}
