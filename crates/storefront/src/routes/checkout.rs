//! Checkout route handlers.
//!
//! The wizard lives in the session; every step submit merges a typed
//! draft and redirects back to the accordion page. Confirm builds the
//! order body from the cart plus the merged drafts, POSTs it to the
//! backend, and clears both the cart and the wizard.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form,
    extract::State,
    response::{IntoResponse, Redirect, Response},
};
use serde::Deserialize;
use tower_sessions::Session;
use tracing::instrument;

use crate::api::types::{DetallePedidoDto, NuevoPedido};
use crate::checkout::{
    CheckoutWizard, ContactDraft, DeliveryDraft, DeliveryMethod, PaymentDraft, PaymentMethod, Step,
};
use crate::error::Result;
use crate::filters;
use crate::flash::{Flash, flash_error, take_flash};
use crate::middleware::OptionalUser;
use crate::models::session_keys;
use crate::routes::cart::{CartView, load_cart, save_cart};
use crate::state::AppState;

// =============================================================================
// Session Helpers
// =============================================================================

/// Load the wizard from the session; corrupt data restarts checkout.
async fn load_wizard(session: &Session) -> CheckoutWizard {
    match session.get::<CheckoutWizard>(session_keys::CHECKOUT).await {
        Ok(wizard) => wizard.unwrap_or_default(),
        Err(e) => {
            tracing::warn!("Discarding corrupt checkout draft: {e}");
            CheckoutWizard::default()
        }
    }
}

async fn save_wizard(
    session: &Session,
    wizard: &CheckoutWizard,
) -> std::result::Result<(), tower_sessions::session::Error> {
    session.insert(session_keys::CHECKOUT, wizard).await
}

async fn clear_wizard(session: &Session) {
    if let Err(e) = session.remove::<CheckoutWizard>(session_keys::CHECKOUT).await {
        tracing::warn!("Failed to clear checkout draft: {e}");
    }
}

// =============================================================================
// Form Types
// =============================================================================

/// Step 1 form data.
#[derive(Debug, Deserialize)]
pub struct DeliveryForm {
    pub metodo: String,
    #[serde(default)]
    pub direccion: String,
    #[serde(default)]
    pub ciudad: String,
    #[serde(default)]
    pub referencia: String,
}

/// Step 2 form data.
#[derive(Debug, Deserialize)]
pub struct ContactForm {
    pub nombre: String,
    pub telefono: String,
    pub correo: String,
}

/// Step 3 form data.
#[derive(Debug, Deserialize)]
pub struct PaymentForm {
    pub metodo: String,
}

/// Accordion header toggle form data.
#[derive(Debug, Deserialize)]
pub struct ToggleForm {
    pub paso: u8,
}

// =============================================================================
// View Types
// =============================================================================

/// Wizard display data flattened for the template.
#[derive(Debug, Clone)]
pub struct WizardView {
    pub active_step: u8,
    pub open_delivery: bool,
    pub open_contact: bool,
    pub open_payment: bool,
    pub open_summary: bool,
    pub can_confirm: bool,
    pub delivery_method: String,
    pub address: String,
    pub city: String,
    pub reference: String,
    pub full_name: String,
    pub phone: String,
    pub email: String,
    pub payment_method: String,
    pub delivery_label: String,
    pub payment_label: String,
}

impl WizardView {
    fn build(wizard: &CheckoutWizard) -> Self {
        Self {
            active_step: wizard.active_step.number(),
            open_delivery: wizard.is_open(Step::Delivery),
            open_contact: wizard.is_open(Step::Contact),
            open_payment: wizard.is_open(Step::Payment),
            open_summary: wizard.is_open(Step::Summary),
            can_confirm: wizard.can_confirm(),
            delivery_method: match wizard.delivery.method {
                DeliveryMethod::Delivery => "delivery".to_string(),
                DeliveryMethod::Pickup => "recojo".to_string(),
            },
            address: wizard.delivery.address.clone(),
            city: wizard.delivery.city.clone(),
            reference: wizard.delivery.reference.clone(),
            full_name: wizard.contact.full_name.clone(),
            phone: wizard.contact.phone.clone(),
            email: wizard.contact.email.clone(),
            payment_method: match wizard.payment.method {
                PaymentMethod::Card => "tarjeta".to_string(),
                PaymentMethod::Cash => "efectivo".to_string(),
                PaymentMethod::Transfer => "transferencia".to_string(),
            },
            delivery_label: match wizard.delivery.method {
                DeliveryMethod::Delivery => "Delivery a domicilio".to_string(),
                DeliveryMethod::Pickup => "Recojo en tienda".to_string(),
            },
            payment_label: match wizard.payment.method {
                PaymentMethod::Card => "Tarjeta".to_string(),
                PaymentMethod::Cash => "Efectivo".to_string(),
                PaymentMethod::Transfer => "Transferencia".to_string(),
            },
        }
    }
}

// =============================================================================
// Templates
// =============================================================================

/// Checkout accordion page template.
#[derive(Template, WebTemplate)]
#[template(path = "checkout/show.html")]
pub struct CheckoutTemplate {
    pub wizard: WizardView,
    pub cart: CartView,
    pub user_name: String,
    pub flash: Option<Flash>,
}

/// Order confirmation page template.
#[derive(Template, WebTemplate)]
#[template(path = "checkout/confirmed.html")]
pub struct ConfirmedTemplate {
    pub order_id: String,
    pub total: String,
    pub user_name: String,
}

// =============================================================================
// Handlers
// =============================================================================

/// Display the checkout accordion.
#[instrument(skip(session, user))]
pub async fn show(session: Session, OptionalUser(user): OptionalUser) -> Response {
    let cart = load_cart(&session).await;
    if cart.is_empty() {
        return Redirect::to("/carrito").into_response();
    }

    let mut wizard = load_wizard(&session).await;

    // Prefill contact fields from the logged-in profile once
    if let Some(user) = &user
        && wizard.contact == ContactDraft::default()
    {
        wizard.contact.full_name = user.name.clone();
        wizard.contact.email = user.email.to_string();
    }

    CheckoutTemplate {
        wizard: WizardView::build(&wizard),
        cart: CartView::from(&cart),
        user_name: user.map(|u| u.name).unwrap_or_default(),
        flash: take_flash(&session).await,
    }
    .into_response()
}

/// Submit step 1 (delivery).
#[instrument(skip(session))]
pub async fn submit_delivery(
    session: Session,
    Form(form): Form<DeliveryForm>,
) -> Result<impl IntoResponse> {
    let mut wizard = load_wizard(&session).await;
    wizard.submit_delivery(DeliveryDraft {
        method: DeliveryMethod::from_param(&form.metodo),
        address: form.direccion.trim().to_string(),
        city: form.ciudad.trim().to_string(),
        reference: form.referencia.trim().to_string(),
    });
    save_wizard(&session, &wizard).await?;
    Ok(Redirect::to("/checkout"))
}

/// Submit step 2 (contact).
#[instrument(skip(session))]
pub async fn submit_contact(
    session: Session,
    Form(form): Form<ContactForm>,
) -> Result<impl IntoResponse> {
    let mut wizard = load_wizard(&session).await;
    wizard.submit_contact(ContactDraft {
        full_name: form.nombre.trim().to_string(),
        phone: form.telefono.trim().to_string(),
        email: form.correo.trim().to_string(),
    });
    save_wizard(&session, &wizard).await?;
    Ok(Redirect::to("/checkout"))
}

/// Submit step 3 (payment).
#[instrument(skip(session))]
pub async fn submit_payment(
    session: Session,
    Form(form): Form<PaymentForm>,
) -> Result<impl IntoResponse> {
    let mut wizard = load_wizard(&session).await;
    wizard.submit_payment(PaymentDraft {
        method: PaymentMethod::from_param(&form.metodo),
    });
    save_wizard(&session, &wizard).await?;
    Ok(Redirect::to("/checkout"))
}

/// Toggle a step header open/closed without touching progress.
#[instrument(skip(session))]
pub async fn toggle_step(
    session: Session,
    Form(form): Form<ToggleForm>,
) -> Result<impl IntoResponse> {
    let mut wizard = load_wizard(&session).await;
    if let Some(step) = Step::from_number(form.paso) {
        wizard.toggle(step);
        save_wizard(&session, &wizard).await?;
    }
    Ok(Redirect::to("/checkout"))
}

/// Confirm the order.
///
/// Only valid from the summary step with a non-empty cart; anything
/// else bounces back to the accordion.
#[instrument(skip(state, session, user))]
pub async fn confirm(
    State(state): State<AppState>,
    session: Session,
    OptionalUser(user): OptionalUser,
) -> Response {
    let cart = load_cart(&session).await;
    let wizard = load_wizard(&session).await;

    if cart.is_empty() {
        return Redirect::to("/carrito").into_response();
    }
    if !wizard.can_confirm() {
        // Confirm is disabled until the summary step is active
        return Redirect::to("/checkout").into_response();
    }

    let address = match wizard.delivery.method {
        DeliveryMethod::Delivery => format!(
            "{}, {} ({})",
            wizard.delivery.address, wizard.delivery.city, wizard.delivery.reference
        ),
        DeliveryMethod::Pickup => "Recojo en tienda".to_string(),
    };

    let pedido = NuevoPedido {
        id_usuario: user.as_ref().map(|u| u.id),
        metodo_entrega: wizard.delivery.method.as_wire().to_string(),
        metodo_pago: wizard.payment.method.as_wire().to_string(),
        direccion_entrega: address,
        nombre_contacto: wizard.contact.full_name.clone(),
        telefono_contacto: wizard.contact.phone.clone(),
        correo_contacto: wizard.contact.email.clone(),
        total: cart.total().display(),
        detalles: cart
            .lines()
            .iter()
            .map(|line| DetallePedidoDto {
                id_producto: line.product_id,
                cantidad: line.quantity,
                precio_unitario: line.unit_price().display(),
            })
            .collect(),
    };

    match state.api().create_order(&pedido).await {
        Ok(order) => {
            // Draft and cart are discarded after submission
            let mut cart = cart;
            cart.clear();
            if let Err(e) = save_cart(&session, &cart).await {
                tracing::error!("Failed to clear cart after order: {e}");
            }
            clear_wizard(&session).await;

            // Stock counts changed server-side; drop the cached catalog
            state.api().invalidate_catalog().await;

            ConfirmedTemplate {
                order_id: order.id.to_string(),
                total: pedido.total,
                user_name: user.map(|u| u.name).unwrap_or_default(),
            }
            .into_response()
        }
        Err(e) => {
            tracing::error!("Failed to create order: {e}");
            flash_error(&session, "No se pudo registrar el pedido. Intente nuevamente.").await;
            Redirect::to("/checkout").into_response()
        }
    }
}
