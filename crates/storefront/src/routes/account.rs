//! Account route handlers (profile + order history).
//!
//! All routes here require a logged-in shopper. Profile edits go
//! through a typed partial update; the email is shown but never sent
//! back to the backend.

use askama::Template;
use askama_web::WebTemplate;
use axum::{Form, extract::State, response::IntoResponse, response::Redirect};
use serde::Deserialize;
use tower_sessions::Session;
use tracing::instrument;

use crate::error::Result;
use crate::filters;
use crate::flash::{Flash, flash_error, flash_success, take_flash};
use crate::middleware::{RequireUser, set_current_user};
use crate::models::{CurrentUser, Order, ProfileUpdate};
use crate::state::AppState;

// =============================================================================
// View Types
// =============================================================================

/// Profile display data.
#[derive(Debug, Clone)]
pub struct ProfileView {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone: String,
    pub address: String,
    pub image: String,
}

/// Order row display data.
#[derive(Debug, Clone)]
pub struct OrderView {
    pub id: i32,
    pub date: String,
    pub status: String,
    pub total: String,
}

impl From<&Order> for OrderView {
    fn from(order: &Order) -> Self {
        Self {
            id: order.id.as_i32(),
            date: order.date.clone(),
            status: order.status.clone(),
            total: order.total.display(),
        }
    }
}

// =============================================================================
// Form Types
// =============================================================================

/// Profile update form data. Email is intentionally absent.
#[derive(Debug, Deserialize)]
pub struct ProfileForm {
    pub nombres: String,
    pub apellidos: String,
    #[serde(default)]
    pub telefono: String,
    #[serde(default)]
    pub direccion: String,
}

// =============================================================================
// Templates
// =============================================================================

/// Profile page template.
#[derive(Template, WebTemplate)]
#[template(path = "account/show.html")]
pub struct AccountTemplate {
    pub profile: ProfileView,
    pub user_name: String,
    pub flash: Option<Flash>,
}

/// Order history page template.
#[derive(Template, WebTemplate)]
#[template(path = "account/orders.html")]
pub struct OrdersTemplate {
    pub orders: Vec<OrderView>,
    pub user_name: String,
    pub flash: Option<Flash>,
}

// =============================================================================
// Handlers
// =============================================================================

/// Display the profile page.
#[instrument(skip(state, session, user))]
pub async fn show(
    RequireUser(user): RequireUser,
    State(state): State<AppState>,
    session: Session,
) -> Result<impl IntoResponse> {
    let profile = state.api().get_user(user.id).await?;

    Ok(AccountTemplate {
        profile: ProfileView {
            first_name: profile.first_name,
            last_name: profile.last_name,
            email: profile.email.to_string(),
            phone: profile.phone,
            address: profile.address,
            image: profile.image,
        },
        user_name: user.name,
        flash: take_flash(&session).await,
    })
}

/// Apply a profile update.
#[instrument(skip(state, session, user, form))]
pub async fn update(
    RequireUser(user): RequireUser,
    State(state): State<AppState>,
    session: Session,
    Form(form): Form<ProfileForm>,
) -> Result<impl IntoResponse> {
    let update = ProfileUpdate {
        first_name: non_empty(form.nombres),
        last_name: non_empty(form.apellidos),
        phone: non_empty(form.telefono),
        address: non_empty(form.direccion),
        image: None,
    };

    if update.is_empty() {
        flash_error(&session, "No hay cambios que guardar").await;
        return Ok(Redirect::to("/cuenta"));
    }

    match state.api().update_user(user.id, update).await {
        Ok(profile) => {
            // Keep the header name in sync with the new profile
            let refreshed = CurrentUser {
                id: profile.id,
                email: profile.email.clone(),
                name: profile.first_name.clone(),
                role: profile.role,
            };
            set_current_user(&session, &refreshed).await?;
            flash_success(&session, "Perfil actualizado").await;
        }
        Err(e) => {
            tracing::error!("Profile update failed: {e}");
            flash_error(&session, "No se pudo actualizar el perfil").await;
        }
    }

    Ok(Redirect::to("/cuenta"))
}

/// Display the order history page.
#[instrument(skip(state, session, user))]
pub async fn orders(
    RequireUser(user): RequireUser,
    State(state): State<AppState>,
    session: Session,
) -> Result<impl IntoResponse> {
    let orders = state.api().list_orders_for_user(user.id).await?;

    Ok(OrdersTemplate {
        orders: orders.iter().map(OrderView::from).collect(),
        user_name: user.name,
        flash: take_flash(&session).await,
    })
}

fn non_empty(value: String) -> Option<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}
