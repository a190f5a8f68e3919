//! Dashboard route handler.

use askama::Template;
use askama_web::WebTemplate;
use axum::{extract::State, response::IntoResponse};
use tower_sessions::Session;
use tracing::instrument;

use crate::filters;
use crate::flash::{Flash, take_flash};
use crate::middleware::RequireAdminAuth;
use crate::state::AppState;

/// Dashboard page template.
#[derive(Template, WebTemplate)]
#[template(path = "dashboard.html")]
pub struct DashboardTemplate {
    pub admin_name: String,
    pub current_path: String,
    pub product_count: usize,
    pub category_count: usize,
    pub provider_count: usize,
    pub user_count: usize,
    pub order_count: usize,
    pub flash: Option<Flash>,
}

/// Dashboard page handler.
///
/// Counts are best-effort; a backend failure on one resource renders
/// as zero rather than failing the page.
#[instrument(skip(admin, state, session))]
pub async fn index(
    RequireAdminAuth(admin): RequireAdminAuth,
    State(state): State<AppState>,
    session: Session,
) -> impl IntoResponse {
    let product_count = state.api().list_products().await.map_or(0, |v| v.len());
    let category_count = state.api().list_categories().await.map_or(0, |v| v.len());
    let provider_count = state.api().list_providers().await.map_or(0, |v| v.len());
    let user_count = state.api().list_users().await.map_or(0, |v| v.len());
    let order_count = state.api().list_orders().await.map_or(0, |v| v.len());

    DashboardTemplate {
        admin_name: admin.name,
        current_path: "/".to_string(),
        product_count,
        category_count,
        provider_count,
        user_count,
        order_count,
        flash: take_flash(&session).await,
    }
}
