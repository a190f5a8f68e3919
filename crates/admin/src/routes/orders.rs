//! Orders management page.
//!
//! Orders are created by shoppers; the back-office lists them, moves
//! them through their status flow, deletes mistakes, and exports CSV.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form,
    extract::{Path, Query, State},
    response::{IntoResponse, Redirect, Response},
};
use serde::Deserialize;
use tower_sessions::Session;
use tracing::instrument;

use botica_core::{OrderId, Price};

use crate::api::types::PedidoDto;
use crate::filters;
use crate::flash::{Flash, flash_error, flash_success, take_flash};
use crate::middleware::RequireAdminAuth;
use crate::routes::{download_response, matches_search};
use crate::state::AppState;

/// Statuses an order can be moved to from the list page.
pub const ORDER_STATUSES: &[&str] = &["PENDIENTE", "PAGADO", "ENVIADO", "ENTREGADO", "CANCELADO"];

/// Order row for the list table.
#[derive(Debug, Clone)]
pub struct OrderRowView {
    pub id: i32,
    pub date: String,
    pub customer: String,
    pub status: String,
    pub delivery: String,
    pub payment: String,
    pub total: String,
}

impl From<&PedidoDto> for OrderRowView {
    fn from(dto: &PedidoDto) -> Self {
        Self {
            id: dto.id_pedido.as_i32(),
            date: dto.fecha.clone().unwrap_or_default(),
            customer: dto.nombre_contacto.clone().unwrap_or_default(),
            status: dto.estado.clone().unwrap_or_default(),
            delivery: dto.metodo_entrega.clone().unwrap_or_default(),
            payment: dto.metodo_pago.clone().unwrap_or_default(),
            total: dto
                .total
                .as_deref()
                .map_or(Price::ZERO, Price::parse)
                .display(),
        }
    }
}

/// List page query parameters.
#[derive(Debug, Deserialize)]
pub struct SearchQuery {
    pub q: Option<String>,
}

/// Status update form data.
#[derive(Debug, Deserialize)]
pub struct StatusForm {
    pub estado: String,
}

/// Orders list page template.
#[derive(Template, WebTemplate)]
#[template(path = "orders/index.html")]
pub struct OrdersIndexTemplate {
    pub admin_name: String,
    pub current_path: String,
    pub orders: Vec<OrderRowView>,
    pub statuses: Vec<String>,
    pub search_query: String,
    pub flash: Option<Flash>,
}

/// Orders list page handler (search: customer, status).
#[instrument(skip(admin, state, session))]
pub async fn index(
    RequireAdminAuth(admin): RequireAdminAuth,
    State(state): State<AppState>,
    session: Session,
    Query(query): Query<SearchQuery>,
) -> impl IntoResponse {
    let search = query.q.unwrap_or_default();

    let orders = match state.api().list_orders().await {
        Ok(dtos) => dtos
            .iter()
            .map(OrderRowView::from)
            .filter(|row| matches_search(&search, &[&row.customer, &row.status]))
            .collect(),
        Err(e) => {
            tracing::error!("Failed to fetch orders: {e}");
            flash_error(&session, "No se pudo cargar la lista de pedidos").await;
            Vec::new()
        }
    };

    OrdersIndexTemplate {
        admin_name: admin.name,
        current_path: "/pedidos".to_string(),
        orders,
        statuses: ORDER_STATUSES.iter().map(ToString::to_string).collect(),
        search_query: search,
        flash: take_flash(&session).await,
    }
}

/// Move an order to a new status.
#[instrument(skip(state, session))]
pub async fn update_status(
    RequireAdminAuth(_admin): RequireAdminAuth,
    State(state): State<AppState>,
    session: Session,
    Path(id): Path<i32>,
    Form(form): Form<StatusForm>,
) -> Redirect {
    if !ORDER_STATUSES.contains(&form.estado.as_str()) {
        flash_error(&session, "Estado de pedido invalido").await;
        return Redirect::to("/pedidos");
    }

    match state
        .api()
        .update_order_status(OrderId::new(id), &form.estado)
        .await
    {
        Ok(()) => flash_success(&session, "Pedido actualizado").await,
        Err(e) => {
            tracing::error!("Failed to update order {id}: {e}");
            flash_error(&session, "No se pudo actualizar el pedido").await;
        }
    }

    Redirect::to("/pedidos")
}

/// Delete action.
#[instrument(skip(state, session))]
pub async fn delete(
    RequireAdminAuth(_admin): RequireAdminAuth,
    State(state): State<AppState>,
    session: Session,
    Path(id): Path<i32>,
) -> Redirect {
    match state.api().delete_order(OrderId::new(id)).await {
        Ok(()) => flash_success(&session, "Pedido eliminado").await,
        Err(e) => {
            tracing::error!("Failed to delete order {id}: {e}");
            flash_error(&session, "No se pudo eliminar el pedido").await;
        }
    }

    Redirect::to("/pedidos")
}

/// CSV export, streamed from the backend.
#[instrument(skip(state, session))]
pub async fn export(
    RequireAdminAuth(_admin): RequireAdminAuth,
    State(state): State<AppState>,
    session: Session,
) -> Response {
    match state.api().export_orders().await {
        Ok(file) => download_response(file),
        Err(e) => {
            tracing::error!("Order export failed: {e}");
            flash_error(&session, "No se pudo exportar el archivo").await;
            Redirect::to("/pedidos").into_response()
        }
    }
}
