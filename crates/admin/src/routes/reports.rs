//! Sales reports page.
//!
//! Reports are generated server-side; this page lists the summary rows
//! and streams the CSV/XLSX files the backend produces.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    extract::{Query, State},
    response::{IntoResponse, Redirect, Response},
};
use serde::Deserialize;
use tower_sessions::Session;
use tracing::instrument;

use botica_core::Price;

use crate::api::types::ReporteVentaDto;
use crate::filters;
use crate::flash::{Flash, flash_error, take_flash};
use crate::middleware::RequireAdminAuth;
use crate::routes::download_response;
use crate::state::AppState;

/// Report row for the table.
#[derive(Debug, Clone)]
pub struct ReportRowView {
    pub period: String,
    pub orders: u32,
    pub units: u32,
    pub total: String,
}

impl From<&ReporteVentaDto> for ReportRowView {
    fn from(dto: &ReporteVentaDto) -> Self {
        Self {
            period: dto.periodo.clone(),
            orders: dto.pedidos,
            units: dto.unidades,
            total: Price::parse(&dto.total).display(),
        }
    }
}

/// Export query parameters.
#[derive(Debug, Deserialize)]
pub struct ExportQuery {
    pub formato: Option<String>,
}

/// Reports page template.
#[derive(Template, WebTemplate)]
#[template(path = "reports/index.html")]
pub struct ReportsIndexTemplate {
    pub admin_name: String,
    pub current_path: String,
    pub rows: Vec<ReportRowView>,
    pub flash: Option<Flash>,
}

/// Reports page handler.
#[instrument(skip(admin, state, session))]
pub async fn index(
    RequireAdminAuth(admin): RequireAdminAuth,
    State(state): State<AppState>,
    session: Session,
) -> impl IntoResponse {
    let rows = match state.api().sales_report().await {
        Ok(dtos) => dtos.iter().map(ReportRowView::from).collect(),
        Err(e) => {
            tracing::error!("Failed to fetch sales report: {e}");
            flash_error(&session, "No se pudo cargar el reporte de ventas").await;
            Vec::new()
        }
    };

    ReportsIndexTemplate {
        admin_name: admin.name,
        current_path: "/reportes".to_string(),
        rows,
        flash: take_flash(&session).await,
    }
}

/// Export the sales report (CSV by default, XLSX with `?formato=xlsx`).
#[instrument(skip(state, session))]
pub async fn export(
    RequireAdminAuth(_admin): RequireAdminAuth,
    State(state): State<AppState>,
    session: Session,
    Query(query): Query<ExportQuery>,
) -> Response {
    let format = query.formato.unwrap_or_else(|| "csv".to_string());

    match state.api().export_sales(&format).await {
        Ok(file) => download_response(file),
        Err(e) => {
            tracing::error!("Sales export failed: {e}");
            flash_error(&session, "No se pudo exportar el reporte").await;
            Redirect::to("/reportes").into_response()
        }
    }
}
