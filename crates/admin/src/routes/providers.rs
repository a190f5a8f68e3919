//! Providers CRUD page.
//!
//! Providers carry a RUC (Peruvian tax ID); the form validates its
//! shape (11 digits) before anything reaches the backend.

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

use botica_core::ProviderId;

use crate::api::types::{ProveedorDto, ProveedorInput};
use crate::error::Result;
use crate::filters;
use crate::flash::{Flash, flash_error, flash_success, take_flash};
use crate::middleware::RequireAdminAuth;
use crate::routes::{download_response, matches_search};
use crate::state::AppState;

/// Expected RUC length.
const RUC_LENGTH: usize = 11;

/// Provider row for the list table.
#[derive(Debug, Clone)]
pub struct ProviderRowView {
    pub id: i32,
    pub name: String,
    pub ruc: String,
    pub phone: String,
    pub email: String,
    pub active: bool,
}

impl From<&ProveedorDto> for ProviderRowView {
    fn from(dto: &ProveedorDto) -> Self {
        Self {
            id: dto.id_proveedor.as_i32(),
            name: dto.nombre.clone(),
            ruc: dto.ruc.clone(),
            phone: dto.telefono.clone().unwrap_or_default(),
            email: dto.correo.clone().unwrap_or_default(),
            active: dto.activo,
        }
    }
}

/// List page query parameters.
#[derive(Debug, Deserialize)]
pub struct SearchQuery {
    pub q: Option<String>,
}

/// Create/edit form data.
#[derive(Debug, Deserialize)]
pub struct ProviderForm {
    pub nombre: String,
    pub ruc: String,
    #[serde(default)]
    pub telefono: String,
    #[serde(default)]
    pub correo: String,
}

/// Providers list page template.
#[derive(Template, WebTemplate)]
#[template(path = "providers/index.html")]
pub struct ProvidersIndexTemplate {
    pub admin_name: String,
    pub current_path: String,
    pub providers: Vec<ProviderRowView>,
    pub search_query: String,
    pub flash: Option<Flash>,
}

/// Provider create/edit form template.
#[derive(Template, WebTemplate)]
#[template(path = "providers/form.html")]
pub struct ProviderFormTemplate {
    pub admin_name: String,
    pub current_path: String,
    pub id: String,
    pub name: String,
    pub ruc: String,
    pub phone: String,
    pub email: String,
    pub is_new: bool,
    pub flash: Option<Flash>,
}

/// Providers list page handler (search: name, RUC, email).
#[instrument(skip(admin, state, session))]
pub async fn index(
    RequireAdminAuth(admin): RequireAdminAuth,
    State(state): State<AppState>,
    session: Session,
    Query(query): Query<SearchQuery>,
) -> impl IntoResponse {
    let search = query.q.unwrap_or_default();

    let providers = match state.api().list_providers().await {
        Ok(dtos) => dtos
            .iter()
            .map(ProviderRowView::from)
            .filter(|row| matches_search(&search, &[&row.name, &row.ruc, &row.email]))
            .collect(),
        Err(e) => {
            tracing::error!("Failed to fetch providers: {e}");
            flash_error(&session, "No se pudo cargar la lista de proveedores").await;
            Vec::new()
        }
    };

    ProvidersIndexTemplate {
        admin_name: admin.name,
        current_path: "/proveedores".to_string(),
        providers,
        search_query: search,
        flash: take_flash(&session).await,
    }
}

/// Empty create form.
#[instrument(skip(admin, session))]
pub async fn new_form(
    RequireAdminAuth(admin): RequireAdminAuth,
    session: Session,
) -> impl IntoResponse {
    ProviderFormTemplate {
        admin_name: admin.name,
        current_path: "/proveedores".to_string(),
        id: String::new(),
        name: String::new(),
        ruc: String::new(),
        phone: String::new(),
        email: String::new(),
        is_new: true,
        flash: take_flash(&session).await,
    }
}

/// Pre-filled edit form.
#[instrument(skip(admin, state, session))]
pub async fn edit_form(
    RequireAdminAuth(admin): RequireAdminAuth,
    State(state): State<AppState>,
    session: Session,
    Path(id): Path<i32>,
) -> Result<impl IntoResponse> {
    let providers = state.api().list_providers().await?;
    let dto = providers
        .iter()
        .find(|p| p.id_proveedor == ProviderId::new(id))
        .ok_or_else(|| crate::error::AppError::NotFound(format!("proveedor {id}")))?;

    Ok(ProviderFormTemplate {
        admin_name: admin.name,
        current_path: "/proveedores".to_string(),
        id: dto.id_proveedor.to_string(),
        name: dto.nombre.clone(),
        ruc: dto.ruc.clone(),
        phone: dto.telefono.clone().unwrap_or_default(),
        email: dto.correo.clone().unwrap_or_default(),
        is_new: false,
        flash: take_flash(&session).await,
    })
}

/// Create action.
#[instrument(skip(state, session, form))]
pub async fn create(
    RequireAdminAuth(_admin): RequireAdminAuth,
    State(state): State<AppState>,
    session: Session,
    Form(form): Form<ProviderForm>,
) -> Redirect {
    let input = match validate_provider(form) {
        Ok(input) => input,
        Err(message) => {
            flash_error(&session, message).await;
            return Redirect::to("/proveedores/nuevo");
        }
    };

    match state.api().create_provider(&input).await {
        Ok(()) => flash_success(&session, "Proveedor registrado").await,
        Err(e) => {
            tracing::error!("Failed to create provider: {e}");
            flash_error(&session, "No se pudo registrar el proveedor").await;
        }
    }

    Redirect::to("/proveedores")
}

/// Update action.
#[instrument(skip(state, session, form))]
pub async fn update(
    RequireAdminAuth(_admin): RequireAdminAuth,
    State(state): State<AppState>,
    session: Session,
    Path(id): Path<i32>,
    Form(form): Form<ProviderForm>,
) -> Redirect {
    let input = match validate_provider(form) {
        Ok(input) => input,
        Err(message) => {
            flash_error(&session, message).await;
            return Redirect::to(&format!("/proveedores/{id}/editar"));
        }
    };

    match state.api().update_provider(ProviderId::new(id), &input).await {
        Ok(()) => flash_success(&session, "Proveedor actualizado").await,
        Err(e) => {
            tracing::error!("Failed to update provider {id}: {e}");
            flash_error(&session, "No se pudo actualizar el proveedor").await;
        }
    }

    Redirect::to("/proveedores")
}

/// Toggle form data.
#[derive(Debug, Deserialize)]
pub struct ToggleForm {
    pub activo: String,
}

/// Toggle the active flag.
#[instrument(skip(state, session))]
pub async fn toggle(
    RequireAdminAuth(_admin): RequireAdminAuth,
    State(state): State<AppState>,
    session: Session,
    Path(id): Path<i32>,
    Form(form): Form<ToggleForm>,
) -> Redirect {
    let active = form.activo == "true";

    match state.api().set_provider_active(ProviderId::new(id), active).await {
        Ok(()) => flash_success(&session, "Estado actualizado").await,
        Err(e) => {
            tracing::error!("Failed to toggle provider {id}: {e}");
            flash_error(&session, "No se pudo cambiar el estado").await;
        }
    }

    Redirect::to("/proveedores")
}

/// Delete action.
#[instrument(skip(state, session))]
pub async fn delete(
    RequireAdminAuth(_admin): RequireAdminAuth,
    State(state): State<AppState>,
    session: Session,
    Path(id): Path<i32>,
) -> Redirect {
    match state.api().delete_provider(ProviderId::new(id)).await {
        Ok(()) => flash_success(&session, "Proveedor eliminado").await,
        Err(e) => {
            tracing::error!("Failed to delete provider {id}: {e}");
            flash_error(&session, "No se pudo eliminar el proveedor").await;
        }
    }

    Redirect::to("/proveedores")
}

/// CSV export, streamed from the backend.
#[instrument(skip(state, session))]
pub async fn export(
    RequireAdminAuth(_admin): RequireAdminAuth,
    State(state): State<AppState>,
    session: Session,
) -> Response {
    match state.api().export_providers().await {
        Ok(file) => download_response(file),
        Err(e) => {
            tracing::error!("Provider export failed: {e}");
            flash_error(&session, "No se pudo exportar el archivo").await;
            Redirect::to("/proveedores").into_response()
        }
    }
}

/// Validate the provider form. The RUC must be exactly 11 digits.
fn validate_provider(form: ProviderForm) -> std::result::Result<ProveedorInput, String> {
    let nombre = form.nombre.trim().to_string();
    if nombre.is_empty() {
        return Err("El nombre es obligatorio".to_string());
    }

    let ruc = form.ruc.trim().to_string();
    if ruc.len() != RUC_LENGTH || !ruc.chars().all(|c| c.is_ascii_digit()) {
        return Err(format!("El RUC debe tener {RUC_LENGTH} digitos"));
    }

    Ok(ProveedorInput {
        nombre,
        ruc,
        telefono: form.telefono.trim().to_string(),
        correo: form.correo.trim().to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn form(ruc: &str) -> ProviderForm {
        ProviderForm {
            nombre: "Droguería Lima".to_string(),
            ruc: ruc.to_string(),
            telefono: String::new(),
            correo: String::new(),
        }
    }

    #[test]
    fn test_validate_provider_ok() {
        assert!(validate_provider(form("20123456789")).is_ok());
    }

    #[test]
    fn test_validate_provider_short_ruc() {
        assert!(validate_provider(form("12345")).is_err());
    }

    #[test]
    fn test_validate_provider_non_numeric_ruc() {
        assert!(validate_provider(form("2012345678X")).is_err());
    }
}
