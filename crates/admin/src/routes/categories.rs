//! Categories CRUD page.

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

use botica_core::CategoryId;

use crate::api::types::{CategoriaDto, CategoriaInput};
use crate::error::Result;
use crate::filters;
use crate::flash::{Flash, flash_error, flash_success, take_flash};
use crate::middleware::RequireAdminAuth;
use crate::routes::{download_response, matches_search};
use crate::state::AppState;

/// Category row for the list table.
#[derive(Debug, Clone)]
pub struct CategoryRowView {
    pub id: i32,
    pub name: String,
    pub description: String,
    pub active: bool,
}

impl From<&CategoriaDto> for CategoryRowView {
    fn from(dto: &CategoriaDto) -> Self {
        Self {
            id: dto.id_categoria.as_i32(),
            name: dto.nombre.clone(),
            description: dto.descripcion.clone().unwrap_or_default(),
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
pub struct CategoryForm {
    pub nombre: String,
    #[serde(default)]
    pub descripcion: String,
}

/// Categories list page template.
#[derive(Template, WebTemplate)]
#[template(path = "categories/index.html")]
pub struct CategoriesIndexTemplate {
    pub admin_name: String,
    pub current_path: String,
    pub categories: Vec<CategoryRowView>,
    pub search_query: String,
    pub flash: Option<Flash>,
}

/// Category create/edit form template.
#[derive(Template, WebTemplate)]
#[template(path = "categories/form.html")]
pub struct CategoryFormTemplate {
    pub admin_name: String,
    pub current_path: String,
    pub id: String,
    pub name: String,
    pub description: String,
    pub is_new: bool,
    pub flash: Option<Flash>,
}

/// Categories list page handler (search: name, description).
#[instrument(skip(admin, state, session))]
pub async fn index(
    RequireAdminAuth(admin): RequireAdminAuth,
    State(state): State<AppState>,
    session: Session,
    Query(query): Query<SearchQuery>,
) -> impl IntoResponse {
    let search = query.q.unwrap_or_default();

    let categories = match state.api().list_categories().await {
        Ok(dtos) => dtos
            .iter()
            .map(CategoryRowView::from)
            .filter(|row| matches_search(&search, &[&row.name, &row.description]))
            .collect(),
        Err(e) => {
            tracing::error!("Failed to fetch categories: {e}");
            flash_error(&session, "No se pudo cargar la lista de categorias").await;
            Vec::new()
        }
    };

    CategoriesIndexTemplate {
        admin_name: admin.name,
        current_path: "/categorias".to_string(),
        categories,
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
    CategoryFormTemplate {
        admin_name: admin.name,
        current_path: "/categorias".to_string(),
        id: String::new(),
        name: String::new(),
        description: String::new(),
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
    let categories = state.api().list_categories().await?;
    let dto = categories
        .iter()
        .find(|c| c.id_categoria == CategoryId::new(id))
        .ok_or_else(|| crate::error::AppError::NotFound(format!("categoria {id}")))?;

    Ok(CategoryFormTemplate {
        admin_name: admin.name,
        current_path: "/categorias".to_string(),
        id: dto.id_categoria.to_string(),
        name: dto.nombre.clone(),
        description: dto.descripcion.clone().unwrap_or_default(),
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
    Form(form): Form<CategoryForm>,
) -> Redirect {
    if form.nombre.trim().is_empty() {
        flash_error(&session, "El nombre es obligatorio").await;
        return Redirect::to("/categorias/nuevo");
    }

    let input = CategoriaInput {
        nombre: form.nombre.trim().to_string(),
        descripcion: form.descripcion.trim().to_string(),
    };

    match state.api().create_category(&input).await {
        Ok(()) => flash_success(&session, "Categoria registrada").await,
        Err(e) => {
            tracing::error!("Failed to create category: {e}");
            flash_error(&session, "No se pudo registrar la categoria").await;
        }
    }

    Redirect::to("/categorias")
}

/// Update action.
#[instrument(skip(state, session, form))]
pub async fn update(
    RequireAdminAuth(_admin): RequireAdminAuth,
    State(state): State<AppState>,
    session: Session,
    Path(id): Path<i32>,
    Form(form): Form<CategoryForm>,
) -> Redirect {
    let input = CategoriaInput {
        nombre: form.nombre.trim().to_string(),
        descripcion: form.descripcion.trim().to_string(),
    };

    match state.api().update_category(CategoryId::new(id), &input).await {
        Ok(()) => flash_success(&session, "Categoria actualizada").await,
        Err(e) => {
            tracing::error!("Failed to update category {id}: {e}");
            flash_error(&session, "No se pudo actualizar la categoria").await;
        }
    }

    Redirect::to("/categorias")
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

    match state.api().set_category_active(CategoryId::new(id), active).await {
        Ok(()) => flash_success(&session, "Estado actualizado").await,
        Err(e) => {
            tracing::error!("Failed to toggle category {id}: {e}");
            flash_error(&session, "No se pudo cambiar el estado").await;
        }
    }

    Redirect::to("/categorias")
}

/// Delete action.
#[instrument(skip(state, session))]
pub async fn delete(
    RequireAdminAuth(_admin): RequireAdminAuth,
    State(state): State<AppState>,
    session: Session,
    Path(id): Path<i32>,
) -> Redirect {
    match state.api().delete_category(CategoryId::new(id)).await {
        Ok(()) => flash_success(&session, "Categoria eliminada").await,
        Err(e) => {
            tracing::error!("Failed to delete category {id}: {e}");
            flash_error(&session, "No se pudo eliminar la categoria").await;
        }
    }

    Redirect::to("/categorias")
}

/// CSV export, streamed from the backend.
#[instrument(skip(state, session))]
pub async fn export(
    RequireAdminAuth(_admin): RequireAdminAuth,
    State(state): State<AppState>,
    session: Session,
) -> Response {
    match state.api().export_categories().await {
        Ok(file) => download_response(file),
        Err(e) => {
            tracing::error!("Category export failed: {e}");
            flash_error(&session, "No se pudo exportar el archivo").await;
            Redirect::to("/categorias").into_response()
        }
    }
}
