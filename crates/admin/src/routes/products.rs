//! Products CRUD page.
//!
//! List, create, edit, toggle, delete, and CSV export. The create and
//! edit forms are multipart so an image can be attached; uploads are
//! validated (type, size) and embedded as a base64 data URL, which is
//! what the backend stores.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    extract::{Multipart, Path, Query, State},
    response::{IntoResponse, Redirect, Response},
};
use base64::Engine as _;
use rust_decimal::Decimal;
use serde::Deserialize;
use tower_sessions::Session;
use tracing::instrument;

use botica_core::{Price, ProductId};

use crate::api::types::{ProductoDto, ProductoInput};
use crate::error::Result;
use crate::filters;
use crate::flash::{Flash, flash_error, flash_success, take_flash};
use crate::middleware::RequireAdminAuth;
use crate::routes::{download_response, matches_search};
use crate::state::AppState;

/// Maximum accepted image upload size (1 MiB).
const MAX_IMAGE_BYTES: usize = 1024 * 1024;

/// Accepted image content types.
const ALLOWED_IMAGE_TYPES: &[&str] = &["image/png", "image/jpeg"];

// =============================================================================
// View Types
// =============================================================================

/// Product row for the list table. Admins see active and inactive.
#[derive(Debug, Clone)]
pub struct ProductRowView {
    pub id: i32,
    pub name: String,
    pub presentation: String,
    pub category: String,
    pub provider: String,
    pub price: String,
    pub stock: i32,
    pub active: bool,
}

impl From<&ProductoDto> for ProductRowView {
    fn from(dto: &ProductoDto) -> Self {
        Self {
            id: dto.id_producto.as_i32(),
            name: dto.nombre.clone(),
            presentation: dto.presentacion.clone().unwrap_or_default(),
            category: dto.categoria.clone().unwrap_or_default(),
            provider: dto.proveedor.clone().unwrap_or_default(),
            price: Price::parse(&dto.precio).display(),
            stock: dto.stock,
            active: dto.activo,
        }
    }
}

/// Form values for the create/edit page.
#[derive(Debug, Clone, Default)]
pub struct ProductFormView {
    pub id: String,
    pub name: String,
    pub price: String,
    pub presentation: String,
    pub description: String,
    pub stock: String,
    pub category: String,
    pub provider: String,
    pub image: String,
}

// =============================================================================
// Query Types
// =============================================================================

/// List page query parameters.
#[derive(Debug, Deserialize)]
pub struct SearchQuery {
    pub q: Option<String>,
}

// =============================================================================
// Templates
// =============================================================================

/// Products list page template.
#[derive(Template, WebTemplate)]
#[template(path = "products/index.html")]
pub struct ProductsIndexTemplate {
    pub admin_name: String,
    pub current_path: String,
    pub products: Vec<ProductRowView>,
    pub search_query: String,
    pub flash: Option<Flash>,
}

/// Product create/edit form template.
#[derive(Template, WebTemplate)]
#[template(path = "products/form.html")]
pub struct ProductFormTemplate {
    pub admin_name: String,
    pub current_path: String,
    pub form: ProductFormView,
    pub is_new: bool,
    pub flash: Option<Flash>,
}

// =============================================================================
// Handlers
// =============================================================================

/// Products list page handler.
///
/// Fetches the full list and applies the search term client-side
/// (name, presentation, category, provider).
#[instrument(skip(admin, state, session))]
pub async fn index(
    RequireAdminAuth(admin): RequireAdminAuth,
    State(state): State<AppState>,
    session: Session,
    Query(query): Query<SearchQuery>,
) -> impl IntoResponse {
    let search = query.q.unwrap_or_default();

    let products = match state.api().list_products().await {
        Ok(dtos) => dtos
            .iter()
            .map(ProductRowView::from)
            .filter(|row| {
                matches_search(
                    &search,
                    &[&row.name, &row.presentation, &row.category, &row.provider],
                )
            })
            .collect(),
        Err(e) => {
            tracing::error!("Failed to fetch products: {e}");
            flash_error(&session, "No se pudo cargar la lista de productos").await;
            Vec::new()
        }
    };

    ProductsIndexTemplate {
        admin_name: admin.name,
        current_path: "/productos".to_string(),
        products,
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
    ProductFormTemplate {
        admin_name: admin.name,
        current_path: "/productos".to_string(),
        form: ProductFormView::default(),
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
    let dto = state.api().get_product(ProductId::new(id)).await?;

    Ok(ProductFormTemplate {
        admin_name: admin.name,
        current_path: "/productos".to_string(),
        form: ProductFormView {
            id: dto.id_producto.to_string(),
            name: dto.nombre,
            price: Price::parse(&dto.precio).amount().to_string(),
            presentation: dto.presentacion.unwrap_or_default(),
            description: dto.descripcion.unwrap_or_default(),
            stock: dto.stock.to_string(),
            category: dto.categoria.unwrap_or_default(),
            provider: dto.proveedor.unwrap_or_default(),
            image: dto.imagen.unwrap_or_default(),
        },
        is_new: false,
        flash: take_flash(&session).await,
    })
}

/// Create action (multipart).
#[instrument(skip(state, session, multipart))]
pub async fn create(
    RequireAdminAuth(_admin): RequireAdminAuth,
    State(state): State<AppState>,
    session: Session,
    multipart: Multipart,
) -> Redirect {
    let input = match read_product_form(multipart).await {
        Ok(input) => input,
        Err(message) => {
            flash_error(&session, message).await;
            return Redirect::to("/productos/nuevo");
        }
    };

    match state.api().create_product(&input).await {
        Ok(()) => flash_success(&session, "Producto registrado").await,
        Err(e) => {
            tracing::error!("Failed to create product: {e}");
            flash_error(&session, "No se pudo registrar el producto").await;
        }
    }

    Redirect::to("/productos")
}

/// Update action (multipart).
#[instrument(skip(state, session, multipart))]
pub async fn update(
    RequireAdminAuth(_admin): RequireAdminAuth,
    State(state): State<AppState>,
    session: Session,
    Path(id): Path<i32>,
    multipart: Multipart,
) -> Redirect {
    let input = match read_product_form(multipart).await {
        Ok(input) => input,
        Err(message) => {
            flash_error(&session, message).await;
            return Redirect::to(&format!("/productos/{id}/editar"));
        }
    };

    match state.api().update_product(ProductId::new(id), &input).await {
        Ok(()) => flash_success(&session, "Producto actualizado").await,
        Err(e) => {
            tracing::error!("Failed to update product {id}: {e}");
            flash_error(&session, "No se pudo actualizar el producto").await;
        }
    }

    Redirect::to("/productos")
}

/// Toggle the active flag.
#[derive(Debug, Deserialize)]
pub struct ToggleForm {
    pub activo: String,
}

/// Toggle action: flips visibility for shoppers, then reloads the list.
#[instrument(skip(state, session))]
pub async fn toggle(
    RequireAdminAuth(_admin): RequireAdminAuth,
    State(state): State<AppState>,
    session: Session,
    Path(id): Path<i32>,
    axum::Form(form): axum::Form<ToggleForm>,
) -> Redirect {
    let active = form.activo == "true";

    match state.api().set_product_active(ProductId::new(id), active).await {
        Ok(()) => flash_success(&session, "Estado actualizado").await,
        Err(e) => {
            tracing::error!("Failed to toggle product {id}: {e}");
            flash_error(&session, "No se pudo cambiar el estado").await;
        }
    }

    Redirect::to("/productos")
}

/// Delete action.
#[instrument(skip(state, session))]
pub async fn delete(
    RequireAdminAuth(_admin): RequireAdminAuth,
    State(state): State<AppState>,
    session: Session,
    Path(id): Path<i32>,
) -> Redirect {
    match state.api().delete_product(ProductId::new(id)).await {
        Ok(()) => flash_success(&session, "Producto eliminado").await,
        Err(e) => {
            tracing::error!("Failed to delete product {id}: {e}");
            flash_error(&session, "No se pudo eliminar el producto").await;
        }
    }

    Redirect::to("/productos")
}

/// CSV export, streamed from the backend.
#[instrument(skip(state, session))]
pub async fn export(
    RequireAdminAuth(_admin): RequireAdminAuth,
    State(state): State<AppState>,
    session: Session,
) -> Response {
    match state.api().export_products().await {
        Ok(file) => download_response(file),
        Err(e) => {
            tracing::error!("Product export failed: {e}");
            flash_error(&session, "No se pudo exportar el archivo").await;
            Redirect::to("/productos").into_response()
        }
    }
}

// =============================================================================
// Form Parsing
// =============================================================================

/// Read and validate the multipart product form.
///
/// Returns a shopper-visible message on validation failure.
async fn read_product_form(mut multipart: Multipart) -> std::result::Result<ProductoInput, String> {
    let mut nombre = String::new();
    let mut precio = String::new();
    let mut presentacion = String::new();
    let mut descripcion = String::new();
    let mut stock = String::new();
    let mut categoria = String::new();
    let mut proveedor = String::new();
    let mut imagen: Option<String> = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|_| "Formulario invalido".to_string())?
    {
        let name = field.name().unwrap_or_default().to_string();
        match name.as_str() {
            "nombre" => nombre = read_text(field).await?,
            "precio" => precio = read_text(field).await?,
            "presentacion" => presentacion = read_text(field).await?,
            "descripcion" => descripcion = read_text(field).await?,
            "stock" => stock = read_text(field).await?,
            "categoria" => categoria = read_text(field).await?,
            "proveedor" => proveedor = read_text(field).await?,
            "imagen" => imagen = read_image(field).await?,
            _ => {}
        }
    }

    if nombre.trim().is_empty() {
        return Err("El nombre es obligatorio".to_string());
    }

    let amount = precio
        .trim()
        .replace(',', ".")
        .parse::<Decimal>()
        .map_err(|_| "Precio invalido".to_string())?;
    if amount.is_sign_negative() {
        return Err("El precio no puede ser negativo".to_string());
    }

    let stock = stock
        .trim()
        .parse::<i32>()
        .map_err(|_| "Stock invalido".to_string())?;
    if stock < 0 {
        return Err("El stock no puede ser negativo".to_string());
    }

    Ok(ProductoInput {
        nombre: nombre.trim().to_string(),
        precio: Price::new(amount).display(),
        imagen,
        presentacion: presentacion.trim().to_string(),
        descripcion: descripcion.trim().to_string(),
        stock,
        categoria: categoria.trim().to_string(),
        proveedor: proveedor.trim().to_string(),
    })
}

async fn read_text(field: axum::extract::multipart::Field<'_>) -> std::result::Result<String, String> {
    field
        .text()
        .await
        .map_err(|_| "Formulario invalido".to_string())
}

/// Validate an uploaded image and embed it as a base64 data URL.
///
/// An empty file part (no file chosen) yields `None` so the existing
/// image is kept.
async fn read_image(
    field: axum::extract::multipart::Field<'_>,
) -> std::result::Result<Option<String>, String> {
    let content_type = field.content_type().unwrap_or_default().to_string();
    let bytes = field
        .bytes()
        .await
        .map_err(|_| "No se pudo leer la imagen".to_string())?;

    if bytes.is_empty() {
        return Ok(None);
    }

    if !ALLOWED_IMAGE_TYPES.contains(&content_type.as_str()) {
        return Err("La imagen debe ser PNG o JPEG".to_string());
    }

    if bytes.len() > MAX_IMAGE_BYTES {
        return Err("La imagen no debe superar 1 MB".to_string());
    }

    let encoded = base64::engine::general_purpose::STANDARD.encode(&bytes);
    Ok(Some(format!("data:{content_type};base64,{encoded}")))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_product_row_shows_inactive_records() {
        let dto = ProductoDto {
            id_producto: ProductId::new(4),
            nombre: "Vitamina C".to_string(),
            precio: "S/.15,00".to_string(),
            imagen: None,
            presentacion: Some("Capsula".to_string()),
            descripcion: None,
            stock: 0,
            activo: false,
            categoria: Some("Vitaminas".to_string()),
            proveedor: None,
        };
        let row = ProductRowView::from(&dto);
        assert!(!row.active);
        assert_eq!(row.price, "S/.15.00");
        assert_eq!(row.provider, "");
    }
}
