//! Users CRUD page.
//!
//! The admin can create back-office or shopper accounts. Passwords are
//! only sent on create (or when explicitly changed); an empty password
//! field on edit leaves the current one untouched.

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

use botica_core::{Role, UserId};

use crate::api::types::{UsuarioDto, UsuarioInput};
use crate::error::Result;
use crate::filters;
use crate::flash::{Flash, flash_error, flash_success, take_flash};
use crate::middleware::RequireAdminAuth;
use crate::routes::{download_response, matches_search};
use crate::state::AppState;

/// Minimum accepted password length.
const MIN_PASSWORD_LENGTH: usize = 6;

/// User row for the list table.
#[derive(Debug, Clone)]
pub struct UserRowView {
    pub id: i32,
    pub name: String,
    pub email: String,
    pub role: String,
    pub phone: String,
    pub active: bool,
}

impl From<&UsuarioDto> for UserRowView {
    fn from(dto: &UsuarioDto) -> Self {
        Self {
            id: dto.id_usuario.as_i32(),
            name: format!("{} {}", dto.nombres, dto.apellidos),
            email: dto.correo.to_string(),
            role: dto.rol.to_string(),
            phone: dto.telefono.clone().unwrap_or_default(),
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
pub struct UserForm {
    pub nombres: String,
    pub apellidos: String,
    pub correo: String,
    #[serde(default)]
    pub contrasena: String,
    pub rol: String,
    #[serde(default)]
    pub telefono: String,
}

/// Users list page template.
#[derive(Template, WebTemplate)]
#[template(path = "users/index.html")]
pub struct UsersIndexTemplate {
    pub admin_name: String,
    pub current_path: String,
    pub users: Vec<UserRowView>,
    pub search_query: String,
    pub flash: Option<Flash>,
}

/// User create/edit form template.
#[derive(Template, WebTemplate)]
#[template(path = "users/form.html")]
pub struct UserFormTemplate {
    pub admin_name: String,
    pub current_path: String,
    pub id: String,
    pub first_names: String,
    pub last_names: String,
    pub email: String,
    pub role: String,
    pub phone: String,
    pub is_new: bool,
    pub flash: Option<Flash>,
}

/// Users list page handler (search: name, email, role).
#[instrument(skip(admin, state, session))]
pub async fn index(
    RequireAdminAuth(admin): RequireAdminAuth,
    State(state): State<AppState>,
    session: Session,
    Query(query): Query<SearchQuery>,
) -> impl IntoResponse {
    let search = query.q.unwrap_or_default();

    let users = match state.api().list_users().await {
        Ok(dtos) => dtos
            .iter()
            .map(UserRowView::from)
            .filter(|row| matches_search(&search, &[&row.name, &row.email, &row.role]))
            .collect(),
        Err(e) => {
            tracing::error!("Failed to fetch users: {e}");
            flash_error(&session, "No se pudo cargar la lista de usuarios").await;
            Vec::new()
        }
    };

    UsersIndexTemplate {
        admin_name: admin.name,
        current_path: "/usuarios".to_string(),
        users,
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
    UserFormTemplate {
        admin_name: admin.name,
        current_path: "/usuarios".to_string(),
        id: String::new(),
        first_names: String::new(),
        last_names: String::new(),
        email: String::new(),
        role: "USER".to_string(),
        phone: String::new(),
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
    let users = state.api().list_users().await?;
    let dto = users
        .iter()
        .find(|u| u.id_usuario == UserId::new(id))
        .ok_or_else(|| crate::error::AppError::NotFound(format!("usuario {id}")))?;

    Ok(UserFormTemplate {
        admin_name: admin.name,
        current_path: "/usuarios".to_string(),
        id: dto.id_usuario.to_string(),
        first_names: dto.nombres.clone(),
        last_names: dto.apellidos.clone(),
        email: dto.correo.to_string(),
        role: dto.rol.to_string(),
        phone: dto.telefono.clone().unwrap_or_default(),
        is_new: false,
        flash: take_flash(&session).await,
    })
}

/// Create action. A password is required for new accounts.
#[instrument(skip(state, session, form))]
pub async fn create(
    RequireAdminAuth(_admin): RequireAdminAuth,
    State(state): State<AppState>,
    session: Session,
    Form(form): Form<UserForm>,
) -> Redirect {
    let input = match validate_user(form, true) {
        Ok(input) => input,
        Err(message) => {
            flash_error(&session, message).await;
            return Redirect::to("/usuarios/nuevo");
        }
    };

    match state.api().create_user(&input).await {
        Ok(()) => flash_success(&session, "Usuario registrado").await,
        Err(e) => {
            tracing::error!("Failed to create user: {e}");
            flash_error(&session, "No se pudo registrar el usuario").await;
        }
    }

    Redirect::to("/usuarios")
}

/// Update action. An empty password keeps the current one.
#[instrument(skip(state, session, form))]
pub async fn update(
    RequireAdminAuth(_admin): RequireAdminAuth,
    State(state): State<AppState>,
    session: Session,
    Path(id): Path<i32>,
    Form(form): Form<UserForm>,
) -> Redirect {
    let input = match validate_user(form, false) {
        Ok(input) => input,
        Err(message) => {
            flash_error(&session, message).await;
            return Redirect::to(&format!("/usuarios/{id}/editar"));
        }
    };

    match state.api().update_user(UserId::new(id), &input).await {
        Ok(()) => flash_success(&session, "Usuario actualizado").await,
        Err(e) => {
            tracing::error!("Failed to update user {id}: {e}");
            flash_error(&session, "No se pudo actualizar el usuario").await;
        }
    }

    Redirect::to("/usuarios")
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

    match state.api().set_user_active(UserId::new(id), active).await {
        Ok(()) => flash_success(&session, "Estado actualizado").await,
        Err(e) => {
            tracing::error!("Failed to toggle user {id}: {e}");
            flash_error(&session, "No se pudo cambiar el estado").await;
        }
    }

    Redirect::to("/usuarios")
}

/// Delete action.
#[instrument(skip(state, session))]
pub async fn delete(
    RequireAdminAuth(_admin): RequireAdminAuth,
    State(state): State<AppState>,
    session: Session,
    Path(id): Path<i32>,
) -> Redirect {
    match state.api().delete_user(UserId::new(id)).await {
        Ok(()) => flash_success(&session, "Usuario eliminado").await,
        Err(e) => {
            tracing::error!("Failed to delete user {id}: {e}");
            flash_error(&session, "No se pudo eliminar el usuario").await;
        }
    }

    Redirect::to("/usuarios")
}

/// CSV export, streamed from the backend.
#[instrument(skip(state, session))]
pub async fn export(
    RequireAdminAuth(_admin): RequireAdminAuth,
    State(state): State<AppState>,
    session: Session,
) -> Response {
    match state.api().export_users().await {
        Ok(file) => download_response(file),
        Err(e) => {
            tracing::error!("User export failed: {e}");
            flash_error(&session, "No se pudo exportar el archivo").await;
            Redirect::to("/usuarios").into_response()
        }
    }
}

/// Validate the user form.
fn validate_user(form: UserForm, is_new: bool) -> std::result::Result<UsuarioInput, String> {
    if form.nombres.trim().is_empty() || form.apellidos.trim().is_empty() {
        return Err("Nombres y apellidos son obligatorios".to_string());
    }

    if botica_core::Email::parse(form.correo.trim()).is_err() {
        return Err("Correo invalido".to_string());
    }

    let rol = form
        .rol
        .parse::<Role>()
        .map_err(|_| "Rol invalido".to_string())?;

    let contrasena = if form.contrasena.is_empty() {
        if is_new {
            return Err("La contrasena es obligatoria".to_string());
        }
        None
    } else {
        if form.contrasena.len() < MIN_PASSWORD_LENGTH {
            return Err(format!(
                "La contrasena debe tener al menos {MIN_PASSWORD_LENGTH} caracteres"
            ));
        }
        Some(form.contrasena)
    };

    Ok(UsuarioInput {
        nombres: form.nombres.trim().to_string(),
        apellidos: form.apellidos.trim().to_string(),
        correo: form.correo.trim().to_string(),
        contrasena,
        rol,
        telefono: form.telefono.trim().to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn form(password: &str, role: &str) -> UserForm {
        UserForm {
            nombres: "Maria".to_string(),
            apellidos: "Lopez".to_string(),
            correo: "maria@example.com".to_string(),
            contrasena: password.to_string(),
            rol: role.to_string(),
            telefono: String::new(),
        }
    }

    #[test]
    fn test_validate_user_create_requires_password() {
        assert!(validate_user(form("", "USER"), true).is_err());
        assert!(validate_user(form("secreta1", "USER"), true).is_ok());
    }

    #[test]
    fn test_validate_user_edit_keeps_password_when_empty() {
        let input = validate_user(form("", "ADMIN"), false).expect("valid form");
        assert!(input.contrasena.is_none());
        assert_eq!(input.rol, Role::Admin);
    }

    #[test]
    fn test_validate_user_rejects_unknown_role() {
        assert!(validate_user(form("secreta1", "ROOT"), true).is_err());
    }

    #[test]
    fn test_validate_user_short_password() {
        assert!(validate_user(form("abc", "USER"), true).is_err());
    }
}
