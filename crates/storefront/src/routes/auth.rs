//! Authentication route handlers.
//!
//! Credentials are verified by the backend; the storefront only holds
//! the resulting profile in the session. Password rules (minimum
//! length, confirmation match) are checked here before the register
//! call so the shopper gets an immediate banner instead of a round
//! trip.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form,
    extract::{Query, State},
    response::{IntoResponse, Redirect, Response},
};
use serde::Deserialize;
use tower_sessions::Session;
use tracing::instrument;

use botica_core::Role;

use crate::api::ApiError;
use crate::api::types::NuevoUsuario;
use crate::filters;
use crate::middleware::{clear_current_user, set_current_user};
use crate::models::{CurrentUser, UserProfile, session_keys};
use crate::state::AppState;

/// Minimum accepted password length.
const MIN_PASSWORD_LENGTH: usize = 6;

// =============================================================================
// Form Types
// =============================================================================

/// Login form data.
#[derive(Debug, Deserialize)]
pub struct LoginForm {
    pub correo: String,
    pub contrasena: String,
}

/// Registration form data.
#[derive(Debug, Deserialize)]
pub struct RegisterForm {
    pub nombres: String,
    pub apellidos: String,
    pub correo: String,
    pub contrasena: String,
    pub contrasena_confirmacion: String,
}

// =============================================================================
// Query Types
// =============================================================================

/// Query parameters for error/success display.
#[derive(Debug, Deserialize)]
pub struct MessageQuery {
    pub error: Option<String>,
    pub success: Option<String>,
}

// =============================================================================
// Templates
// =============================================================================

/// Login page template.
#[derive(Template, WebTemplate)]
#[template(path = "auth/login.html")]
pub struct LoginTemplate {
    pub error: String,
    pub success: String,
}

/// Register page template.
#[derive(Template, WebTemplate)]
#[template(path = "auth/register.html")]
pub struct RegisterTemplate {
    pub error: String,
    pub nombres: String,
    pub apellidos: String,
    pub correo: String,
}

// =============================================================================
// Handlers
// =============================================================================

/// Display the login page.
pub async fn login_page(Query(query): Query<MessageQuery>) -> impl IntoResponse {
    LoginTemplate {
        error: query.error.unwrap_or_default(),
        success: query.success.unwrap_or_default(),
    }
}

/// Handle login form submission.
#[instrument(skip(state, session, form))]
pub async fn login(
    State(state): State<AppState>,
    session: Session,
    Form(form): Form<LoginForm>,
) -> Response {
    match state.api().login(&form.correo, &form.contrasena).await {
        Ok(profile) => {
            if let Err(e) = set_current_user(&session, &to_session_user(&profile)).await {
                tracing::error!("Failed to set session: {e}");
                return Redirect::to("/auth/login?error=session").into_response();
            }

            Redirect::to("/").into_response()
        }
        Err(ApiError::InvalidCredentials) => LoginTemplate {
            error: "Correo o contrasena incorrectos".to_string(),
            success: String::new(),
        }
        .into_response(),
        Err(e) => {
            tracing::error!("Login request failed: {e}");
            LoginTemplate {
                error: "No se pudo iniciar sesion. Intente nuevamente.".to_string(),
                success: String::new(),
            }
            .into_response()
        }
    }
}

/// Display the register page.
pub async fn register_page() -> impl IntoResponse {
    RegisterTemplate {
        error: String::new(),
        nombres: String::new(),
        apellidos: String::new(),
        correo: String::new(),
    }
}

/// Handle registration form submission.
#[instrument(skip(state, session, form))]
pub async fn register(
    State(state): State<AppState>,
    session: Session,
    Form(form): Form<RegisterForm>,
) -> Response {
    if let Err(message) = validate_registration(&form) {
        return RegisterTemplate {
            error: message,
            nombres: form.nombres,
            apellidos: form.apellidos,
            correo: form.correo,
        }
        .into_response();
    }

    let registration = NuevoUsuario {
        nombres: form.nombres.trim().to_string(),
        apellidos: form.apellidos.trim().to_string(),
        correo: form.correo.trim().to_string(),
        contrasena: form.contrasena,
        rol: Role::User,
    };

    match state.api().register(&registration).await {
        Ok(profile) => {
            if let Err(e) = set_current_user(&session, &to_session_user(&profile)).await {
                tracing::error!("Failed to set session: {e}");
                return Redirect::to("/auth/login?success=registered").into_response();
            }
            Redirect::to("/").into_response()
        }
        Err(e) => {
            tracing::error!("Registration failed: {e}");
            RegisterTemplate {
                error: "No se pudo crear la cuenta. Intente nuevamente.".to_string(),
                nombres: registration.nombres,
                apellidos: registration.apellidos,
                correo: registration.correo,
            }
            .into_response()
        }
    }
}

/// Handle logout.
///
/// Clears the profile, cart, and any checkout draft; the account
/// itself persists server-side.
#[instrument(skip(session))]
pub async fn logout(session: Session) -> Redirect {
    if let Err(e) = clear_current_user(&session).await {
        tracing::warn!("Failed to clear session user: {e}");
    }
    for key in [session_keys::CART, session_keys::CHECKOUT] {
        if let Err(e) = session.remove::<serde_json::Value>(key).await {
            tracing::warn!("Failed to clear session key {key}: {e}");
        }
    }

    Redirect::to("/")
}

// =============================================================================
// Helpers
// =============================================================================

fn to_session_user(profile: &UserProfile) -> CurrentUser {
    CurrentUser {
        id: profile.id,
        email: profile.email.clone(),
        name: profile.first_name.clone(),
        role: profile.role,
    }
}

/// Client-side registration checks: required fields, email shape,
/// password length and confirmation match.
fn validate_registration(form: &RegisterForm) -> Result<(), String> {
    if form.nombres.trim().is_empty() || form.apellidos.trim().is_empty() {
        return Err("Nombres y apellidos son obligatorios".to_string());
    }
    if botica_core::Email::parse(form.correo.trim()).is_err() {
        return Err("Correo invalido".to_string());
    }
    if form.contrasena.len() < MIN_PASSWORD_LENGTH {
        return Err(format!(
            "La contrasena debe tener al menos {MIN_PASSWORD_LENGTH} caracteres"
        ));
    }
    if form.contrasena != form.contrasena_confirmacion {
        return Err("Las contrasenas no coinciden".to_string());
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn form(password: &str, confirm: &str) -> RegisterForm {
        RegisterForm {
            nombres: "Ana".to_string(),
            apellidos: "Torres".to_string(),
            correo: "ana@example.com".to_string(),
            contrasena: password.to_string(),
            contrasena_confirmacion: confirm.to_string(),
        }
    }

    #[test]
    fn test_validate_registration_ok() {
        assert!(validate_registration(&form("secreta1", "secreta1")).is_ok());
    }

    #[test]
    fn test_validate_registration_short_password() {
        assert!(validate_registration(&form("abc", "abc")).is_err());
    }

    #[test]
    fn test_validate_registration_mismatch() {
        assert!(validate_registration(&form("secreta1", "secreta2")).is_err());
    }

    #[test]
    fn test_validate_registration_bad_email() {
        let mut f = form("secreta1", "secreta1");
        f.correo = "not-an-email".to_string();
        assert!(validate_registration(&f).is_err());
    }

    #[test]
    fn test_validate_registration_missing_names() {
        let mut f = form("secreta1", "secreta1");
        f.nombres = "  ".to_string();
        assert!(validate_registration(&f).is_err());
    }
}
