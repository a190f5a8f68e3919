//! Admin authentication route handlers.
//!
//! Credentials are checked by the backend; the client additionally
//! requires the `ADMIN` role before a session is created. Shopper
//! accounts get the same "invalid credentials" banner as wrong
//! passwords - the login page does not reveal which it was.

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

use crate::api::ApiError;
use crate::filters;
use crate::middleware::{clear_current_admin, set_current_admin};
use crate::models::CurrentAdmin;
use crate::state::AppState;

/// Login form data.
#[derive(Debug, Deserialize)]
pub struct LoginForm {
    pub correo: String,
    pub contrasena: String,
}

/// Login page template.
#[derive(Template, WebTemplate)]
#[template(path = "login.html")]
pub struct LoginTemplate {
    pub error: String,
}

/// Display the login page.
pub async fn login_page() -> impl IntoResponse {
    LoginTemplate {
        error: String::new(),
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
        Ok(dto) => {
            let admin = CurrentAdmin {
                id: dto.id_usuario,
                email: dto.correo,
                name: dto.nombres,
            };
            if let Err(e) = set_current_admin(&session, &admin).await {
                tracing::error!("Failed to set session: {e}");
                return LoginTemplate {
                    error: "No se pudo iniciar la sesion".to_string(),
                }
                .into_response();
            }
            Redirect::to("/").into_response()
        }
        Err(ApiError::InvalidCredentials) => LoginTemplate {
            error: "Credenciales invalidas".to_string(),
        }
        .into_response(),
        Err(e) => {
            tracing::error!("Admin login request failed: {e}");
            LoginTemplate {
                error: "No se pudo contactar al servidor. Intente nuevamente.".to_string(),
            }
            .into_response()
        }
    }
}

/// Handle logout.
#[instrument(skip(session))]
pub async fn logout(session: Session) -> Redirect {
    if let Err(e) = clear_current_admin(&session).await {
        tracing::warn!("Failed to clear admin session: {e}");
    }
    Redirect::to("/auth/login")
}
