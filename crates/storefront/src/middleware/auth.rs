//! Authentication extractors for the storefront.
//!
//! The session is the single source of truth for "logged in". A value
//! that fails to deserialize (corrupt session) is logged and treated as
//! logged out - it is never surfaced to the shopper.

use axum::{
    extract::FromRequestParts,
    http::request::Parts,
    response::{IntoResponse, Redirect, Response},
};
use tower_sessions::Session;

use crate::models::{CurrentUser, session_keys};

/// Extractor that requires a logged-in shopper.
///
/// Redirects to the login page when there is no usable session user.
///
/// # Example
///
/// ```rust,ignore
/// async fn account_page(
///     RequireUser(user): RequireUser,
/// ) -> impl IntoResponse {
///     format!("Hola, {}!", user.name)
/// }
/// ```
pub struct RequireUser(pub CurrentUser);

/// Rejection for [`RequireUser`]: redirect to login.
pub struct LoginRedirect;

impl IntoResponse for LoginRedirect {
    fn into_response(self) -> Response {
        Redirect::to("/auth/login").into_response()
    }
}

impl<S> FromRequestParts<S> for RequireUser
where
    S: Send + Sync,
{
    type Rejection = LoginRedirect;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        // Session is placed in extensions by SessionManagerLayer
        let session = parts.extensions.get::<Session>().ok_or(LoginRedirect)?;

        let user: CurrentUser = read_current_user(session).await.ok_or(LoginRedirect)?;

        Ok(Self(user))
    }
}

/// Extractor that optionally gets the current shopper.
///
/// Never rejects; anonymous requests get `None`.
pub struct OptionalUser(pub Option<CurrentUser>);

impl<S> FromRequestParts<S> for OptionalUser
where
    S: Send + Sync,
{
    type Rejection = std::convert::Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let user = match parts.extensions.get::<Session>() {
            Some(session) => read_current_user(session).await,
            None => None,
        };

        Ok(Self(user))
    }
}

/// Read the current user, discarding corrupt session data.
async fn read_current_user(session: &Session) -> Option<CurrentUser> {
    match session.get::<CurrentUser>(session_keys::CURRENT_USER).await {
        Ok(user) => user,
        Err(e) => {
            tracing::warn!("Discarding corrupt session user: {e}");
            None
        }
    }
}

/// Store the current user in the session (login / profile update).
///
/// # Errors
///
/// Returns an error if the session cannot be modified.
pub async fn set_current_user(
    session: &Session,
    user: &CurrentUser,
) -> Result<(), tower_sessions::session::Error> {
    session.insert(session_keys::CURRENT_USER, user).await
}

/// Clear the current user from the session (logout).
///
/// # Errors
///
/// Returns an error if the session cannot be modified.
pub async fn clear_current_user(session: &Session) -> Result<(), tower_sessions::session::Error> {
    session
        .remove::<CurrentUser>(session_keys::CURRENT_USER)
        .await?;
    Ok(())
}
