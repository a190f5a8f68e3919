//! Session-related types.
//!
//! Types stored in the session for authentication state.

use serde::{Deserialize, Serialize};

use botica_core::{Email, Role, UserId};

/// Session-stored user identity.
///
/// Minimal data stored in the session to identify the logged-in shopper.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CurrentUser {
    /// User's backend ID.
    pub id: UserId,
    /// User's email address.
    pub email: Email,
    /// Display name shown in the header.
    pub name: String,
    /// Account role.
    pub role: Role,
}

/// Session keys for storefront state.
pub mod keys {
    /// Key for storing the current logged-in user.
    pub const CURRENT_USER: &str = "current_user";

    /// Key for the session cart.
    pub const CART: &str = "cart";

    /// Key for the in-progress checkout wizard.
    pub const CHECKOUT: &str = "checkout";

    /// Key for one-shot flash messages.
    pub const FLASH: &str = "flash";
}
