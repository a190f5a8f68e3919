//! Session types for the admin panel.

use serde::{Deserialize, Serialize};

use botica_core::{Email, UserId};

/// Session-stored admin identity.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CurrentAdmin {
    /// Backend user ID.
    pub id: UserId,
    /// Admin's email address.
    pub email: Email,
    /// Display name shown in the sidebar.
    pub name: String,
}

/// Session keys for admin state.
pub mod session_keys {
    /// Key for storing the current logged-in admin.
    pub const CURRENT_ADMIN: &str = "current_admin";

    /// Key for one-shot flash messages.
    pub const FLASH: &str = "flash";
}
