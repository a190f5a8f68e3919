//! User domain types.

use botica_core::{Email, Role, UserId};

/// A shopper profile as returned by the backend.
#[derive(Debug, Clone)]
pub struct UserProfile {
    /// Backend user ID.
    pub id: UserId,
    /// First name(s).
    pub first_name: String,
    /// Last name(s).
    pub last_name: String,
    /// Email address. Immutable after registration.
    pub email: Email,
    /// Account role.
    pub role: Role,
    /// Contact phone; empty when not provided.
    pub phone: String,
    /// Delivery address; empty when not provided.
    pub address: String,
    /// Profile image URL or data URL; empty when not provided.
    pub image: String,
}

/// A typed partial update for a shopper profile.
///
/// Only the fields a shopper may change. `None` fields are left
/// untouched by the backend; email is deliberately absent.
#[derive(Debug, Clone, Default)]
pub struct ProfileUpdate {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub phone: Option<String>,
    pub address: Option<String>,
    pub image: Option<String>,
}

impl ProfileUpdate {
    /// Whether the update carries any change at all.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.first_name.is_none()
            && self.last_name.is_none()
            && self.phone.is_none()
            && self.address.is_none()
            && self.image.is_none()
    }
}
