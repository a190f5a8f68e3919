//! One-shot flash messages.
//!
//! A flash is written to the session by the handler that performed an
//! action and consumed by the next page render. The banner auto-hides
//! client-side after a few seconds; nothing is ever retried from here.

use serde::{Deserialize, Serialize};
use tower_sessions::Session;

use crate::models::session_keys;

/// Banner severity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FlashKind {
    Success,
    Error,
}

/// A one-shot banner message.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Flash {
    pub kind: FlashKind,
    pub message: String,
}

impl Flash {
    /// CSS class rendered on the banner.
    #[must_use]
    pub const fn css_class(&self) -> &'static str {
        match self.kind {
            FlashKind::Success => "flash flash-success",
            FlashKind::Error => "flash flash-error",
        }
    }
}

/// Queue a success banner for the next render.
pub async fn flash_success(session: &Session, message: impl Into<String>) {
    set_flash(session, FlashKind::Success, message.into()).await;
}

/// Queue an error banner for the next render.
pub async fn flash_error(session: &Session, message: impl Into<String>) {
    set_flash(session, FlashKind::Error, message.into()).await;
}

async fn set_flash(session: &Session, kind: FlashKind, message: String) {
    let flash = Flash { kind, message };
    if let Err(e) = session.insert(session_keys::FLASH, &flash).await {
        tracing::warn!("Failed to store flash message: {e}");
    }
}

/// Take the pending flash, if any, consuming it.
pub async fn take_flash(session: &Session) -> Option<Flash> {
    match session.remove::<Flash>(session_keys::FLASH).await {
        Ok(flash) => flash,
        Err(e) => {
            tracing::warn!("Discarding corrupt flash message: {e}");
            None
        }
    }
}
