//! Order domain types (shopper-facing order history).

use botica_core::{OrderId, Price};

/// A past order as listed on the account page.
#[derive(Debug, Clone)]
pub struct Order {
    /// Backend order ID.
    pub id: OrderId,
    /// Creation date display string as served by the backend.
    pub date: String,
    /// Order status label (e.g. "PENDIENTE", "ENTREGADO").
    pub status: String,
    /// Order total.
    pub total: Price,
}
