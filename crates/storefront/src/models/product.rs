//! Product and category domain types.

use botica_core::{CategoryId, Price, ProductId};

/// A catalog product as the shopper pages see it.
///
/// `price_raw` keeps the backend's display string untouched; `price` is
/// the parsed amount used for filtering, sorting, and cart math.
#[derive(Debug, Clone, PartialEq)]
pub struct Product {
    /// Backend product ID.
    pub id: ProductId,
    /// Display name.
    pub name: String,
    /// Price display string as served (`"S/.8.50"`).
    pub price_raw: String,
    /// Parsed price; zero when `price_raw` is malformed.
    pub price: Price,
    /// Image URL or data URL; empty when the product has no image.
    pub image: String,
    /// Presentation label used for catalog filtering (e.g. "Jarabe").
    pub presentation: String,
    /// Long description.
    pub description: String,
    /// Units in stock.
    pub stock: i32,
    /// Whether shoppers may see this product.
    pub active: bool,
}

impl Product {
    /// Whether the product can currently be added to a cart.
    #[must_use]
    pub const fn purchasable(&self) -> bool {
        self.active && self.stock > 0
    }
}

/// A product category (reference data).
#[derive(Debug, Clone, PartialEq)]
pub struct Category {
    /// Backend category ID.
    pub id: CategoryId,
    /// Display name, also used as the presentation filter label.
    pub name: String,
    /// Whether shoppers may see products in this category.
    pub active: bool,
}
