//! Session cart store.
//!
//! The cart is an ordered list of product snapshots with quantities,
//! serialized into the shopper's session. It captures name and price at
//! add time, so a concurrent admin price edit does not change a cart
//! already in progress; the backend reprices on order submission.
//!
//! Quantity policy: quantities below 1 never enter the cart. The
//! decrement control stops at 1 in the UI, and [`parse_quantity`]
//! clamps direct numeric input (including unparseable input) to 1.
//! Removal is always the explicit remove action, never a decrement.

use serde::{Deserialize, Serialize};

use botica_core::{Price, ProductId};

use crate::models::Product;

/// One cart line: a product snapshot plus quantity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartLine {
    pub product_id: ProductId,
    pub name: String,
    pub presentation: String,
    /// Price display string captured when the line was added.
    pub price: String,
    pub image: String,
    /// Always >= 1.
    pub quantity: u32,
}

impl CartLine {
    /// Parsed unit price; zero when the captured string is malformed.
    #[must_use]
    pub fn unit_price(&self) -> Price {
        Price::parse(&self.price)
    }

    /// Line total (unit price x quantity).
    #[must_use]
    pub fn line_total(&self) -> Price {
        self.unit_price().times(self.quantity)
    }
}

/// The session cart.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Cart {
    lines: Vec<CartLine>,
}

impl Cart {
    /// Add a product, incrementing the quantity if a line already exists.
    pub fn add(&mut self, product: &Product, quantity: u32) {
        let quantity = quantity.max(1);
        if let Some(line) = self
            .lines
            .iter_mut()
            .find(|line| line.product_id == product.id)
        {
            line.quantity = line.quantity.saturating_add(quantity);
            return;
        }

        self.lines.push(CartLine {
            product_id: product.id,
            name: product.name.clone(),
            presentation: product.presentation.clone(),
            price: product.price_raw.clone(),
            image: product.image.clone(),
            quantity,
        });
    }

    /// Set a line's quantity, clamping to at least 1.
    ///
    /// Unknown product ids are ignored.
    pub fn update_quantity(&mut self, product_id: ProductId, quantity: u32) {
        if let Some(line) = self
            .lines
            .iter_mut()
            .find(|line| line.product_id == product_id)
        {
            line.quantity = quantity.max(1);
        }
    }

    /// Remove a line unconditionally.
    pub fn remove(&mut self, product_id: ProductId) {
        self.lines.retain(|line| line.product_id != product_id);
    }

    /// Drop every line.
    pub fn clear(&mut self) {
        self.lines.clear();
    }

    /// Sum of `price x quantity` over all lines.
    ///
    /// Lines with malformed price strings contribute zero.
    #[must_use]
    pub fn total(&self) -> Price {
        self.lines.iter().map(CartLine::line_total).sum()
    }

    /// Total unit count across all lines.
    #[must_use]
    pub fn item_count(&self) -> u32 {
        self.lines
            .iter()
            .fold(0, |acc, line| acc.saturating_add(line.quantity))
    }

    /// The lines, in insertion order.
    #[must_use]
    pub fn lines(&self) -> &[CartLine] {
        &self.lines
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }
}

/// Parse a quantity form field.
///
/// The numeric field accepts arbitrary input; anything unparseable or
/// below 1 becomes 1.
#[must_use]
pub fn parse_quantity(raw: &str) -> u32 {
    raw.trim().parse::<u32>().unwrap_or(1).max(1)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use botica_core::ProductId;
    use rust_decimal::Decimal;
    use std::str::FromStr;

    fn product(id: i32, price: &str) -> Product {
        Product {
            id: ProductId::new(id),
            name: format!("Producto {id}"),
            price: Price::parse(price),
            price_raw: price.to_string(),
            image: String::new(),
            presentation: "Tableta".to_string(),
            description: String::new(),
            stock: 10,
            active: true,
        }
    }

    fn amount(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    #[test]
    fn test_add_appends_line() {
        let mut cart = Cart::default();
        cart.add(&product(1, "S/.8.50"), 2);
        assert_eq!(cart.lines().len(), 1);
        assert_eq!(cart.item_count(), 2);
    }

    #[test]
    fn test_add_existing_increments() {
        let mut cart = Cart::default();
        cart.add(&product(1, "S/.8.50"), 1);
        cart.add(&product(1, "S/.8.50"), 3);
        assert_eq!(cart.lines().len(), 1);
        assert_eq!(cart.item_count(), 4);
    }

    #[test]
    fn test_add_zero_quantity_becomes_one() {
        let mut cart = Cart::default();
        cart.add(&product(1, "S/.8.50"), 0);
        assert_eq!(cart.item_count(), 1);
    }

    #[test]
    fn test_total_sums_price_times_quantity() {
        let mut cart = Cart::default();
        cart.add(&product(1, "S/.8.50"), 2);
        cart.add(&product(2, "S/.12.00"), 1);
        assert_eq!(cart.total().amount(), amount("29.00"));
    }

    #[test]
    fn test_total_treats_malformed_price_as_zero() {
        let mut cart = Cart::default();
        cart.add(&product(1, "S/.8.50"), 1);
        cart.add(&product(2, "consultar"), 5);
        assert_eq!(cart.total().amount(), amount("8.50"));
    }

    #[test]
    fn test_total_parses_comma_separator() {
        let mut cart = Cart::default();
        cart.add(&product(1, "S/.8,50"), 2);
        assert_eq!(cart.total().amount(), amount("17.00"));
    }

    #[test]
    fn test_update_quantity_clamps_to_one() {
        let mut cart = Cart::default();
        cart.add(&product(1, "S/.8.50"), 3);
        cart.update_quantity(ProductId::new(1), 0);
        assert_eq!(cart.item_count(), 1);
        // Line survives: dropping below 1 never removes
        assert_eq!(cart.lines().len(), 1);
    }

    #[test]
    fn test_update_quantity_unknown_id_is_noop() {
        let mut cart = Cart::default();
        cart.add(&product(1, "S/.8.50"), 1);
        cart.update_quantity(ProductId::new(99), 5);
        assert_eq!(cart.item_count(), 1);
    }

    #[test]
    fn test_remove_drops_line() {
        let mut cart = Cart::default();
        cart.add(&product(1, "S/.8.50"), 2);
        cart.add(&product(2, "S/.12.00"), 1);
        cart.remove(ProductId::new(1));
        assert_eq!(cart.lines().len(), 1);
        assert_eq!(cart.total().amount(), amount("12.00"));
    }

    #[test]
    fn test_clear() {
        let mut cart = Cart::default();
        cart.add(&product(1, "S/.8.50"), 2);
        cart.clear();
        assert!(cart.is_empty());
        assert_eq!(cart.total(), Price::ZERO);
    }

    #[test]
    fn test_snapshot_price_survives_catalog_change() {
        let mut cart = Cart::default();
        cart.add(&product(1, "S/.8.50"), 1);
        // A later admin price edit does not touch the captured line
        let lines = cart.lines();
        assert_eq!(lines.first().unwrap().price, "S/.8.50");
    }

    #[test]
    fn test_parse_quantity_policy() {
        assert_eq!(parse_quantity("3"), 3);
        assert_eq!(parse_quantity(" 2 "), 2);
        assert_eq!(parse_quantity("0"), 1);
        assert_eq!(parse_quantity("-4"), 1);
        assert_eq!(parse_quantity("abc"), 1);
        assert_eq!(parse_quantity(""), 1);
    }

    #[test]
    fn test_serde_roundtrip() {
        let mut cart = Cart::default();
        cart.add(&product(1, "S/.8.50"), 2);
        let json = serde_json::to_string(&cart).unwrap();
        let restored: Cart = serde_json::from_str(&json).unwrap();
        assert_eq!(restored.lines(), cart.lines());
    }
}
