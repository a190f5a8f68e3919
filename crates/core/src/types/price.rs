//! Price representation for catalog and cart math.
//!
//! The backend serves prices as display strings in Peruvian soles
//! (`"S/.8.50"`, sometimes with a comma decimal separator: `"S/.8,50"`).
//! All client-side arithmetic (cart totals, price filtering, price
//! sorting) goes through [`Price::parse`], which normalizes those
//! shapes into a [`Decimal`]. A string that cannot be normalized parses
//! as zero rather than failing the whole view.

use std::str::FromStr;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Currency symbol used by the backend for all prices.
pub const CURRENCY_PREFIX: &str = "S/.";

/// A price in Peruvian soles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize, Default)]
#[serde(transparent)]
pub struct Price(Decimal);

impl Price {
    /// A zero price.
    pub const ZERO: Self = Self(Decimal::ZERO);

    /// Create a price from a decimal amount.
    #[must_use]
    pub const fn new(amount: Decimal) -> Self {
        Self(amount)
    }

    /// Parse a backend price string.
    ///
    /// Accepts an optional `S/.` prefix and either `.` or `,` as the
    /// decimal separator. Malformed input yields [`Price::ZERO`] - a
    /// bad price string must never take down a whole product list.
    #[must_use]
    pub fn parse(raw: &str) -> Self {
        let trimmed = raw.trim();
        let without_prefix = trimmed
            .strip_prefix(CURRENCY_PREFIX)
            .or_else(|| trimmed.strip_prefix("S/"))
            .unwrap_or(trimmed)
            .trim();

        // Comma decimal separator: only the first comma is normalized,
        // matching how the backend formats single-separator amounts.
        let normalized = without_prefix.replacen(',', ".", 1);

        Decimal::from_str(&normalized).map_or(Self::ZERO, Self)
    }

    /// The numeric amount.
    #[must_use]
    pub const fn amount(&self) -> Decimal {
        self.0
    }

    /// Multiply by a line quantity.
    #[must_use]
    pub fn times(&self, quantity: u32) -> Self {
        Self(self.0 * Decimal::from(quantity))
    }

    /// Format for display with the currency prefix (e.g. `"S/.19.90"`).
    #[must_use]
    pub fn display(&self) -> String {
        format!("{CURRENCY_PREFIX}{:.2}", self.0)
    }
}

impl std::ops::Add for Price {
    type Output = Self;

    fn add(self, rhs: Self) -> Self {
        Self(self.0 + rhs.0)
    }
}

impl std::iter::Sum for Price {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Self::ZERO, std::ops::Add::add)
    }
}

impl std::fmt::Display for Price {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.display())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    #[test]
    fn test_parse_dot_separator() {
        assert_eq!(Price::parse("S/.8.50").amount(), dec("8.50"));
        assert_eq!(Price::parse("S/.12.00").amount(), dec("12.00"));
    }

    #[test]
    fn test_parse_comma_separator() {
        assert_eq!(Price::parse("S/.8,50").amount(), dec("8.50"));
    }

    #[test]
    fn test_parse_without_prefix() {
        assert_eq!(Price::parse("25.00").amount(), dec("25.00"));
        assert_eq!(Price::parse(" 3,90 ").amount(), dec("3.90"));
    }

    #[test]
    fn test_parse_short_prefix() {
        // Some legacy records carry "S/ 8.50"
        assert_eq!(Price::parse("S/ 8.50").amount(), dec("8.50"));
    }

    #[test]
    fn test_parse_malformed_is_zero() {
        assert_eq!(Price::parse(""), Price::ZERO);
        assert_eq!(Price::parse("gratis"), Price::ZERO);
        assert_eq!(Price::parse("S/."), Price::ZERO);
        // Thousands separators are not produced by the backend; a string
        // with two separators is malformed and parses as zero.
        assert_eq!(Price::parse("S/.1,234.56"), Price::ZERO);
    }

    #[test]
    fn test_times_and_sum() {
        let total: Price = [Price::parse("S/.8.50").times(2), Price::parse("S/.12.00")]
            .into_iter()
            .sum();
        assert_eq!(total.amount(), dec("29.00"));
    }

    #[test]
    fn test_display_two_decimals() {
        assert_eq!(Price::parse("S/.8.5").display(), "S/.8.50");
        assert_eq!(Price::ZERO.display(), "S/.0.00");
    }

    #[test]
    fn test_ordering() {
        assert!(Price::parse("S/.8.50") < Price::parse("S/.12.00"));
    }
}
