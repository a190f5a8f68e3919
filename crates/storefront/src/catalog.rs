//! Catalog query engine.
//!
//! Pure derivation of the shopper's product view: given the full list
//! fetched from the backend and the current filter state, produce a
//! filtered, sorted copy. All sorts are stable so products that compare
//! equal keep their backend order.

use std::collections::BTreeSet;

use rust_decimal::Decimal;

use crate::models::Product;

/// Default price ceiling for the price slider.
pub const DEFAULT_PRICE_MAX: u32 = 100;

/// Catalog sort order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortOption {
    /// By id descending - a proxy for recency.
    #[default]
    Newest,
    /// By parsed price, ascending.
    PriceAsc,
    /// By parsed price, descending.
    PriceDesc,
    /// The backend serves no rating data; input order is preserved.
    Rating,
}

impl SortOption {
    /// Parse the query-string value. Unknown values fall back to `Newest`.
    #[must_use]
    pub fn from_param(param: &str) -> Self {
        match param {
            "asc" => Self::PriceAsc,
            "desc" => Self::PriceDesc,
            "rating" => Self::Rating,
            _ => Self::Newest,
        }
    }

    /// The query-string value for this option.
    #[must_use]
    pub const fn as_param(self) -> &'static str {
        match self {
            Self::Newest => "nuevo",
            Self::PriceAsc => "asc",
            Self::PriceDesc => "desc",
            Self::Rating => "rating",
        }
    }
}

/// Filter state for the catalog page.
#[derive(Debug, Clone)]
pub struct CatalogFilter {
    /// Case-insensitive substring match against product names.
    pub search_term: String,
    /// Keep products with parsed price at or below this ceiling.
    pub price_max: Decimal,
    /// Presentation labels to keep; empty means no presentation filter.
    pub presentations: BTreeSet<String>,
    /// Sort order applied after filtering.
    pub sort: SortOption,
}

impl Default for CatalogFilter {
    fn default() -> Self {
        Self {
            search_term: String::new(),
            price_max: Decimal::from(DEFAULT_PRICE_MAX),
            presentations: BTreeSet::new(),
            sort: SortOption::default(),
        }
    }
}

impl CatalogFilter {
    /// Apply the filter and sort to a product list, producing the view.
    #[must_use]
    pub fn apply(&self, products: &[Product]) -> Vec<Product> {
        let needle = self.search_term.trim().to_lowercase();

        let mut view: Vec<Product> = products
            .iter()
            .filter(|p| needle.is_empty() || p.name.to_lowercase().contains(&needle))
            .filter(|p| p.price.amount() <= self.price_max)
            .filter(|p| {
                self.presentations.is_empty() || self.presentations.contains(&p.presentation)
            })
            .cloned()
            .collect();

        match self.sort {
            // sort_by is stable, so ties keep backend order
            SortOption::Newest => view.sort_by(|a, b| b.id.cmp(&a.id)),
            SortOption::PriceAsc => view.sort_by(|a, b| a.price.cmp(&b.price)),
            SortOption::PriceDesc => view.sort_by(|a, b| b.price.cmp(&a.price)),
            SortOption::Rating => {}
        }

        view
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use botica_core::{Price, ProductId};

    fn product(id: i32, name: &str, price: &str, presentation: &str) -> Product {
        Product {
            id: ProductId::new(id),
            name: name.to_string(),
            price: Price::parse(price),
            price_raw: price.to_string(),
            image: String::new(),
            presentation: presentation.to_string(),
            description: String::new(),
            stock: 10,
            active: true,
        }
    }

    fn sample() -> Vec<Product> {
        vec![
            product(1, "Paracetamol 500mg", "S/.8.50", "Tableta"),
            product(2, "Amoxicilina 250mg", "S/.12.00", "Jarabe"),
            product(3, "Complejo B", "S/.25.00", "Capsula"),
        ]
    }

    fn ids(view: &[Product]) -> Vec<i32> {
        view.iter().map(|p| p.id.as_i32()).collect()
    }

    #[test]
    fn test_default_filter_keeps_everything() {
        let filter = CatalogFilter::default();
        // Default sort is Newest: id descending
        assert_eq!(ids(&filter.apply(&sample())), vec![3, 2, 1]);
    }

    #[test]
    fn test_search_is_case_insensitive_substring() {
        let filter = CatalogFilter {
            search_term: "PARACE".to_string(),
            ..CatalogFilter::default()
        };
        assert_eq!(ids(&filter.apply(&sample())), vec![1]);
    }

    #[test]
    fn test_price_max_excludes_above_ceiling() {
        let filter = CatalogFilter {
            price_max: Decimal::from(20),
            sort: SortOption::PriceAsc,
            ..CatalogFilter::default()
        };
        // The S/.25.00 product is excluded; asc order is [1, 2]
        assert_eq!(ids(&filter.apply(&sample())), vec![1, 2]);
    }

    #[test]
    fn test_price_max_is_inclusive() {
        let filter = CatalogFilter {
            price_max: Decimal::new(1200, 2),
            sort: SortOption::PriceAsc,
            ..CatalogFilter::default()
        };
        assert_eq!(ids(&filter.apply(&sample())), vec![1, 2]);
    }

    #[test]
    fn test_presentation_filter() {
        let filter = CatalogFilter {
            presentations: BTreeSet::from(["Jarabe".to_string()]),
            ..CatalogFilter::default()
        };
        assert_eq!(ids(&filter.apply(&sample())), vec![2]);
    }

    #[test]
    fn test_empty_presentation_set_means_no_filter() {
        let filter = CatalogFilter::default();
        assert_eq!(filter.apply(&sample()).len(), 3);
    }

    #[test]
    fn test_sort_price_desc() {
        let filter = CatalogFilter {
            sort: SortOption::PriceDesc,
            ..CatalogFilter::default()
        };
        assert_eq!(ids(&filter.apply(&sample())), vec![3, 2, 1]);
    }

    #[test]
    fn test_sort_is_stable_on_price_ties() {
        let products = vec![
            product(5, "Gasa", "S/.5.00", "Unidad"),
            product(6, "Venda", "S/.5.00", "Unidad"),
            product(7, "Algodon", "S/.3.00", "Unidad"),
        ];
        let filter = CatalogFilter {
            sort: SortOption::PriceAsc,
            ..CatalogFilter::default()
        };
        // 5 and 6 tie on price and keep their backend order
        assert_eq!(ids(&filter.apply(&products)), vec![7, 5, 6]);
    }

    #[test]
    fn test_rating_sort_preserves_input_order() {
        let filter = CatalogFilter {
            sort: SortOption::Rating,
            ..CatalogFilter::default()
        };
        assert_eq!(ids(&filter.apply(&sample())), vec![1, 2, 3]);
    }

    #[test]
    fn test_malformed_price_counts_as_zero() {
        let mut products = sample();
        products.push(product(4, "Muestra gratis", "consultar", "Unidad"));
        let filter = CatalogFilter {
            price_max: Decimal::from(1),
            ..CatalogFilter::default()
        };
        // Zero-parsed price passes any ceiling
        assert_eq!(ids(&filter.apply(&products)), vec![4]);
    }

    #[test]
    fn test_sort_param_round_trip() {
        assert_eq!(SortOption::from_param("asc"), SortOption::PriceAsc);
        assert_eq!(SortOption::from_param("desc"), SortOption::PriceDesc);
        assert_eq!(SortOption::from_param("rating"), SortOption::Rating);
        assert_eq!(SortOption::from_param("nuevo"), SortOption::Newest);
        assert_eq!(SortOption::from_param("garbage"), SortOption::Newest);
        assert_eq!(SortOption::PriceAsc.as_param(), "asc");
    }
}
