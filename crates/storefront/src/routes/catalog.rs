//! Catalog route handlers.
//!
//! The listing page parses its filter state from the raw query string
//! (checkbox groups repeat the `presentacion` key, which plain
//! `Query<T>` cannot express) and runs it through the catalog query
//! engine. Shoppers only ever see active products.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    extract::{Path, RawQuery, State},
    response::IntoResponse,
};
use rust_decimal::Decimal;
use tracing::instrument;

use crate::catalog::{CatalogFilter, DEFAULT_PRICE_MAX, SortOption};
use crate::error::{AppError, Result};
use crate::filters;
use crate::flash::{Flash, take_flash};
use crate::middleware::OptionalUser;
use crate::models::{Category, Product};
use crate::state::AppState;
use tower_sessions::Session;

// =============================================================================
// View Types
// =============================================================================

/// Product card display data for grid templates.
#[derive(Debug, Clone)]
pub struct ProductCardView {
    pub id: i32,
    pub name: String,
    pub presentation: String,
    pub price: String,
    pub image: String,
    pub purchasable: bool,
}

impl From<&Product> for ProductCardView {
    fn from(product: &Product) -> Self {
        Self {
            id: product.id.as_i32(),
            name: product.name.clone(),
            presentation: product.presentation.clone(),
            price: product.price.display(),
            image: product.image.clone(),
            purchasable: product.purchasable(),
        }
    }
}

/// Product detail display data.
#[derive(Debug, Clone)]
pub struct ProductDetailView {
    pub id: i32,
    pub name: String,
    pub presentation: String,
    pub price: String,
    pub image: String,
    pub description: String,
    pub stock: i32,
    pub purchasable: bool,
}

impl From<&Product> for ProductDetailView {
    fn from(product: &Product) -> Self {
        Self {
            id: product.id.as_i32(),
            name: product.name.clone(),
            presentation: product.presentation.clone(),
            price: product.price.display(),
            image: product.image.clone(),
            description: product.description.clone(),
            stock: product.stock,
            purchasable: product.purchasable(),
        }
    }
}

/// One presentation checkbox in the filter sidebar.
#[derive(Debug, Clone)]
pub struct FacetView {
    pub label: String,
    pub checked: bool,
}

// =============================================================================
// Query Parsing
// =============================================================================

/// Parsed catalog query string.
#[derive(Debug, Default)]
pub struct CatalogQuery {
    pub search_term: String,
    pub price_max: Option<Decimal>,
    pub presentations: Vec<String>,
    pub sort: String,
}

impl CatalogQuery {
    /// Parse the raw query string, collecting repeated `presentacion`
    /// keys. Unknown keys are ignored; an unparseable `precio_max`
    /// falls back to the default ceiling.
    #[must_use]
    pub fn parse(raw: Option<&str>) -> Self {
        let mut query = Self::default();
        let Some(raw) = raw else {
            return query;
        };

        for (key, value) in url::form_urlencoded::parse(raw.as_bytes()) {
            match key.as_ref() {
                "q" => query.search_term = value.into_owned(),
                "precio_max" => query.price_max = value.trim().parse::<Decimal>().ok(),
                "presentacion" => {
                    if !value.is_empty() {
                        query.presentations.push(value.into_owned());
                    }
                }
                "orden" => query.sort = value.into_owned(),
                _ => {}
            }
        }

        query
    }

    /// Build the engine filter from the parsed query.
    #[must_use]
    pub fn to_filter(&self) -> CatalogFilter {
        CatalogFilter {
            search_term: self.search_term.clone(),
            price_max: self
                .price_max
                .unwrap_or_else(|| Decimal::from(DEFAULT_PRICE_MAX)),
            presentations: self.presentations.iter().cloned().collect(),
            sort: SortOption::from_param(&self.sort),
        }
    }
}

// =============================================================================
// Templates
// =============================================================================

/// Catalog listing page template.
#[derive(Template, WebTemplate)]
#[template(path = "catalog/index.html")]
pub struct CatalogIndexTemplate {
    pub products: Vec<ProductCardView>,
    pub facets: Vec<FacetView>,
    pub search_term: String,
    pub price_max: String,
    pub sort: String,
    pub result_count: usize,
    pub user_name: String,
    pub flash: Option<Flash>,
}

/// Product detail page template.
#[derive(Template, WebTemplate)]
#[template(path = "catalog/show.html")]
pub struct CatalogShowTemplate {
    pub product: ProductDetailView,
    pub related: Vec<ProductCardView>,
    pub user_name: String,
    pub flash: Option<Flash>,
}

// =============================================================================
// Handlers
// =============================================================================

/// Display the catalog listing page.
#[instrument(skip(state, session, user))]
pub async fn index(
    State(state): State<AppState>,
    session: Session,
    OptionalUser(user): OptionalUser,
    RawQuery(raw): RawQuery,
) -> Result<impl IntoResponse> {
    let query = CatalogQuery::parse(raw.as_deref());
    let filter = query.to_filter();

    let mut products = state.api().list_products().await?;
    // The active flag hides records from shoppers only
    products.retain(|p| p.active);

    let view = filter.apply(&products);

    let categories = match state.api().list_categories().await {
        Ok(categories) => categories,
        Err(e) => {
            // The grid is still useful without the sidebar facets
            tracing::warn!("Failed to fetch categories: {e}");
            Vec::new()
        }
    };

    let facets = categories
        .iter()
        .filter(|c| c.active)
        .map(|c: &Category| FacetView {
            checked: query.presentations.contains(&c.name),
            label: c.name.clone(),
        })
        .collect();

    Ok(CatalogIndexTemplate {
        result_count: view.len(),
        products: view.iter().map(ProductCardView::from).collect(),
        facets,
        search_term: query.search_term,
        price_max: query
            .price_max
            .unwrap_or_else(|| Decimal::from(DEFAULT_PRICE_MAX))
            .to_string(),
        sort: filter.sort.as_param().to_string(),
        user_name: user.map(|u| u.name).unwrap_or_default(),
        flash: take_flash(&session).await,
    })
}

/// Display the product detail page.
///
/// A non-numeric id in the path is a dead link, not an error page;
/// it redirects home like any other missing record.
#[instrument(skip(state, session, user))]
pub async fn show(
    State(state): State<AppState>,
    session: Session,
    OptionalUser(user): OptionalUser,
    Path(id): Path<String>,
) -> Result<impl IntoResponse> {
    let id: i32 = id
        .parse()
        .map_err(|_| AppError::NotFound(format!("producto {id}")))?;

    let product = state
        .api()
        .get_product(botica_core::ProductId::new(id))
        .await?;

    if !product.active {
        // Inactive products are invisible to shoppers
        return Err(AppError::NotFound(format!("producto {id}")));
    }

    // Same-presentation products make a cheap "related" shelf
    let related: Vec<ProductCardView> = match state.api().list_products().await {
        Ok(products) => products
            .iter()
            .filter(|p| p.active && p.id != product.id && p.presentation == product.presentation)
            .take(4)
            .map(ProductCardView::from)
            .collect(),
        Err(_) => Vec::new(),
    };

    Ok(CatalogShowTemplate {
        product: ProductDetailView::from(&product),
        related,
        user_name: user.map(|u| u.name).unwrap_or_default(),
        flash: take_flash(&session).await,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_empty_query() {
        let query = CatalogQuery::parse(None);
        assert_eq!(query.search_term, "");
        assert!(query.presentations.is_empty());
        assert!(query.price_max.is_none());
    }

    #[test]
    fn test_parse_repeated_presentacion_keys() {
        let query =
            CatalogQuery::parse(Some("presentacion=Jarabe&presentacion=Tableta&orden=asc"));
        assert_eq!(query.presentations, vec!["Jarabe", "Tableta"]);
        assert_eq!(query.sort, "asc");
    }

    #[test]
    fn test_parse_price_max() {
        let query = CatalogQuery::parse(Some("precio_max=20"));
        assert_eq!(query.price_max, Some(Decimal::from(20)));

        // Unparseable ceiling falls back to the default
        let query = CatalogQuery::parse(Some("precio_max=mucho"));
        let filter = query.to_filter();
        assert_eq!(filter.price_max, Decimal::from(DEFAULT_PRICE_MAX));
    }

    #[test]
    fn test_parse_url_encoded_search() {
        let query = CatalogQuery::parse(Some("q=jarabe%20para%20tos"));
        assert_eq!(query.search_term, "jarabe para tos");
    }

    #[test]
    fn test_unknown_keys_ignored() {
        let query = CatalogQuery::parse(Some("utm_source=ads&q=gasa"));
        assert_eq!(query.search_term, "gasa");
    }
}
