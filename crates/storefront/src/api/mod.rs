//! Pharmacy REST backend client.
//!
//! Plain JSON-over-HTTP with `reqwest`; catalog reads are cached with
//! `moka` for the configured TTL (120 seconds by default) so shopper
//! pages lag admin edits by at most that window. Mutations are never
//! cached and requests are never retried - a failed call surfaces as a
//! banner at the call site.

pub mod types;

use std::sync::Arc;
use std::time::Duration;

use moka::future::Cache;
use thiserror::Error;
use tracing::{debug, instrument};

use botica_core::{ProductId, UserId};

use crate::config::BackendConfig;
use crate::models::{Category, Order, Product, ProfileUpdate, UserProfile};
use types::{
    CategoriaDto, LoginRequest, NuevoPedido, NuevoUsuario, PedidoDto, ProductoDto, UsuarioDto,
    UsuarioUpdate,
};

/// Cache keys for catalog reads.
const CACHE_KEY_PRODUCTS: &str = "productos";
const CACHE_KEY_CATEGORIES: &str = "categorias";

/// Errors that can occur when talking to the pharmacy backend.
#[derive(Debug, Error)]
pub enum ApiError {
    /// HTTP request failed (network, timeout, ...).
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Backend returned a non-2xx response.
    #[error("API error: {status} - {message}")]
    Api { status: u16, message: String },

    /// Backend returned a body we could not decode.
    #[error("Parse error: {0}")]
    Parse(String),

    /// Resource not found.
    #[error("Not found: {0}")]
    NotFound(String),

    /// Credentials rejected by the backend.
    #[error("Invalid credentials")]
    InvalidCredentials,
}

/// Cached catalog values.
#[derive(Debug, Clone)]
enum CacheValue {
    Products(Vec<ProductoDto>),
    Categories(Vec<CategoriaDto>),
}

/// Client for the pharmacy REST backend.
///
/// Cheaply cloneable; all handlers share one connection pool and one
/// catalog cache.
#[derive(Clone)]
pub struct ApiClient {
    inner: Arc<ApiClientInner>,
}

struct ApiClientInner {
    client: reqwest::Client,
    base_url: String,
    cache: Cache<&'static str, CacheValue>,
}

impl ApiClient {
    /// Create a new backend client.
    #[must_use]
    pub fn new(config: &BackendConfig) -> Self {
        let cache = Cache::builder()
            .max_capacity(8)
            .time_to_live(Duration::from_secs(config.catalog_ttl_seconds))
            .build();

        Self {
            inner: Arc::new(ApiClientInner {
                client: reqwest::Client::new(),
                base_url: config.api_base_url.trim_end_matches('/').to_string(),
                cache,
            }),
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{path}", self.inner.base_url)
    }

    /// Check a response status, draining the body into an error on failure.
    async fn check(response: reqwest::Response) -> Result<reqwest::Response, ApiError> {
        let status = response.status();
        if status == reqwest::StatusCode::NOT_FOUND {
            let path = response.url().path().to_string();
            return Err(ApiError::NotFound(path));
        }
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(ApiError::Api {
                status: status.as_u16(),
                message,
            });
        }
        Ok(response)
    }

    async fn get_json<T: serde::de::DeserializeOwned>(&self, path: &str) -> Result<T, ApiError> {
        let response = self.inner.client.get(self.url(path)).send().await?;
        let response = Self::check(response).await?;
        response
            .json::<T>()
            .await
            .map_err(|e| ApiError::Parse(e.to_string()))
    }

    async fn post_json<B: serde::Serialize, T: serde::de::DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T, ApiError> {
        let response = self
            .inner
            .client
            .post(self.url(path))
            .json(body)
            .send()
            .await?;
        let response = Self::check(response).await?;
        response
            .json::<T>()
            .await
            .map_err(|e| ApiError::Parse(e.to_string()))
    }

    async fn put_json<B: serde::Serialize, T: serde::de::DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T, ApiError> {
        let response = self
            .inner
            .client
            .put(self.url(path))
            .json(body)
            .send()
            .await?;
        let response = Self::check(response).await?;
        response
            .json::<T>()
            .await
            .map_err(|e| ApiError::Parse(e.to_string()))
    }

    // =========================================================================
    // Catalog (cached)
    // =========================================================================

    /// Fetch the full product list.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the body cannot be decoded.
    #[instrument(skip(self))]
    pub async fn list_products(&self) -> Result<Vec<Product>, ApiError> {
        if let Some(CacheValue::Products(dtos)) = self.inner.cache.get(CACHE_KEY_PRODUCTS).await {
            debug!("Cache hit for products");
            return Ok(dtos.into_iter().map(Product::from).collect());
        }

        let dtos: Vec<ProductoDto> = self.get_json("/productos").await?;
        self.inner
            .cache
            .insert(CACHE_KEY_PRODUCTS, CacheValue::Products(dtos.clone()))
            .await;

        Ok(dtos.into_iter().map(Product::from).collect())
    }

    /// Fetch a single product.
    ///
    /// Served from the cached list when possible to avoid a per-detail
    /// round trip.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::NotFound` if the product does not exist.
    #[instrument(skip(self), fields(product_id = %id))]
    pub async fn get_product(&self, id: ProductId) -> Result<Product, ApiError> {
        if let Some(CacheValue::Products(dtos)) = self.inner.cache.get(CACHE_KEY_PRODUCTS).await
            && let Some(dto) = dtos.into_iter().find(|p| p.id_producto == id)
        {
            debug!("Cache hit for product");
            return Ok(Product::from(dto));
        }

        let dto: ProductoDto = self.get_json(&format!("/productos/{id}")).await?;
        Ok(Product::from(dto))
    }

    /// Fetch the category list.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the body cannot be decoded.
    #[instrument(skip(self))]
    pub async fn list_categories(&self) -> Result<Vec<Category>, ApiError> {
        if let Some(CacheValue::Categories(dtos)) = self.inner.cache.get(CACHE_KEY_CATEGORIES).await
        {
            debug!("Cache hit for categories");
            return Ok(dtos.into_iter().map(Category::from).collect());
        }

        let dtos: Vec<CategoriaDto> = self.get_json("/categorias").await?;
        self.inner
            .cache
            .insert(CACHE_KEY_CATEGORIES, CacheValue::Categories(dtos.clone()))
            .await;

        Ok(dtos.into_iter().map(Category::from).collect())
    }

    /// Drop all cached catalog data.
    ///
    /// Delivery semantics are at-most-once: a shopper request racing
    /// this call may still serve the old list once.
    pub async fn invalidate_catalog(&self) {
        self.inner.cache.invalidate_all();
        self.inner.cache.run_pending_tasks().await;
    }

    // =========================================================================
    // Users (never cached)
    // =========================================================================

    /// Authenticate against the backend.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::InvalidCredentials` when the backend rejects
    /// the credentials (401/403), other variants on transport failures.
    #[instrument(skip(self, password), fields(email = %email))]
    pub async fn login(&self, email: &str, password: &str) -> Result<UserProfile, ApiError> {
        let body = LoginRequest {
            correo: email,
            contrasena: password,
        };

        let response = self
            .inner
            .client
            .post(self.url("/usuarios/login"))
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        if status == reqwest::StatusCode::UNAUTHORIZED || status == reqwest::StatusCode::FORBIDDEN {
            return Err(ApiError::InvalidCredentials);
        }

        let response = Self::check(response).await?;
        let dto: UsuarioDto = response
            .json()
            .await
            .map_err(|e| ApiError::Parse(e.to_string()))?;
        Ok(UserProfile::from(dto))
    }

    /// Register a new shopper account.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend rejects the registration.
    #[instrument(skip(self, registration))]
    pub async fn register(&self, registration: &NuevoUsuario) -> Result<UserProfile, ApiError> {
        let dto: UsuarioDto = self.post_json("/usuarios", registration).await?;
        Ok(UserProfile::from(dto))
    }

    /// Fetch a user profile.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::NotFound` if the user does not exist.
    #[instrument(skip(self), fields(user_id = %id))]
    pub async fn get_user(&self, id: UserId) -> Result<UserProfile, ApiError> {
        let dto: UsuarioDto = self.get_json(&format!("/usuarios/{id}")).await?;
        Ok(UserProfile::from(dto))
    }

    /// Apply a partial profile update.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend rejects the update.
    #[instrument(skip(self, update), fields(user_id = %id))]
    pub async fn update_user(
        &self,
        id: UserId,
        update: ProfileUpdate,
    ) -> Result<UserProfile, ApiError> {
        let body = UsuarioUpdate::from(update);
        let dto: UsuarioDto = self.put_json(&format!("/usuarios/{id}"), &body).await?;
        Ok(UserProfile::from(dto))
    }

    // =========================================================================
    // Orders (never cached)
    // =========================================================================

    /// Submit a new order.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend rejects the order.
    #[instrument(skip(self, pedido))]
    pub async fn create_order(&self, pedido: &NuevoPedido) -> Result<Order, ApiError> {
        let dto: PedidoDto = self.post_json("/pedidos", pedido).await?;
        Ok(Order::from(dto))
    }

    /// List a shopper's past orders.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the body cannot be decoded.
    #[instrument(skip(self), fields(user_id = %user_id))]
    pub async fn list_orders_for_user(&self, user_id: UserId) -> Result<Vec<Order>, ApiError> {
        let dtos: Vec<PedidoDto> = self.get_json(&format!("/pedidos/usuario/{user_id}")).await?;
        Ok(dtos.into_iter().map(Order::from).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_api_error_display() {
        let err = ApiError::NotFound("/productos/99".to_string());
        assert_eq!(err.to_string(), "Not found: /productos/99");

        let err = ApiError::Api {
            status: 500,
            message: "boom".to_string(),
        };
        assert_eq!(err.to_string(), "API error: 500 - boom");
    }

    #[test]
    fn test_url_joins_without_double_slash() {
        let client = ApiClient::new(&BackendConfig {
            api_base_url: "http://localhost:8080/api/".to_string(),
            catalog_ttl_seconds: 120,
        });
        assert_eq!(
            client.url("/productos"),
            "http://localhost:8080/api/productos"
        );
    }
}
