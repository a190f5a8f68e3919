//! Pharmacy REST backend client (admin surface).
//!
//! Uncached by design: every admin action is a single request followed
//! by a full list reload, so the panel always renders what the backend
//! just confirmed. Nothing is retried automatically; failures surface
//! as a banner on the page that issued the action.

pub mod types;

use std::sync::Arc;

use thiserror::Error;
use tracing::instrument;

use botica_core::{CategoryId, OrderId, ProductId, ProviderId, UserId};

use crate::config::AdminConfig;
use types::{
    CategoriaDto, CategoriaInput, EstadoInput, EstadoPedidoInput, LoginRequest, PedidoDto,
    ProductoDto, ProductoInput, ProveedorDto, ProveedorInput, ReporteVentaDto, UsuarioDto,
    UsuarioInput,
};

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

/// A CSV/XLSX export streamed from the backend.
#[derive(Debug, Clone)]
pub struct Export {
    pub filename: String,
    pub content_type: String,
    pub bytes: Vec<u8>,
}

/// Client for the pharmacy REST backend.
#[derive(Clone)]
pub struct AdminApiClient {
    inner: Arc<AdminApiClientInner>,
}

struct AdminApiClientInner {
    client: reqwest::Client,
    base_url: String,
}

impl AdminApiClient {
    /// Create a new backend client.
    #[must_use]
    pub fn new(config: &AdminConfig) -> Self {
        Self {
            inner: Arc::new(AdminApiClientInner {
                client: reqwest::Client::new(),
                base_url: config.api_base_url.trim_end_matches('/').to_string(),
            }),
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{path}", self.inner.base_url)
    }

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

    async fn post_json<B: serde::Serialize>(&self, path: &str, body: &B) -> Result<(), ApiError> {
        let response = self
            .inner
            .client
            .post(self.url(path))
            .json(body)
            .send()
            .await?;
        Self::check(response).await?;
        Ok(())
    }

    async fn put_json<B: serde::Serialize>(&self, path: &str, body: &B) -> Result<(), ApiError> {
        let response = self
            .inner
            .client
            .put(self.url(path))
            .json(body)
            .send()
            .await?;
        Self::check(response).await?;
        Ok(())
    }

    async fn delete(&self, path: &str) -> Result<(), ApiError> {
        let response = self.inner.client.delete(self.url(path)).send().await?;
        Self::check(response).await?;
        Ok(())
    }

    /// Stream a backend-generated export file.
    async fn fetch_export(&self, path: &str, fallback_name: &str) -> Result<Export, ApiError> {
        let response = self.inner.client.get(self.url(path)).send().await?;
        let response = Self::check(response).await?;

        let content_type = response
            .headers()
            .get(reqwest::header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .unwrap_or("text/csv")
            .to_string();

        let filename = response
            .headers()
            .get(reqwest::header::CONTENT_DISPOSITION)
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.split("filename=").nth(1))
            .map_or_else(|| fallback_name.to_string(), |v| v.trim_matches('"').to_string());

        let bytes = response.bytes().await?.to_vec();

        Ok(Export {
            filename,
            content_type,
            bytes,
        })
    }

    // =========================================================================
    // Auth
    // =========================================================================

    /// Authenticate an admin against the backend.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::InvalidCredentials` when the backend rejects
    /// the credentials or the account lacks the admin role.
    #[instrument(skip(self, password), fields(email = %email))]
    pub async fn login(&self, email: &str, password: &str) -> Result<UsuarioDto, ApiError> {
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

        if !dto.rol.is_admin() {
            // A valid shopper account is still not an admin login
            return Err(ApiError::InvalidCredentials);
        }

        Ok(dto)
    }

    // =========================================================================
    // Products
    // =========================================================================

    /// List all products, active and inactive.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the body cannot be decoded.
    #[instrument(skip(self))]
    pub async fn list_products(&self) -> Result<Vec<ProductoDto>, ApiError> {
        self.get_json("/productos").await
    }

    /// Fetch a single product.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::NotFound` if the product does not exist.
    #[instrument(skip(self), fields(product_id = %id))]
    pub async fn get_product(&self, id: ProductId) -> Result<ProductoDto, ApiError> {
        self.get_json(&format!("/productos/{id}")).await
    }

    /// Create a product.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend rejects the record.
    #[instrument(skip(self, input))]
    pub async fn create_product(&self, input: &ProductoInput) -> Result<(), ApiError> {
        self.post_json("/productos", input).await
    }

    /// Update a product.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend rejects the record.
    #[instrument(skip(self, input), fields(product_id = %id))]
    pub async fn update_product(&self, id: ProductId, input: &ProductoInput) -> Result<(), ApiError> {
        self.put_json(&format!("/productos/{id}"), input).await
    }

    /// Toggle a product's active flag.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend rejects the change.
    #[instrument(skip(self), fields(product_id = %id))]
    pub async fn set_product_active(&self, id: ProductId, active: bool) -> Result<(), ApiError> {
        self.put_json(&format!("/productos/{id}/estado"), &EstadoInput { activo: active })
            .await
    }

    /// Delete a product.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend rejects the deletion.
    #[instrument(skip(self), fields(product_id = %id))]
    pub async fn delete_product(&self, id: ProductId) -> Result<(), ApiError> {
        self.delete(&format!("/productos/{id}")).await
    }

    /// Export the product list as CSV.
    ///
    /// # Errors
    ///
    /// Returns an error if the export request fails.
    #[instrument(skip(self))]
    pub async fn export_products(&self) -> Result<Export, ApiError> {
        self.fetch_export("/reports/productos?formato=csv", "productos.csv")
            .await
    }

    // =========================================================================
    // Categories
    // =========================================================================

    /// List all categories.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the body cannot be decoded.
    #[instrument(skip(self))]
    pub async fn list_categories(&self) -> Result<Vec<CategoriaDto>, ApiError> {
        self.get_json("/categorias").await
    }

    /// Create a category.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend rejects the record.
    #[instrument(skip(self, input))]
    pub async fn create_category(&self, input: &CategoriaInput) -> Result<(), ApiError> {
        self.post_json("/categorias", input).await
    }

    /// Update a category.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend rejects the record.
    #[instrument(skip(self, input), fields(category_id = %id))]
    pub async fn update_category(
        &self,
        id: CategoryId,
        input: &CategoriaInput,
    ) -> Result<(), ApiError> {
        self.put_json(&format!("/categorias/{id}"), input).await
    }

    /// Toggle a category's active flag.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend rejects the change.
    #[instrument(skip(self), fields(category_id = %id))]
    pub async fn set_category_active(&self, id: CategoryId, active: bool) -> Result<(), ApiError> {
        self.put_json(&format!("/categorias/{id}/estado"), &EstadoInput { activo: active })
            .await
    }

    /// Delete a category.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend rejects the deletion.
    #[instrument(skip(self), fields(category_id = %id))]
    pub async fn delete_category(&self, id: CategoryId) -> Result<(), ApiError> {
        self.delete(&format!("/categorias/{id}")).await
    }

    /// Export the category list as CSV.
    ///
    /// # Errors
    ///
    /// Returns an error if the export request fails.
    #[instrument(skip(self))]
    pub async fn export_categories(&self) -> Result<Export, ApiError> {
        self.fetch_export("/reports/categorias?formato=csv", "categorias.csv")
            .await
    }

    // =========================================================================
    // Providers
    // =========================================================================

    /// List all providers.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the body cannot be decoded.
    #[instrument(skip(self))]
    pub async fn list_providers(&self) -> Result<Vec<ProveedorDto>, ApiError> {
        self.get_json("/proveedores").await
    }

    /// Create a provider.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend rejects the record.
    #[instrument(skip(self, input))]
    pub async fn create_provider(&self, input: &ProveedorInput) -> Result<(), ApiError> {
        self.post_json("/proveedores", input).await
    }

    /// Update a provider.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend rejects the record.
    #[instrument(skip(self, input), fields(provider_id = %id))]
    pub async fn update_provider(
        &self,
        id: ProviderId,
        input: &ProveedorInput,
    ) -> Result<(), ApiError> {
        self.put_json(&format!("/proveedores/{id}"), input).await
    }

    /// Toggle a provider's active flag.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend rejects the change.
    #[instrument(skip(self), fields(provider_id = %id))]
    pub async fn set_provider_active(&self, id: ProviderId, active: bool) -> Result<(), ApiError> {
        self.put_json(&format!("/proveedores/{id}/estado"), &EstadoInput { activo: active })
            .await
    }

    /// Delete a provider.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend rejects the deletion.
    #[instrument(skip(self), fields(provider_id = %id))]
    pub async fn delete_provider(&self, id: ProviderId) -> Result<(), ApiError> {
        self.delete(&format!("/proveedores/{id}")).await
    }

    /// Export the provider list as CSV.
    ///
    /// # Errors
    ///
    /// Returns an error if the export request fails.
    #[instrument(skip(self))]
    pub async fn export_providers(&self) -> Result<Export, ApiError> {
        self.fetch_export("/reports/proveedores?formato=csv", "proveedores.csv")
            .await
    }

    // =========================================================================
    // Users
    // =========================================================================

    /// List all user accounts.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the body cannot be decoded.
    #[instrument(skip(self))]
    pub async fn list_users(&self) -> Result<Vec<UsuarioDto>, ApiError> {
        self.get_json("/usuarios").await
    }

    /// Create a user account.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend rejects the record.
    #[instrument(skip(self, input))]
    pub async fn create_user(&self, input: &UsuarioInput) -> Result<(), ApiError> {
        self.post_json("/usuarios", input).await
    }

    /// Update a user account.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend rejects the record.
    #[instrument(skip(self, input), fields(user_id = %id))]
    pub async fn update_user(&self, id: UserId, input: &UsuarioInput) -> Result<(), ApiError> {
        self.put_json(&format!("/usuarios/{id}"), input).await
    }

    /// Toggle a user's active flag.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend rejects the change.
    #[instrument(skip(self), fields(user_id = %id))]
    pub async fn set_user_active(&self, id: UserId, active: bool) -> Result<(), ApiError> {
        self.put_json(&format!("/usuarios/{id}/estado"), &EstadoInput { activo: active })
            .await
    }

    /// Delete a user account.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend rejects the deletion.
    #[instrument(skip(self), fields(user_id = %id))]
    pub async fn delete_user(&self, id: UserId) -> Result<(), ApiError> {
        self.delete(&format!("/usuarios/{id}")).await
    }

    /// Export the user list as CSV.
    ///
    /// # Errors
    ///
    /// Returns an error if the export request fails.
    #[instrument(skip(self))]
    pub async fn export_users(&self) -> Result<Export, ApiError> {
        self.fetch_export("/reports/usuarios?formato=csv", "usuarios.csv")
            .await
    }

    // =========================================================================
    // Orders
    // =========================================================================

    /// List all orders.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the body cannot be decoded.
    #[instrument(skip(self))]
    pub async fn list_orders(&self) -> Result<Vec<PedidoDto>, ApiError> {
        self.get_json("/pedidos").await
    }

    /// Update an order's status.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend rejects the change.
    #[instrument(skip(self), fields(order_id = %id))]
    pub async fn update_order_status(&self, id: OrderId, status: &str) -> Result<(), ApiError> {
        self.put_json(
            &format!("/pedidos/{id}/estado"),
            &EstadoPedidoInput {
                estado: status.to_string(),
            },
        )
        .await
    }

    /// Delete an order.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend rejects the deletion.
    #[instrument(skip(self), fields(order_id = %id))]
    pub async fn delete_order(&self, id: OrderId) -> Result<(), ApiError> {
        self.delete(&format!("/pedidos/{id}")).await
    }

    /// Export the order list as CSV.
    ///
    /// # Errors
    ///
    /// Returns an error if the export request fails.
    #[instrument(skip(self))]
    pub async fn export_orders(&self) -> Result<Export, ApiError> {
        self.fetch_export("/reports/pedidos?formato=csv", "pedidos.csv")
            .await
    }

    // =========================================================================
    // Reports
    // =========================================================================

    /// Fetch the sales report rows.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the body cannot be decoded.
    #[instrument(skip(self))]
    pub async fn sales_report(&self) -> Result<Vec<ReporteVentaDto>, ApiError> {
        self.get_json("/reports/ventas").await
    }

    /// Export the sales report (CSV or XLSX).
    ///
    /// # Errors
    ///
    /// Returns an error if the export request fails.
    #[instrument(skip(self))]
    pub async fn export_sales(&self, format: &str) -> Result<Export, ApiError> {
        let format = if format == "xlsx" { "xlsx" } else { "csv" };
        self.fetch_export(
            &format!("/reports/ventas/export?formato={format}"),
            &format!("ventas.{format}"),
        )
        .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use secrecy::SecretString;

    fn config() -> AdminConfig {
        AdminConfig {
            host: "127.0.0.1".parse().expect("valid ip"),
            port: 3001,
            base_url: "http://localhost:3001".to_string(),
            session_secret: SecretString::from("x".repeat(32)),
            api_base_url: "http://localhost:8080/api/".to_string(),
        }
    }

    #[test]
    fn test_url_joins_without_double_slash() {
        let client = AdminApiClient::new(&config());
        assert_eq!(client.url("/pedidos"), "http://localhost:8080/api/pedidos");
    }

    #[test]
    fn test_api_error_display() {
        let err = ApiError::Api {
            status: 422,
            message: "RUC invalido".to_string(),
        };
        assert_eq!(err.to_string(), "API error: 422 - RUC invalido");
    }
}
