//! Wire types for the pharmacy REST backend (admin surface).
//!
//! The admin panel sees the full record shapes, active and inactive
//! alike, and writes with the same Spanish field names the backend
//! serves (`idProducto`, `nombre`, `precio`, `activo`, ...).

use serde::{Deserialize, Serialize};

use botica_core::{CategoryId, Email, OrderId, ProductId, ProviderId, Role, UserId};

fn default_true() -> bool {
    true
}

// =============================================================================
// Products
// =============================================================================

/// Product record as served by `GET /productos`.
#[derive(Debug, Clone, Deserialize)]
pub struct ProductoDto {
    #[serde(rename = "idProducto")]
    pub id_producto: ProductId,
    pub nombre: String,
    pub precio: String,
    #[serde(default)]
    pub imagen: Option<String>,
    #[serde(default)]
    pub presentacion: Option<String>,
    #[serde(default)]
    pub descripcion: Option<String>,
    #[serde(default)]
    pub stock: i32,
    #[serde(default = "default_true")]
    pub activo: bool,
    #[serde(default)]
    pub categoria: Option<String>,
    #[serde(default)]
    pub proveedor: Option<String>,
}

/// Product write body for `POST /productos` and `PUT /productos/{id}`.
#[derive(Debug, Clone, Serialize)]
pub struct ProductoInput {
    pub nombre: String,
    pub precio: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub imagen: Option<String>,
    pub presentacion: String,
    pub descripcion: String,
    pub stock: i32,
    pub categoria: String,
    pub proveedor: String,
}

// =============================================================================
// Categories
// =============================================================================

/// Category record as served by `GET /categorias`.
#[derive(Debug, Clone, Deserialize)]
pub struct CategoriaDto {
    #[serde(rename = "idCategoria")]
    pub id_categoria: CategoryId,
    pub nombre: String,
    #[serde(default)]
    pub descripcion: Option<String>,
    #[serde(default = "default_true")]
    pub activo: bool,
}

/// Category write body.
#[derive(Debug, Clone, Serialize)]
pub struct CategoriaInput {
    pub nombre: String,
    pub descripcion: String,
}

// =============================================================================
// Providers
// =============================================================================

/// Provider record as served by `GET /proveedores`.
#[derive(Debug, Clone, Deserialize)]
pub struct ProveedorDto {
    #[serde(rename = "idProveedor")]
    pub id_proveedor: ProviderId,
    pub nombre: String,
    pub ruc: String,
    #[serde(default)]
    pub telefono: Option<String>,
    #[serde(default)]
    pub correo: Option<String>,
    #[serde(default = "default_true")]
    pub activo: bool,
}

/// Provider write body.
#[derive(Debug, Clone, Serialize)]
pub struct ProveedorInput {
    pub nombre: String,
    pub ruc: String,
    pub telefono: String,
    pub correo: String,
}

// =============================================================================
// Users
// =============================================================================

/// User record as served by `GET /usuarios`.
#[derive(Debug, Clone, Deserialize)]
pub struct UsuarioDto {
    #[serde(rename = "idUsuario")]
    pub id_usuario: UserId,
    pub nombres: String,
    pub apellidos: String,
    pub correo: Email,
    pub rol: Role,
    #[serde(default)]
    pub telefono: Option<String>,
    #[serde(default = "default_true")]
    pub activo: bool,
}

/// User write body for `POST /usuarios` and `PUT /usuarios/{id}`.
#[derive(Debug, Clone, Serialize)]
pub struct UsuarioInput {
    pub nombres: String,
    pub apellidos: String,
    pub correo: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub contrasena: Option<String>,
    pub rol: Role,
    pub telefono: String,
}

/// Credentials body for `POST /usuarios/login`.
#[derive(Debug, Serialize)]
pub struct LoginRequest<'a> {
    pub correo: &'a str,
    pub contrasena: &'a str,
}

// =============================================================================
// Orders
// =============================================================================

/// Order record as served by `GET /pedidos`.
#[derive(Debug, Clone, Deserialize)]
pub struct PedidoDto {
    #[serde(rename = "idPedido")]
    pub id_pedido: OrderId,
    #[serde(default)]
    pub fecha: Option<String>,
    #[serde(default)]
    pub estado: Option<String>,
    #[serde(default)]
    pub total: Option<String>,
    #[serde(rename = "nombreContacto", default)]
    pub nombre_contacto: Option<String>,
    #[serde(rename = "metodoEntrega", default)]
    pub metodo_entrega: Option<String>,
    #[serde(rename = "metodoPago", default)]
    pub metodo_pago: Option<String>,
}

/// Order status update body for `PUT /pedidos/{id}/estado`.
#[derive(Debug, Serialize)]
pub struct EstadoPedidoInput {
    pub estado: String,
}

// =============================================================================
// Reports
// =============================================================================

/// One sales report row as served by `GET /reports/ventas`.
#[derive(Debug, Clone, Deserialize)]
pub struct ReporteVentaDto {
    pub periodo: String,
    pub pedidos: u32,
    pub unidades: u32,
    pub total: String,
}

/// Active-flag toggle body shared by every resource.
#[derive(Debug, Serialize)]
pub struct EstadoInput {
    pub activo: bool,
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_producto_wire_names() {
        let json = r#"{
            "idProducto": 7,
            "nombre": "Ibuprofeno 400mg",
            "precio": "S/.6.90",
            "stock": 12,
            "activo": false,
            "categoria": "Analgesicos",
            "proveedor": "Droguería Lima"
        }"#;
        let dto: ProductoDto = serde_json::from_str(json).unwrap();
        assert_eq!(dto.id_producto, ProductId::new(7));
        assert!(!dto.activo);
        assert_eq!(dto.proveedor.as_deref(), Some("Droguería Lima"));
    }

    #[test]
    fn test_usuario_input_skips_missing_password() {
        let input = UsuarioInput {
            nombres: "Luis".to_string(),
            apellidos: "Quispe".to_string(),
            correo: "luis@example.com".to_string(),
            contrasena: None,
            rol: Role::User,
            telefono: String::new(),
        };
        let json = serde_json::to_string(&input).unwrap();
        assert!(!json.contains("contrasena"));
        assert!(json.contains("\"rol\":\"USER\""));
    }

    #[test]
    fn test_estado_input_shape() {
        let json = serde_json::to_string(&EstadoInput { activo: false }).unwrap();
        assert_eq!(json, r#"{"activo":false}"#);
    }

    #[test]
    fn test_reporte_venta_parses() {
        let json = r#"{"periodo":"2026-07","pedidos":41,"unidades":120,"total":"S/.1850.50"}"#;
        let dto: ReporteVentaDto = serde_json::from_str(json).unwrap();
        assert_eq!(dto.pedidos, 41);
    }
}
