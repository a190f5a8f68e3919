//! Wire types for the pharmacy REST backend.
//!
//! The backend speaks Spanish field names (`idProducto`, `nombre`,
//! `precio`, ...). These DTOs mirror that contract exactly; everything
//! else in the crate works with the converted domain types from
//! [`crate::models`].

use serde::{Deserialize, Serialize};

use botica_core::{CategoryId, Email, OrderId, Price, ProductId, Role, UserId};

use crate::models::{Category, Order, Product, ProfileUpdate, UserProfile};

fn default_true() -> bool {
    true
}

// =============================================================================
// Products & Categories
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
}

/// Category record as served by `GET /categorias`.
#[derive(Debug, Clone, Deserialize)]
pub struct CategoriaDto {
    #[serde(rename = "idCategoria")]
    pub id_categoria: CategoryId,
    pub nombre: String,
    #[serde(default = "default_true")]
    pub activo: bool,
}

// =============================================================================
// Users
// =============================================================================

/// User record as served by the `/usuarios` endpoints.
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
    #[serde(default)]
    pub direccion: Option<String>,
    #[serde(default)]
    pub imagen: Option<String>,
}

/// Credentials body for `POST /usuarios/login`.
#[derive(Debug, Serialize)]
pub struct LoginRequest<'a> {
    pub correo: &'a str,
    pub contrasena: &'a str,
}

/// Registration body for `POST /usuarios`.
#[derive(Debug, Serialize)]
pub struct NuevoUsuario {
    pub nombres: String,
    pub apellidos: String,
    pub correo: String,
    pub contrasena: String,
    pub rol: Role,
}

/// Partial profile update body for `PUT /usuarios/{id}`.
///
/// `None` fields are omitted from the JSON body so the backend leaves
/// them untouched. Email is deliberately not part of this shape.
#[derive(Debug, Serialize, Default)]
pub struct UsuarioUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub nombres: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub apellidos: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub telefono: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub direccion: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub imagen: Option<String>,
}

// =============================================================================
// Orders
// =============================================================================

/// Order line for `POST /pedidos`.
#[derive(Debug, Clone, Serialize)]
pub struct DetallePedidoDto {
    #[serde(rename = "idProducto")]
    pub id_producto: ProductId,
    pub cantidad: u32,
    #[serde(rename = "precioUnitario")]
    pub precio_unitario: String,
}

/// Order creation body for `POST /pedidos`.
#[derive(Debug, Clone, Serialize)]
pub struct NuevoPedido {
    #[serde(rename = "idUsuario", skip_serializing_if = "Option::is_none")]
    pub id_usuario: Option<UserId>,
    #[serde(rename = "metodoEntrega")]
    pub metodo_entrega: String,
    #[serde(rename = "metodoPago")]
    pub metodo_pago: String,
    #[serde(rename = "direccionEntrega")]
    pub direccion_entrega: String,
    #[serde(rename = "nombreContacto")]
    pub nombre_contacto: String,
    #[serde(rename = "telefonoContacto")]
    pub telefono_contacto: String,
    #[serde(rename = "correoContacto")]
    pub correo_contacto: String,
    pub total: String,
    pub detalles: Vec<DetallePedidoDto>,
}

/// Order record as served by the `/pedidos` endpoints.
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
}

// =============================================================================
// Conversions to domain types
// =============================================================================

impl From<ProductoDto> for Product {
    fn from(dto: ProductoDto) -> Self {
        let price = Price::parse(&dto.precio);
        Self {
            id: dto.id_producto,
            name: dto.nombre,
            price,
            price_raw: dto.precio,
            image: dto.imagen.unwrap_or_default(),
            presentation: dto.presentacion.unwrap_or_default(),
            description: dto.descripcion.unwrap_or_default(),
            stock: dto.stock,
            active: dto.activo,
        }
    }
}

impl From<CategoriaDto> for Category {
    fn from(dto: CategoriaDto) -> Self {
        Self {
            id: dto.id_categoria,
            name: dto.nombre,
            active: dto.activo,
        }
    }
}

impl From<UsuarioDto> for UserProfile {
    fn from(dto: UsuarioDto) -> Self {
        Self {
            id: dto.id_usuario,
            first_name: dto.nombres,
            last_name: dto.apellidos,
            email: dto.correo,
            role: dto.rol,
            phone: dto.telefono.unwrap_or_default(),
            address: dto.direccion.unwrap_or_default(),
            image: dto.imagen.unwrap_or_default(),
        }
    }
}

impl From<ProfileUpdate> for UsuarioUpdate {
    fn from(update: ProfileUpdate) -> Self {
        Self {
            nombres: update.first_name,
            apellidos: update.last_name,
            telefono: update.phone,
            direccion: update.address,
            imagen: update.image,
        }
    }
}

impl From<PedidoDto> for Order {
    fn from(dto: PedidoDto) -> Self {
        Self {
            id: dto.id_pedido,
            date: dto.fecha.unwrap_or_default(),
            status: dto.estado.unwrap_or_default(),
            total: dto.total.as_deref().map_or(Price::ZERO, Price::parse),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_producto_deserializes_wire_names() {
        let json = r#"{
            "idProducto": 3,
            "nombre": "Paracetamol 500mg",
            "precio": "S/.8.50",
            "presentacion": "Tableta",
            "stock": 20,
            "activo": true
        }"#;
        let dto: ProductoDto = serde_json::from_str(json).unwrap();
        assert_eq!(dto.id_producto, ProductId::new(3));

        let product = Product::from(dto);
        assert_eq!(product.name, "Paracetamol 500mg");
        assert_eq!(product.price.display(), "S/.8.50");
        assert_eq!(product.presentation, "Tableta");
        assert!(product.active);
    }

    #[test]
    fn test_producto_missing_optionals_default() {
        let json = r#"{"idProducto": 1, "nombre": "Alcohol", "precio": "S/.4,00"}"#;
        let dto: ProductoDto = serde_json::from_str(json).unwrap();
        assert!(dto.activo);
        assert_eq!(dto.stock, 0);

        let product = Product::from(dto);
        assert_eq!(product.image, "");
        assert_eq!(product.price.display(), "S/.4.00");
    }

    #[test]
    fn test_usuario_update_skips_none_fields() {
        let update = UsuarioUpdate {
            telefono: Some("999888777".to_string()),
            ..UsuarioUpdate::default()
        };
        let json = serde_json::to_string(&update).unwrap();
        assert_eq!(json, r#"{"telefono":"999888777"}"#);
    }

    #[test]
    fn test_nuevo_pedido_wire_names() {
        let pedido = NuevoPedido {
            id_usuario: Some(UserId::new(9)),
            metodo_entrega: "DELIVERY".to_string(),
            metodo_pago: "TARJETA".to_string(),
            direccion_entrega: "Av. Arequipa 123".to_string(),
            nombre_contacto: "Ana Torres".to_string(),
            telefono_contacto: "987654321".to_string(),
            correo_contacto: "ana@example.com".to_string(),
            total: "S/.29.00".to_string(),
            detalles: vec![DetallePedidoDto {
                id_producto: ProductId::new(3),
                cantidad: 2,
                precio_unitario: "S/.8.50".to_string(),
            }],
        };
        let value = serde_json::to_value(&pedido).unwrap();
        assert_eq!(value["idUsuario"], 9);
        assert_eq!(value["metodoEntrega"], "DELIVERY");
        assert_eq!(value["detalles"][0]["idProducto"], 3);
        assert_eq!(value["detalles"][0]["precioUnitario"], "S/.8.50");
    }
}
