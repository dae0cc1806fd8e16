//! Modelos de rendición de gastos
//!
//! Proveedores, categorías, tipos de documento y el gasto propiamente
//! tal. Todas las referencias del gasto son protegidas: no se puede
//! eliminar un proveedor, categoría o tipo con gastos asociados.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// Proveedor - mapea exactamente a la tabla proveedores
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Proveedor {
    pub id: Uuid,
    pub nombre: String,
    pub rut: String,
    pub direccion: String,
    pub telefono: String,
    pub estado: bool,
    pub fecha_creacion: NaiveDate,
    pub creado_por: Option<Uuid>,
}

/// Categoría de gasto - mapea exactamente a la tabla categorias
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Categoria {
    pub id: Uuid,
    pub nombre: String,
    pub estado: bool,
    pub fecha_creacion: NaiveDate,
    pub creado_por: Option<Uuid>,
}

/// Tipo de documento (Factura, Boleta, ...) - tabla tipos_documento
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct TipoDocumento {
    pub id: Uuid,
    pub nombre: String,
    pub estado: bool,
    pub fecha_creacion: NaiveDate,
    pub creado_por: Option<Uuid>,
}

/// Gasto - mapea exactamente a la tabla gastos
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Gasto {
    pub id: Uuid,
    pub obra_id: Uuid,
    pub categoria_id: Uuid,
    pub proveedor_id: Uuid,
    pub monto: Decimal,
    pub fecha: NaiveDate,
    pub tipo_documento_id: Uuid,
    pub creado_por: Option<Uuid>,
    pub fecha_creacion: NaiveDate,
    pub estado: bool,
    pub foto: Option<String>,
    pub sin_foto: bool,
    pub nota: String,
}
