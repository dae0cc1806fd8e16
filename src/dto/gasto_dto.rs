use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use crate::dto::registro_dto::{ArchivoNuevo, FotoData};

// Request para crear/editar un proveedor
#[derive(Debug, Deserialize, Validate)]
pub struct GuardarProveedorRequest {
    #[serde(default)]
    #[validate(length(max = 150))]
    pub nombre: String,
    #[serde(default)]
    #[validate(length(max = 20))]
    pub rut: String,
    #[serde(default)]
    #[validate(length(max = 255))]
    pub direccion: String,
    #[serde(default)]
    #[validate(length(max = 30))]
    pub telefono: String,
    #[serde(default)]
    pub fecha_creacion: String,
}

// Request para crear/editar una categoría de gasto
#[derive(Debug, Deserialize, Validate)]
pub struct GuardarCategoriaRequest {
    #[serde(default)]
    #[validate(length(max = 120))]
    pub nombre: String,
    #[serde(default)]
    pub fecha_creacion: String,
}

// Request para crear/editar un tipo de documento
#[derive(Debug, Deserialize, Validate)]
pub struct GuardarTipoDocumentoRequest {
    #[serde(default)]
    #[validate(length(max = 150))]
    pub nombre: String,
    #[serde(default)]
    pub fecha_creacion: String,
}

// Request para crear/editar un gasto. El monto viaja como texto y pasa
// por el mismo normalizador decimal que las horas (coma o punto).
#[derive(Debug, Default, Deserialize)]
pub struct GuardarGastoRequest {
    pub obra: Option<Uuid>,
    pub categoria: Option<Uuid>,
    pub proveedor: Option<Uuid>,
    pub tipo_documento: Option<Uuid>,
    #[serde(default)]
    pub monto: String,
    #[serde(default)]
    pub fecha: String,
    #[serde(default)]
    pub fecha_creacion: String,
    pub foto: Option<ArchivoNuevo>,
    #[serde(default)]
    pub sin_foto: bool,
    #[serde(default)]
    pub nota: String,
}

// Response de gasto con los nombres de sus referencias resueltos
#[derive(Debug, Serialize)]
pub struct GastoResponse {
    pub id: Uuid,
    pub obra_id: Uuid,
    pub obra_nombre: String,
    pub categoria_id: Uuid,
    pub categoria_nombre: String,
    pub proveedor_id: Uuid,
    pub proveedor_nombre: String,
    pub tipo_documento_id: Uuid,
    pub tipo_documento_nombre: String,
    pub monto: Decimal,
    pub fecha: NaiveDate,
    pub fecha_creacion: NaiveDate,
    pub estado: bool,
    pub foto: Option<String>,
    pub sin_foto: bool,
    pub nota: String,
    pub creado_por_nombre: Option<String>,
    pub photos_data: Vec<FotoData>,
}
