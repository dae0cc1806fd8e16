//! Modelos del catálogo geográfico y de estados de obra
//!
//! Países, ciudades y estados de obra. Los tres se crean inactivos y
//! se activan explícitamente desde la administración.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// País - mapea exactamente a la tabla paises
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Pais {
    pub id: Uuid,
    pub nombre: String,
    pub estado: bool,
    pub creado_por: Option<Uuid>,
    pub fecha_creacion: NaiveDate,
    pub fecha_modificacion: DateTime<Utc>,
}

/// Ciudad - mapea exactamente a la tabla ciudades
///
/// El nombre es único dentro de su país (comparación sin distinguir
/// mayúsculas, validada antes de escribir).
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Ciudad {
    pub id: Uuid,
    pub nombre: String,
    pub pais_id: Uuid,
    pub estado: bool,
    pub creado_por: Option<Uuid>,
    pub fecha_creacion: NaiveDate,
    pub fecha_modificacion: DateTime<Utc>,
}

/// Estado de obra (En Ejecución, Paralizada, ...) - tabla estados_obra
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct EstadoObra {
    pub id: Uuid,
    pub nombre: String,
    pub estado: bool,
    pub creado_por: Option<Uuid>,
    pub fecha_creacion: NaiveDate,
    pub fecha_modificacion: DateTime<Utc>,
}
