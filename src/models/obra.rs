//! Modelo de Obra
//!
//! Una obra es un proyecto de construcción. Su código es único sin
//! distinguir mayúsculas y se guarda siempre en mayúsculas; no puede
//! eliminarse ni desactivarse mientras tenga registros de libro.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// Obra - mapea exactamente a la tabla obras
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Obra {
    pub id: Uuid,
    pub nombre: String,
    pub codigo: String,
    pub descripcion: Option<String>,
    pub direccion: String,
    pub ciudad_id: Uuid,
    pub fecha_inicio: NaiveDate,
    pub fecha_fin_estimada: NaiveDate,
    pub estado_obra_id: Uuid,
    pub estado: bool,
    pub creado_por: Option<Uuid>,
    pub fecha_creacion: DateTime<Utc>,
    pub fecha_modificacion: DateTime<Utc>,
}
