use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

// Request para crear/editar un país
#[derive(Debug, Deserialize, Validate)]
pub struct GuardarPaisRequest {
    #[serde(default)]
    #[validate(length(min = 2, max = 100, message = "El nombre debe tener al menos 2 caracteres."))]
    pub nombre: String,
    #[serde(default)]
    pub fecha_creacion: String,
}

// Request para crear/editar una ciudad
#[derive(Debug, Deserialize, Validate)]
pub struct GuardarCiudadRequest {
    pub pais: Option<Uuid>,
    #[serde(default)]
    #[validate(length(min = 2, max = 100, message = "El nombre debe tener al menos 2 caracteres."))]
    pub nombre: String,
    #[serde(default)]
    pub fecha_creacion: String,
}

// Request para crear/editar un estado de obra
#[derive(Debug, Deserialize, Validate)]
pub struct GuardarEstadoObraRequest {
    #[serde(default)]
    #[validate(length(min = 2, max = 100, message = "El nombre debe tener al menos 2 caracteres."))]
    pub nombre: String,
    #[serde(default)]
    pub fecha_creacion: String,
}

// Response de ciudad con el nombre del país resuelto
#[derive(Debug, Serialize)]
pub struct CiudadResponse {
    pub id: Uuid,
    pub nombre: String,
    pub pais_id: Uuid,
    pub pais_nombre: String,
    pub estado: bool,
    pub fecha_creacion: NaiveDate,
    pub fecha_modificacion: DateTime<Utc>,
}
