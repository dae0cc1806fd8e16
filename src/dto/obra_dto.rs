use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

// Request para crear/editar una obra. El estado activo/inactivo no
// viene aquí: sólo cambia por el endpoint de toggle.
#[derive(Debug, Deserialize, Validate)]
pub struct GuardarObraRequest {
    #[serde(default)]
    #[validate(length(max = 200))]
    pub nombre: String,
    #[serde(default)]
    #[validate(length(max = 50))]
    pub codigo: String,
    #[serde(default)]
    pub descripcion: String,
    #[serde(default)]
    #[validate(length(max = 300))]
    pub direccion: String,
    pub ciudad: Option<Uuid>,
    pub fecha_inicio: Option<NaiveDate>,
    pub fecha_fin_estimada: Option<NaiveDate>,
    pub estado_obra: Option<Uuid>,
}

// Response de obra con ciudad, país, estado y creador resueltos
#[derive(Debug, Serialize)]
pub struct ObraResponse {
    pub id: Uuid,
    pub nombre: String,
    pub codigo: String,
    pub descripcion: Option<String>,
    pub direccion: String,
    pub ciudad_id: Uuid,
    pub ciudad_nombre: String,
    pub pais_nombre: String,
    pub fecha_inicio: NaiveDate,
    pub fecha_fin_estimada: NaiveDate,
    pub estado_obra_id: Uuid,
    pub estado_obra_nombre: String,
    pub estado: bool,
    pub creado_por_nombre: Option<String>,
    pub fecha_creacion: DateTime<Utc>,
    pub fecha_modificacion: DateTime<Utc>,
}
