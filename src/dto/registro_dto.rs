use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Prefijo público bajo el que se sirven los archivos subidos.
pub const MEDIA_URL: &str = "/media/";

/// URL pública de un archivo guardado (p. ej. `libro_obras/muro.jpg`).
pub fn media_url(path: &str) -> String {
    format!("{}{}", MEDIA_URL, path)
}

// Metadatos de un archivo adjunto nuevo. Los bytes no pasan por esta
// API: el almacenamiento los recibe aparte y aquí sólo se registra la
// ruta y el content type.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ArchivoNuevo {
    pub nombre: String,
    pub content_type: String,
}

// Request para crear/editar un registro del libro de obras. Los campos
// repetidos llegan como arreglos paralelos, igual que el formulario:
// trabajador[i] va con horas[i] y horas_extra[i].
#[derive(Debug, Default, Deserialize)]
pub struct GuardarRegistroRequest {
    pub obra: Option<Uuid>,
    #[serde(default)]
    pub fecha: String,
    #[serde(default)]
    pub observaciones: String,
    pub fotografia: Option<ArchivoNuevo>,
    #[serde(default)]
    pub tarea: Vec<String>,
    #[serde(default)]
    pub trabajador: Vec<String>,
    #[serde(default)]
    pub horas: Vec<String>,
    #[serde(default)]
    pub horas_extra: Vec<String>,
    #[serde(default)]
    pub archivos: Vec<ArchivoNuevo>,
    // ids de fotografías a eliminar, separados por coma
    #[serde(default)]
    pub deleted_ids: String,
}

#[derive(Debug, Serialize)]
pub struct TareaResponse {
    pub id: Uuid,
    pub descripcion: String,
    pub orden: i32,
}

#[derive(Debug, Serialize)]
pub struct TrabajadorHorasResponse {
    pub id: Uuid,
    pub trabajador_id: Uuid,
    pub trabajador_nombre: String,
    pub horas_trabajadas: Decimal,
    pub horas_extras: Decimal,
}

#[derive(Debug, Serialize)]
pub struct FotografiaResponse {
    pub id: Uuid,
    pub archivo: String,
    pub tipo: String,
    pub orden: i32,
    pub url: String,
}

// Entrada de la galería: la foto principal primero y después los
// adjuntos ordenados
#[derive(Debug, Serialize)]
pub struct FotoData {
    pub url: String,
    pub name: String,
}

// Response de registro con sus colecciones anidadas
#[derive(Debug, Serialize)]
pub struct RegistroResponse {
    pub id: Uuid,
    pub obra_id: Uuid,
    pub obra_nombre: String,
    pub fecha: NaiveDate,
    pub supervisor_id: Uuid,
    pub supervisor_nombre: String,
    pub observaciones: String,
    pub fotografia: Option<String>,
    pub tareas: Vec<TareaResponse>,
    pub trabajadores: Vec<TrabajadorHorasResponse>,
    pub fotografias: Vec<FotografiaResponse>,
    pub photos_data: Vec<FotoData>,
    pub fecha_creacion: DateTime<Utc>,
    pub fecha_modificacion: DateTime<Utc>,
}
