//! Modelos del libro de obras
//!
//! Un registro es la actividad de un día en una obra: observaciones del
//! supervisor, tareas realizadas, horas por trabajador y archivos
//! adjuntos. Las colecciones hijas viven y mueren con su registro.

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// Registro del libro de obras - tabla registros_libro
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct RegistroLibroObra {
    pub id: Uuid,
    pub obra_id: Uuid,
    pub fecha: NaiveDate,
    pub supervisor_id: Uuid,
    pub observaciones: Option<String>,
    pub fotografia: Option<String>,
    pub creado_por: Option<Uuid>,
    pub fecha_creacion: DateTime<Utc>,
    pub fecha_modificacion: DateTime<Utc>,
}

/// Tarea realizada en un registro - tabla tareas_realizadas
///
/// El orden es la posición de envío (1-based); la colección completa se
/// reemplaza en cada edición del registro.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct TareaRealizada {
    pub id: Uuid,
    pub registro_id: Uuid,
    pub descripcion: String,
    pub orden: i32,
}

/// Horas de un trabajador dentro de un registro - tabla trabajadores_registro
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct TrabajadorRegistro {
    pub id: Uuid,
    pub registro_id: Uuid,
    pub trabajador_id: Uuid,
    pub horas_trabajadas: Decimal,
    pub horas_extras: Decimal,
}

/// Fotografía o video adjunto a un registro - tabla fotografias_registro
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct FotografiaRegistro {
    pub id: Uuid,
    pub registro_id: Uuid,
    pub archivo: String,
    pub tipo: String,
    pub orden: i32,
    pub fecha_subida: DateTime<Utc>,
}

/// Clasificación de un archivo adjunto según su content type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TipoArchivo {
    Imagen,
    Video,
}

impl TipoArchivo {
    pub fn desde_content_type(content_type: &str) -> Self {
        if content_type.starts_with("video/") {
            TipoArchivo::Video
        } else {
            TipoArchivo::Imagen
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            TipoArchivo::Imagen => "imagen",
            TipoArchivo::Video => "video",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tipo_archivo_desde_content_type() {
        assert_eq!(
            TipoArchivo::desde_content_type("video/mp4"),
            TipoArchivo::Video
        );
        assert_eq!(
            TipoArchivo::desde_content_type("image/jpeg"),
            TipoArchivo::Imagen
        );
        // Cualquier content type que no sea video cuenta como imagen
        assert_eq!(
            TipoArchivo::desde_content_type("application/octet-stream"),
            TipoArchivo::Imagen
        );
    }

    #[test]
    fn test_tipo_archivo_as_str() {
        assert_eq!(TipoArchivo::Imagen.as_str(), "imagen");
        assert_eq!(TipoArchivo::Video.as_str(), "video");
    }
}
