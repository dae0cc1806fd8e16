//! Sistema de manejo de errores
//!
//! Este módulo define todos los tipos de errores del sistema
//! y su conversión a respuestas HTTP apropiadas.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use thiserror::Error;

/// Errores principales de la aplicación
#[derive(Error, Debug)]
pub enum AppError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    /// Eliminación bloqueada por registros relacionados (FK protegida)
    #[error("Protected: {0}")]
    Protected(String),

    #[error("Internal server error: {0}")]
    Internal(String),
}

/// Respuesta de error para la API: la misma forma `{success, message}`
/// que consumen los llamadores AJAX, más un código estable para máquinas.
#[derive(Debug, serde::Serialize)]
struct ErrorResponse {
    success: bool,
    message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    code: Option<String>,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error_response) = match self {
            AppError::Database(e) => {
                tracing::error!("Error de base de datos: {}", e);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    ErrorResponse {
                        success: false,
                        message: "Ocurrió un error inesperado. Intente nuevamente.".to_string(),
                        code: Some("DB_ERROR".to_string()),
                    },
                )
            }

            AppError::Validation(msg) => (
                StatusCode::BAD_REQUEST,
                ErrorResponse {
                    success: false,
                    message: msg,
                    code: Some("VALIDATION_ERROR".to_string()),
                },
            ),

            AppError::Unauthorized(msg) => (
                StatusCode::UNAUTHORIZED,
                ErrorResponse {
                    success: false,
                    message: msg,
                    code: Some("UNAUTHORIZED".to_string()),
                },
            ),

            AppError::NotFound(msg) => (
                StatusCode::NOT_FOUND,
                ErrorResponse {
                    success: false,
                    message: msg,
                    code: Some("NOT_FOUND".to_string()),
                },
            ),

            AppError::Conflict(msg) => (
                StatusCode::CONFLICT,
                ErrorResponse {
                    success: false,
                    message: msg,
                    code: Some("CONFLICT".to_string()),
                },
            ),

            // Los bloqueos por FK protegida responden 400, el contrato
            // que ya esperaban los llamadores AJAX de la aplicación.
            AppError::Protected(msg) => (
                StatusCode::BAD_REQUEST,
                ErrorResponse {
                    success: false,
                    message: msg,
                    code: Some("PROTECTED".to_string()),
                },
            ),

            AppError::Internal(msg) => {
                tracing::error!("Error interno: {}", msg);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    ErrorResponse {
                        success: false,
                        message: "Ocurrió un error inesperado. Intente nuevamente.".to_string(),
                        code: Some("INTERNAL_ERROR".to_string()),
                    },
                )
            }
        };

        (status, Json(error_response)).into_response()
    }
}

impl From<validator::ValidationErrors> for AppError {
    fn from(errors: validator::ValidationErrors) -> Self {
        let mensaje = errors
            .field_errors()
            .values()
            .flat_map(|errs| errs.iter())
            .filter_map(|e| e.message.as_ref().map(|m| m.to_string()))
            .next()
            .unwrap_or_else(|| "Revisa los errores del formulario.".to_string());
        AppError::Validation(mensaje)
    }
}

/// Resultado tipado para operaciones que pueden fallar
pub type AppResult<T> = Result<T, AppError>;

/// Detecta una violación de clave foránea (borrado bloqueado por
/// registros relacionados, código Postgres 23503).
pub fn es_violacion_fk(error: &sqlx::Error) -> bool {
    match error.as_database_error() {
        Some(db_err) => db_err.code().as_deref() == Some("23503"),
        None => false,
    }
}

/// Detecta una violación de unicidad (código Postgres 23505).
pub fn es_violacion_unicidad(error: &sqlx::Error) -> bool {
    match error.as_database_error() {
        Some(db_err) => db_err.code().as_deref() == Some("23505"),
        None => false,
    }
}

/// Función helper para crear errores de validación
pub fn validation_error(message: &str) -> AppError {
    AppError::Validation(message.to_string())
}

/// Función helper para crear errores de recurso no encontrado
pub fn not_found_error(resource: &str) -> AppError {
    AppError::NotFound(format!("{} no encontrado", resource))
}

/// Función helper para crear errores internos
pub fn internal_error(message: &str) -> AppError {
    AppError::Internal(message.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validation_error_helper() {
        let error = validation_error("El nombre es requerido");
        match error {
            AppError::Validation(msg) => assert_eq!(msg, "El nombre es requerido"),
            _ => panic!("se esperaba AppError::Validation"),
        }
    }

    #[test]
    fn test_not_found_error_helper() {
        let error = not_found_error("Usuario");
        match error {
            AppError::NotFound(msg) => assert_eq!(msg, "Usuario no encontrado"),
            _ => panic!("se esperaba AppError::NotFound"),
        }
    }

    #[test]
    fn test_es_violacion_fk_con_error_no_db() {
        let error = sqlx::Error::RowNotFound;
        assert!(!es_violacion_fk(&error));
        assert!(!es_violacion_unicidad(&error));
    }

    #[test]
    fn test_from_validation_errors_usa_primer_mensaje() {
        let mut errors = validator::ValidationErrors::new();
        let mut field_error = validator::ValidationError::new("length");
        field_error.message = Some("El nombre debe tener al menos 2 caracteres.".into());
        errors.add("nombre", field_error);

        match AppError::from(errors) {
            AppError::Validation(msg) => {
                assert_eq!(msg, "El nombre debe tener al menos 2 caracteres.")
            }
            _ => panic!("se esperaba AppError::Validation"),
        }
    }
}
