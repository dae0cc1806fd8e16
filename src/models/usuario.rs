//! Modelos de identidad
//!
//! Usuarios del sistema y sus grupos (roles). Mapean exactamente a las
//! tablas `usuarios`, `grupos` y la tabla puente `usuario_grupos`.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// Usuario - mapea exactamente a la tabla usuarios
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Usuario {
    pub id: Uuid,
    pub username: String,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub is_active: bool,
    pub date_joined: DateTime<Utc>,
}

impl Usuario {
    /// Nombre para mostrar: nombre y apellido, o el username si faltan
    pub fn nombre_completo(&self) -> String {
        let nombre = format!("{} {}", self.first_name, self.last_name);
        let nombre = nombre.trim();
        if nombre.is_empty() {
            self.username.clone()
        } else {
            nombre.to_string()
        }
    }
}

/// Grupo (rol) - mapea exactamente a la tabla grupos
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Grupo {
    pub id: Uuid,
    pub nombre: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn usuario_base() -> Usuario {
        Usuario {
            id: Uuid::new_v4(),
            username: "jperez".to_string(),
            email: "jperez@example.com".to_string(),
            first_name: "Juan".to_string(),
            last_name: "Pérez".to_string(),
            password_hash: String::new(),
            is_active: true,
            date_joined: Utc::now(),
        }
    }

    #[test]
    fn test_nombre_completo() {
        let usuario = usuario_base();
        assert_eq!(usuario.nombre_completo(), "Juan Pérez");
    }

    #[test]
    fn test_nombre_completo_sin_nombres_usa_username() {
        let mut usuario = usuario_base();
        usuario.first_name = String::new();
        usuario.last_name = String::new();
        assert_eq!(usuario.nombre_completo(), "jperez");
    }
}
