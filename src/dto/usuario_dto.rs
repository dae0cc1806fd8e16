use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::models::usuario::{Grupo, Usuario};

// Response genérica
#[derive(Debug, Serialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    pub message: Option<String>,
    pub data: Option<T>,
}

impl<T> ApiResponse<T> {
    pub fn success(data: T) -> Self {
        Self {
            success: true,
            message: None,
            data: Some(data),
        }
    }

    pub fn success_with_message(data: T, message: String) -> Self {
        Self {
            success: true,
            message: Some(message),
            data: Some(data),
        }
    }
}

impl ApiResponse<()> {
    pub fn error(message: String) -> Self {
        Self {
            success: false,
            message: Some(message),
            data: None,
        }
    }
}

// Response de los endpoints de activar/desactivar. Los toggles de
// catálogo no llevan mensaje; el de obra sí.
#[derive(Debug, Serialize)]
pub struct ToggleResponse {
    pub success: bool,
    pub estado: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

// Filtro de búsqueda de usuarios (?q= busca en username, email y grupo)
#[derive(Debug, Deserialize)]
pub struct ListaUsuariosQuery {
    pub q: Option<String>,
}

// Request para crear un usuario
#[derive(Debug, Deserialize)]
pub struct CrearUsuarioRequest {
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
    #[serde(default)]
    pub password2: String,
    pub group_id: Option<Uuid>,
}

// Request para editar un usuario. La fecha de creación llega como texto
// y si no se puede interpretar se conserva la guardada.
#[derive(Debug, Deserialize)]
pub struct ActualizarUsuarioRequest {
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub first_name: String,
    #[serde(default)]
    pub last_name: String,
    pub group_id: Option<Uuid>,
    #[serde(default)]
    pub fecha_creacion: String,
}

// Response de usuario (sin hash de contraseña)
#[derive(Debug, Serialize)]
pub struct UsuarioResponse {
    pub id: Uuid,
    pub username: String,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub nombre_completo: String,
    pub is_active: bool,
    pub date_joined: DateTime<Utc>,
    pub grupos: Vec<Grupo>,
}

impl UsuarioResponse {
    pub fn desde_modelo(usuario: Usuario, grupos: Vec<Grupo>) -> Self {
        Self {
            nombre_completo: usuario.nombre_completo(),
            id: usuario.id,
            username: usuario.username,
            email: usuario.email,
            first_name: usuario.first_name,
            last_name: usuario.last_name,
            is_active: usuario.is_active,
            date_joined: usuario.date_joined,
            grupos,
        }
    }
}
