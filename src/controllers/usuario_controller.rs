//! Reglas de negocio de la administración de usuarios

use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use crate::dto::usuario_dto::{
    ActualizarUsuarioRequest, ApiResponse, CrearUsuarioRequest, ToggleResponse, UsuarioResponse,
};
use crate::models::usuario::Grupo;
use crate::repositories::usuario_repository::UsuarioRepository;
use crate::services::cambios_service::SIN_CAMBIOS;
use crate::utils::errors::{es_violacion_fk, AppError, AppResult};

const LARGO_MINIMO_PASSWORD: usize = 8;

pub struct UsuarioController {
    repository: UsuarioRepository,
}

impl UsuarioController {
    pub fn new(pool: PgPool) -> Self {
        Self {
            repository: UsuarioRepository::new(pool),
        }
    }

    pub async fn listar(&self, q: Option<&str>) -> AppResult<Vec<UsuarioResponse>> {
        let usuarios = self.repository.listar(q).await?;
        let mut respuesta = Vec::with_capacity(usuarios.len());
        for usuario in usuarios {
            let grupos = self.repository.grupos_de(usuario.id).await?;
            respuesta.push(UsuarioResponse::desde_modelo(usuario, grupos));
        }
        Ok(respuesta)
    }

    pub async fn obtener(&self, id: Uuid) -> AppResult<UsuarioResponse> {
        let usuario = self
            .repository
            .buscar_por_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound("Usuario no encontrado".to_string()))?;
        let grupos = self.repository.grupos_de(id).await?;
        Ok(UsuarioResponse::desde_modelo(usuario, grupos))
    }

    pub async fn crear(
        &self,
        request: CrearUsuarioRequest,
    ) -> AppResult<ApiResponse<UsuarioResponse>> {
        let username = request.username.trim();
        let email = request.email.trim();

        if username.is_empty()
            || email.is_empty()
            || request.password.is_empty()
            || request.password2.is_empty()
            || request.group_id.is_none()
        {
            return Err(AppError::Validation(
                "Todos los campos son obligatorios.".to_string(),
            ));
        }
        if request.password != request.password2 {
            return Err(AppError::Validation(
                "Las contraseñas no coinciden.".to_string(),
            ));
        }
        if self.repository.username_existe(username, None).await? {
            return Err(AppError::Validation(
                "Ya existe un usuario con ese nombre.".to_string(),
            ));
        }
        if self.repository.email_existe(email, None).await? {
            return Err(AppError::Validation(
                "Ya existe un usuario con ese correo.".to_string(),
            ));
        }
        if request.password.chars().count() < LARGO_MINIMO_PASSWORD {
            return Err(AppError::Validation(
                "La contraseña debe tener al menos 8 caracteres.".to_string(),
            ));
        }

        let grupo_id = request.group_id.unwrap_or_default();
        let grupo = self
            .repository
            .buscar_grupo(grupo_id)
            .await?
            .ok_or_else(|| AppError::Validation("El rol seleccionado no existe.".to_string()))?;

        let password_hash = bcrypt::hash(&request.password, bcrypt::DEFAULT_COST)
            .map_err(|e| AppError::Internal(format!("Error al cifrar la contraseña: {}", e)))?;

        let usuario = self
            .repository
            .crear(username, email, &password_hash, grupo.id)
            .await?;
        let grupos = self.repository.grupos_de(usuario.id).await?;

        Ok(ApiResponse::success_with_message(
            UsuarioResponse::desde_modelo(usuario, grupos),
            "Usuario creado correctamente.".to_string(),
        ))
    }

    pub async fn actualizar(
        &self,
        id: Uuid,
        request: ActualizarUsuarioRequest,
    ) -> AppResult<ApiResponse<UsuarioResponse>> {
        let usuario = self
            .repository
            .buscar_por_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound("Usuario no encontrado".to_string()))?;
        let grupos_actuales = self.repository.grupos_de(id).await?;

        let username = request.username.trim();
        let email = request.email.trim();
        let first_name = request.first_name.trim();
        let last_name = request.last_name.trim();

        if username.is_empty() || email.is_empty() || request.group_id.is_none() {
            return Err(AppError::Validation(
                "Usuario, correo y rol son obligatorios.".to_string(),
            ));
        }
        if self.repository.username_existe(username, Some(id)).await? {
            return Err(AppError::Validation(
                "Ya existe otro usuario con ese nombre.".to_string(),
            ));
        }
        if self.repository.email_existe(email, Some(id)).await? {
            return Err(AppError::Validation(
                "Ya existe otro usuario con ese correo.".to_string(),
            ));
        }

        let grupo_id = request.group_id.unwrap_or_default();
        let grupo = self
            .repository
            .buscar_grupo(grupo_id)
            .await?
            .ok_or_else(|| AppError::Validation("El rol seleccionado no existe.".to_string()))?;

        // Una fecha no interpretable conserva la guardada, con aviso.
        let fecha_texto = request.fecha_creacion.trim();
        let (date_joined, aviso_fecha) = if fecha_texto.is_empty() {
            (usuario.date_joined, false)
        } else {
            match interpretar_fecha_creacion(fecha_texto) {
                Some(fecha) => (fecha, false),
                None => (usuario.date_joined, true),
            }
        };

        let ids_actuales: Vec<Uuid> = grupos_actuales.iter().map(|g: &Grupo| g.id).collect();
        let sin_cambios = username == usuario.username
            && email == usuario.email
            && first_name == usuario.first_name
            && last_name == usuario.last_name
            && ids_actuales == [grupo.id]
            && date_joined == usuario.date_joined;

        if sin_cambios {
            return Ok(ApiResponse::success_with_message(
                UsuarioResponse::desde_modelo(usuario, grupos_actuales),
                SIN_CAMBIOS.to_string(),
            ));
        }

        let actualizado = self
            .repository
            .actualizar(id, username, email, first_name, last_name, date_joined, grupo.id)
            .await?;
        let grupos = self.repository.grupos_de(id).await?;

        let mensaje = if aviso_fecha {
            "Fecha de creación inválida, se mantiene la anterior.".to_string()
        } else {
            "Ha sido actualizado con éxito.".to_string()
        };
        Ok(ApiResponse::success_with_message(
            UsuarioResponse::desde_modelo(actualizado, grupos),
            mensaje,
        ))
    }

    pub async fn cambiar_estado(&self, id: Uuid) -> AppResult<ToggleResponse> {
        let usuario = self
            .repository
            .cambiar_estado(id)
            .await?
            .ok_or_else(|| AppError::NotFound("Usuario no encontrado".to_string()))?;
        Ok(ToggleResponse {
            success: true,
            estado: usuario.is_active,
            message: None,
        })
    }

    pub async fn eliminar(&self, id: Uuid) -> AppResult<ApiResponse<()>> {
        match self.repository.eliminar(id).await {
            Ok(0) => Err(AppError::NotFound("Usuario no encontrado".to_string())),
            Ok(_) => Ok(ApiResponse {
                success: true,
                message: Some("Usuario eliminado correctamente.".to_string()),
                data: None,
            }),
            Err(AppError::Database(e)) if es_violacion_fk(&e) => Err(AppError::Protected(
                "No se puede eliminar el usuario porque tiene registros relacionados.".to_string(),
            )),
            Err(e) => Err(e),
        }
    }

    pub async fn listar_grupos(&self) -> AppResult<Vec<Grupo>> {
        self.repository.listar_grupos().await
    }
}

/// La fecha de creación llega como YYYY-MM-DD y se guarda a medianoche UTC.
fn interpretar_fecha_creacion(texto: &str) -> Option<DateTime<Utc>> {
    let fecha = NaiveDate::parse_from_str(texto, "%Y-%m-%d").ok()?;
    let medianoche = NaiveTime::from_hms_opt(0, 0, 0)?;
    Some(DateTime::from_naive_utc_and_offset(
        fecha.and_time(medianoche),
        Utc,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_interpretar_fecha_creacion() {
        let fecha = interpretar_fecha_creacion("2024-03-01").unwrap();
        assert_eq!(fecha.to_rfc3339(), "2024-03-01T00:00:00+00:00");
        assert!(interpretar_fecha_creacion("01-03-2024").is_none());
        assert!(interpretar_fecha_creacion("hoy").is_none());
    }
}
