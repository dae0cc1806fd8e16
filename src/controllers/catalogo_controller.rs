//! Reglas de negocio de los catálogos geográficos y de estados de obra
//!
//! Países, ciudades y estados comparten el mismo ciclo: se crean
//! inactivos, el nombre se guarda capitalizado y la edición pasa por la
//! guarda de "sin cambios" antes de escribir.

use chrono::{NaiveDate, Utc};
use sqlx::PgPool;
use uuid::Uuid;
use validator::Validate;

use crate::dto::catalogo_dto::{
    CiudadResponse, GuardarCiudadRequest, GuardarEstadoObraRequest, GuardarPaisRequest,
};
use crate::dto::usuario_dto::{ApiResponse, ToggleResponse};
use crate::middleware::identity::AuthenticatedUser;
use crate::models::catalogo::{EstadoObra, Pais};
use crate::repositories::catalogo_repository::{CatalogoRepository, CiudadFila};
use crate::services::cambios_service::SIN_CAMBIOS;
use crate::utils::errors::{es_violacion_fk, es_violacion_unicidad, AppError, AppResult};
use crate::utils::validation::{parse_fecha_flexible, title_case};

pub struct CatalogoController {
    repository: CatalogoRepository,
}

impl CatalogoController {
    pub fn new(pool: PgPool) -> Self {
        Self {
            repository: CatalogoRepository::new(pool),
        }
    }

    // ---- Países ----

    pub async fn listar_paises(&self) -> AppResult<Vec<Pais>> {
        self.repository.listar_paises().await
    }

    pub async fn crear_pais(
        &self,
        identidad: &AuthenticatedUser,
        request: GuardarPaisRequest,
    ) -> AppResult<ApiResponse<Pais>> {
        request.validate()?;
        let nombre = title_case(request.nombre.trim());
        let fecha = fecha_o_hoy(&request.fecha_creacion);

        match self.repository.crear_pais(&nombre, fecha, identidad.id).await {
            Ok(pais) => Ok(ApiResponse::success_with_message(
                pais,
                "País creado exitosamente.".to_string(),
            )),
            Err(AppError::Database(e)) if es_violacion_unicidad(&e) => Err(AppError::Conflict(
                "Ya existe un país con ese nombre.".to_string(),
            )),
            Err(e) => Err(e),
        }
    }

    pub async fn actualizar_pais(
        &self,
        identidad: &AuthenticatedUser,
        id: Uuid,
        request: GuardarPaisRequest,
    ) -> AppResult<ApiResponse<Pais>> {
        request.validate()?;
        let pais = self
            .repository
            .buscar_pais(id)
            .await?
            .ok_or_else(|| AppError::NotFound("País no encontrado".to_string()))?;

        let nombre = title_case(request.nombre.trim());
        let fecha = parse_fecha_flexible(&request.fecha_creacion).unwrap_or(pais.fecha_creacion);

        if nombre == pais.nombre && fecha == pais.fecha_creacion {
            return Ok(ApiResponse::success_with_message(
                pais,
                SIN_CAMBIOS.to_string(),
            ));
        }

        match self
            .repository
            .actualizar_pais(id, &nombre, fecha, identidad.id)
            .await
        {
            Ok(pais) => Ok(ApiResponse::success_with_message(
                pais,
                "País actualizado exitosamente.".to_string(),
            )),
            Err(AppError::Database(e)) if es_violacion_unicidad(&e) => Err(AppError::Conflict(
                "Ya existe un país con ese nombre.".to_string(),
            )),
            Err(e) => Err(e),
        }
    }

    pub async fn eliminar_pais(&self, id: Uuid) -> AppResult<ApiResponse<()>> {
        match self.repository.eliminar_pais(id).await {
            Ok(0) => Err(AppError::NotFound("País no encontrado".to_string())),
            Ok(_) => Ok(ApiResponse {
                success: true,
                message: Some("País eliminado exitosamente.".to_string()),
                data: None,
            }),
            Err(AppError::Database(e)) if es_violacion_fk(&e) => Err(AppError::Protected(
                "No se puede eliminar el país porque tiene registros relacionados.".to_string(),
            )),
            Err(e) => Err(e),
        }
    }

    pub async fn cambiar_estado_pais(&self, id: Uuid) -> AppResult<ToggleResponse> {
        let pais = self
            .repository
            .cambiar_estado_pais(id)
            .await?
            .ok_or_else(|| AppError::NotFound("País no encontrado".to_string()))?;
        Ok(ToggleResponse {
            success: true,
            estado: pais.estado,
            message: None,
        })
    }

    // ---- Ciudades ----

    pub async fn listar_ciudades(&self) -> AppResult<Vec<CiudadResponse>> {
        let ciudades = self.repository.listar_ciudades().await?;
        Ok(ciudades.into_iter().map(respuesta_ciudad).collect())
    }

    pub async fn crear_ciudad(
        &self,
        identidad: &AuthenticatedUser,
        request: GuardarCiudadRequest,
    ) -> AppResult<ApiResponse<CiudadResponse>> {
        request.validate()?;
        let pais_id = request
            .pais
            .ok_or_else(|| AppError::Validation("Debe seleccionar un país.".to_string()))?;
        let pais = self
            .repository
            .buscar_pais(pais_id)
            .await?
            .ok_or_else(|| AppError::Validation("El país seleccionado no existe.".to_string()))?;
        if !pais.estado {
            return Err(AppError::Validation(
                "Debe seleccionar un país activo.".to_string(),
            ));
        }

        let nombre = title_case(request.nombre.trim());
        if self
            .repository
            .ciudad_existe_en_pais(&nombre, pais_id, None)
            .await?
        {
            return Err(AppError::Validation(
                "La Ciudad ya existe para este País.".to_string(),
            ));
        }

        let fecha = fecha_o_hoy(&request.fecha_creacion);
        let ciudad = self
            .repository
            .crear_ciudad(&nombre, pais_id, fecha, identidad.id)
            .await?;
        Ok(ApiResponse::success_with_message(
            CiudadResponse {
                id: ciudad.id,
                nombre: ciudad.nombre,
                pais_id: pais.id,
                pais_nombre: pais.nombre,
                estado: ciudad.estado,
                fecha_creacion: ciudad.fecha_creacion,
                fecha_modificacion: ciudad.fecha_modificacion,
            },
            "Ciudad creada exitosamente.".to_string(),
        ))
    }

    pub async fn actualizar_ciudad(
        &self,
        identidad: &AuthenticatedUser,
        id: Uuid,
        request: GuardarCiudadRequest,
    ) -> AppResult<ApiResponse<CiudadResponse>> {
        request.validate()?;
        let ciudad = self
            .repository
            .buscar_ciudad(id)
            .await?
            .ok_or_else(|| AppError::NotFound("Ciudad no encontrada".to_string()))?;

        let pais_id = request.pais.unwrap_or(ciudad.pais_id);
        let pais = self
            .repository
            .buscar_pais(pais_id)
            .await?
            .ok_or_else(|| AppError::Validation("El país seleccionado no existe.".to_string()))?;

        let nombre = title_case(request.nombre.trim());
        if self
            .repository
            .ciudad_existe_en_pais(&nombre, pais_id, Some(id))
            .await?
        {
            return Err(AppError::Validation(
                "La Ciudad ya existe para este País.".to_string(),
            ));
        }

        let fecha = parse_fecha_flexible(&request.fecha_creacion).unwrap_or(ciudad.fecha_creacion);

        if nombre == ciudad.nombre && pais_id == ciudad.pais_id && fecha == ciudad.fecha_creacion {
            return Ok(ApiResponse::success_with_message(
                CiudadResponse {
                    id: ciudad.id,
                    nombre: ciudad.nombre,
                    pais_id: pais.id,
                    pais_nombre: pais.nombre,
                    estado: ciudad.estado,
                    fecha_creacion: ciudad.fecha_creacion,
                    fecha_modificacion: ciudad.fecha_modificacion,
                },
                SIN_CAMBIOS.to_string(),
            ));
        }

        let actualizada = self
            .repository
            .actualizar_ciudad(id, &nombre, pais_id, fecha, identidad.id)
            .await?;
        Ok(ApiResponse::success_with_message(
            CiudadResponse {
                id: actualizada.id,
                nombre: actualizada.nombre,
                pais_id: pais.id,
                pais_nombre: pais.nombre,
                estado: actualizada.estado,
                fecha_creacion: actualizada.fecha_creacion,
                fecha_modificacion: actualizada.fecha_modificacion,
            },
            "Ciudad actualizada exitosamente.".to_string(),
        ))
    }

    pub async fn eliminar_ciudad(&self, id: Uuid) -> AppResult<ApiResponse<()>> {
        match self.repository.eliminar_ciudad(id).await {
            Ok(0) => Err(AppError::NotFound("Ciudad no encontrada".to_string())),
            Ok(_) => Ok(ApiResponse {
                success: true,
                message: Some("Ciudad eliminada exitosamente.".to_string()),
                data: None,
            }),
            Err(AppError::Database(e)) if es_violacion_fk(&e) => Err(AppError::Protected(
                "No se puede eliminar la ciudad porque tiene registros relacionados.".to_string(),
            )),
            Err(e) => Err(e),
        }
    }

    pub async fn cambiar_estado_ciudad(&self, id: Uuid) -> AppResult<ToggleResponse> {
        let ciudad = self
            .repository
            .cambiar_estado_ciudad(id)
            .await?
            .ok_or_else(|| AppError::NotFound("Ciudad no encontrada".to_string()))?;
        Ok(ToggleResponse {
            success: true,
            estado: ciudad.estado,
            message: None,
        })
    }

    // ---- Estados de obra ----

    pub async fn listar_estados(&self) -> AppResult<Vec<EstadoObra>> {
        self.repository.listar_estados().await
    }

    pub async fn crear_estado(
        &self,
        identidad: &AuthenticatedUser,
        request: GuardarEstadoObraRequest,
    ) -> AppResult<ApiResponse<EstadoObra>> {
        request.validate()?;
        let nombre = title_case(request.nombre.trim());
        let fecha = fecha_o_hoy(&request.fecha_creacion);

        match self.repository.crear_estado(&nombre, fecha, identidad.id).await {
            Ok(estado) => Ok(ApiResponse::success_with_message(
                estado,
                "Estado creado exitosamente.".to_string(),
            )),
            Err(AppError::Database(e)) if es_violacion_unicidad(&e) => Err(AppError::Conflict(
                "Ya existe un estado con ese nombre.".to_string(),
            )),
            Err(e) => Err(e),
        }
    }

    pub async fn actualizar_estado(
        &self,
        identidad: &AuthenticatedUser,
        id: Uuid,
        request: GuardarEstadoObraRequest,
    ) -> AppResult<ApiResponse<EstadoObra>> {
        request.validate()?;
        let estado = self
            .repository
            .buscar_estado(id)
            .await?
            .ok_or_else(|| AppError::NotFound("Estado no encontrado".to_string()))?;

        let nombre = title_case(request.nombre.trim());
        let fecha = parse_fecha_flexible(&request.fecha_creacion).unwrap_or(estado.fecha_creacion);

        if nombre == estado.nombre && fecha == estado.fecha_creacion {
            return Ok(ApiResponse::success_with_message(
                estado,
                SIN_CAMBIOS.to_string(),
            ));
        }

        match self
            .repository
            .actualizar_estado(id, &nombre, fecha, identidad.id)
            .await
        {
            Ok(estado) => Ok(ApiResponse::success_with_message(
                estado,
                "Estado actualizado exitosamente.".to_string(),
            )),
            Err(AppError::Database(e)) if es_violacion_unicidad(&e) => Err(AppError::Conflict(
                "Ya existe un estado con ese nombre.".to_string(),
            )),
            Err(e) => Err(e),
        }
    }

    pub async fn eliminar_estado(&self, id: Uuid) -> AppResult<ApiResponse<()>> {
        match self.repository.eliminar_estado(id).await {
            Ok(0) => Err(AppError::NotFound("Estado no encontrado".to_string())),
            Ok(_) => Ok(ApiResponse {
                success: true,
                message: Some("Estado eliminado exitosamente.".to_string()),
                data: None,
            }),
            Err(AppError::Database(e)) if es_violacion_fk(&e) => Err(AppError::Protected(
                "No se puede eliminar el estado porque está en uso.".to_string(),
            )),
            Err(e) => Err(e),
        }
    }

    pub async fn cambiar_estado_estado(&self, id: Uuid) -> AppResult<ToggleResponse> {
        let estado = self
            .repository
            .cambiar_estado_estado(id)
            .await?
            .ok_or_else(|| AppError::NotFound("Estado no encontrado".to_string()))?;
        Ok(ToggleResponse {
            success: true,
            estado: estado.estado,
            message: None,
        })
    }
}

fn fecha_o_hoy(texto: &str) -> NaiveDate {
    parse_fecha_flexible(texto).unwrap_or_else(|| Utc::now().date_naive())
}

fn respuesta_ciudad(fila: CiudadFila) -> CiudadResponse {
    CiudadResponse {
        id: fila.id,
        nombre: fila.nombre,
        pais_id: fila.pais_id,
        pais_nombre: fila.pais_nombre,
        estado: fila.estado,
        fecha_creacion: fila.fecha_creacion,
        fecha_modificacion: fila.fecha_modificacion,
    }
}
