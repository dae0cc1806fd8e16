//! Reglas de negocio de las obras
//!
//! El código de la obra es único sin distinguir mayúsculas y se guarda
//! en mayúsculas. Una obra con registros de libro asociados no puede
//! eliminarse ni desactivarse.

use chrono::NaiveDate;
use sqlx::PgPool;
use uuid::Uuid;
use validator::Validate;

use crate::dto::obra_dto::{GuardarObraRequest, ObraResponse};
use crate::dto::usuario_dto::{ApiResponse, ToggleResponse};
use crate::middleware::identity::AuthenticatedUser;
use crate::models::obra::Obra;
use crate::repositories::catalogo_repository::CatalogoRepository;
use crate::repositories::obra_repository::{ObraFila, ObraRepository};
use crate::services::cambios_service::{obra_sin_cambios, ObraSnapshot, SIN_CAMBIOS};
use crate::utils::errors::{es_violacion_fk, AppError, AppResult};

pub struct ObraController {
    repository: ObraRepository,
    catalogos: CatalogoRepository,
}

/// Campos ya validados de un formulario de obra
struct ObraValidada {
    nombre: String,
    codigo: String,
    descripcion: Option<String>,
    direccion: String,
    ciudad_id: Uuid,
    fecha_inicio: NaiveDate,
    fecha_fin_estimada: NaiveDate,
    estado_obra_id: Uuid,
}

impl ObraController {
    pub fn new(pool: PgPool) -> Self {
        Self {
            repository: ObraRepository::new(pool.clone()),
            catalogos: CatalogoRepository::new(pool),
        }
    }

    pub async fn listar(&self) -> AppResult<Vec<ObraResponse>> {
        let obras = self.repository.listar().await?;
        Ok(obras.into_iter().map(respuesta_desde_fila).collect())
    }

    pub async fn obtener(&self, id: Uuid) -> AppResult<Obra> {
        self.repository
            .buscar_por_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound("Obra no encontrada".to_string()))
    }

    pub async fn crear(
        &self,
        identidad: &AuthenticatedUser,
        request: GuardarObraRequest,
    ) -> AppResult<ApiResponse<Obra>> {
        let datos = self.validar(&request).await?;

        if self.repository.codigo_existe(&datos.codigo, None).await? {
            return Err(AppError::Validation(format!(
                "El código \"{}\" ya existe",
                datos.codigo
            )));
        }

        let obra = self
            .repository
            .crear(
                &datos.nombre,
                &datos.codigo,
                datos.descripcion.as_deref(),
                &datos.direccion,
                datos.ciudad_id,
                datos.fecha_inicio,
                datos.fecha_fin_estimada,
                datos.estado_obra_id,
                identidad.id,
            )
            .await?;

        let mensaje = format!("Obra \"{}\" creada exitosamente.", obra.nombre);
        Ok(ApiResponse::success_with_message(obra, mensaje))
    }

    pub async fn actualizar(
        &self,
        identidad: &AuthenticatedUser,
        id: Uuid,
        request: GuardarObraRequest,
    ) -> AppResult<ApiResponse<Obra>> {
        let obra = self
            .repository
            .buscar_por_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound("Obra no encontrada".to_string()))?;

        let datos = self.validar(&request).await?;

        if self.repository.codigo_existe(&datos.codigo, Some(id)).await? {
            return Err(AppError::Validation(format!(
                "El código \"{}\" ya existe",
                datos.codigo
            )));
        }

        // Guarda de cambios: con el formulario idéntico no se escribe
        // nada, tampoco la fecha de modificación.
        let original = ObraSnapshot {
            nombre: obra.nombre.clone(),
            codigo: obra.codigo.clone(),
            descripcion: obra.descripcion.clone(),
            direccion: obra.direccion.clone(),
            ciudad: obra.ciudad_id,
            fecha_inicio: obra.fecha_inicio,
            fecha_fin_estimada: obra.fecha_fin_estimada,
            estado_obra: obra.estado_obra_id,
        };
        let nuevo = ObraSnapshot {
            nombre: datos.nombre.clone(),
            codigo: datos.codigo.clone(),
            descripcion: datos.descripcion.clone(),
            direccion: datos.direccion.clone(),
            ciudad: datos.ciudad_id,
            fecha_inicio: datos.fecha_inicio,
            fecha_fin_estimada: datos.fecha_fin_estimada,
            estado_obra: datos.estado_obra_id,
        };
        if obra_sin_cambios(&original, &nuevo) {
            return Ok(ApiResponse::success_with_message(
                obra,
                SIN_CAMBIOS.to_string(),
            ));
        }

        let actualizada = self
            .repository
            .actualizar(
                id,
                &datos.nombre,
                &datos.codigo,
                datos.descripcion.as_deref(),
                &datos.direccion,
                datos.ciudad_id,
                datos.fecha_inicio,
                datos.fecha_fin_estimada,
                datos.estado_obra_id,
                identidad.id,
            )
            .await?;

        Ok(ApiResponse::success_with_message(
            actualizada,
            "Ha sido actualizado con éxito.".to_string(),
        ))
    }

    pub async fn eliminar(&self, id: Uuid) -> AppResult<ApiResponse<()>> {
        let obra = self
            .repository
            .buscar_por_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound("Obra no encontrada".to_string()))?;

        let registros = self.repository.contar_registros(id).await?;
        if registros > 0 {
            return Err(AppError::Protected(format!(
                "No se puede eliminar la obra \"{}\" porque tiene {} registro(s) de libro de obras asociado(s).",
                obra.nombre, registros
            )));
        }

        match self.repository.eliminar(id).await {
            Ok(_) => Ok(ApiResponse {
                success: true,
                message: Some(format!("Obra \"{}\" eliminada correctamente.", obra.nombre)),
                data: None,
            }),
            Err(AppError::Database(e)) if es_violacion_fk(&e) => Err(AppError::Protected(format!(
                "No se puede eliminar la obra \"{}\" porque tiene registros relacionados protegidos.",
                obra.nombre
            ))),
            Err(e) => Err(e),
        }
    }

    pub async fn cambiar_estado(&self, id: Uuid) -> AppResult<ToggleResponse> {
        let obra = self
            .repository
            .buscar_por_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound("Obra no encontrada".to_string()))?;

        // Desactivar una obra con registros dejaría su libro inaccesible
        if obra.estado && self.repository.contar_registros(id).await? > 0 {
            return Err(AppError::Validation(
                "No se puede desactivar porque tiene registros de libro de obras asociados."
                    .to_string(),
            ));
        }

        let obra = self
            .repository
            .cambiar_estado(id)
            .await?
            .ok_or_else(|| AppError::NotFound("Obra no encontrada".to_string()))?;
        Ok(ToggleResponse {
            success: true,
            estado: obra.estado,
            message: Some("Ha sido actualizado con éxito.".to_string()),
        })
    }

    /// Validación común de crear y editar: campos requeridos, orden de
    /// fechas y referencias activas. El código queda en mayúsculas.
    async fn validar(&self, request: &GuardarObraRequest) -> AppResult<ObraValidada> {
        request.validate()?;

        let nombre = request.nombre.trim().to_string();
        let codigo = request.codigo.trim().to_uppercase();
        let direccion = request.direccion.trim().to_string();
        if nombre.is_empty() || codigo.is_empty() || direccion.is_empty() {
            return Err(AppError::Validation(
                "Nombre, código y dirección son obligatorios.".to_string(),
            ));
        }

        let ciudad_id = request
            .ciudad
            .ok_or_else(|| AppError::Validation("Debe seleccionar una ciudad.".to_string()))?;
        let ciudad = self
            .catalogos
            .buscar_ciudad(ciudad_id)
            .await?
            .ok_or_else(|| AppError::Validation("La ciudad seleccionada no existe.".to_string()))?;
        if !ciudad.estado {
            return Err(AppError::Validation(
                "Debe seleccionar una ciudad activa.".to_string(),
            ));
        }

        let estado_obra_id = request
            .estado_obra
            .ok_or_else(|| AppError::Validation("Debe seleccionar un estado.".to_string()))?;
        let estado_obra = self
            .catalogos
            .buscar_estado(estado_obra_id)
            .await?
            .ok_or_else(|| AppError::Validation("El estado seleccionado no existe.".to_string()))?;
        if !estado_obra.estado {
            return Err(AppError::Validation(
                "Debe seleccionar un estado activo.".to_string(),
            ));
        }

        let fecha_inicio = request
            .fecha_inicio
            .ok_or_else(|| AppError::Validation("La fecha de inicio es obligatoria.".to_string()))?;
        let fecha_fin_estimada = request.fecha_fin_estimada.ok_or_else(|| {
            AppError::Validation("La fecha de fin estimada es obligatoria.".to_string())
        })?;
        if fecha_fin_estimada <= fecha_inicio {
            return Err(AppError::Validation(
                "La fecha de fin debe ser posterior a la fecha de inicio.".to_string(),
            ));
        }

        let descripcion = request.descripcion.trim();
        let descripcion = if descripcion.is_empty() {
            None
        } else {
            Some(descripcion.to_string())
        };

        Ok(ObraValidada {
            nombre,
            codigo,
            descripcion,
            direccion,
            ciudad_id,
            fecha_inicio,
            fecha_fin_estimada,
            estado_obra_id,
        })
    }
}

fn respuesta_desde_fila(fila: ObraFila) -> ObraResponse {
    ObraResponse {
        id: fila.id,
        nombre: fila.nombre,
        codigo: fila.codigo,
        descripcion: fila.descripcion,
        direccion: fila.direccion,
        ciudad_id: fila.ciudad_id,
        ciudad_nombre: fila.ciudad_nombre,
        pais_nombre: fila.pais_nombre,
        fecha_inicio: fila.fecha_inicio,
        fecha_fin_estimada: fila.fecha_fin_estimada,
        estado_obra_id: fila.estado_obra_id,
        estado_obra_nombre: fila.estado_obra_nombre,
        estado: fila.estado,
        creado_por_nombre: fila.creado_por_nombre,
        fecha_creacion: fila.fecha_creacion,
        fecha_modificacion: fila.fecha_modificacion,
    }
}
