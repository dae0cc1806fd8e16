//! Reglas de negocio del libro de obras
//!
//! El registro diario concentra las reglas no triviales del sistema:
//! normalización y topes de horas por trabajador, guarda de "sin
//! cambios" y reemplazo completo de tareas y trabajadores en cada
//! edición. Todas las escrituras multi-fila van en una transacción.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use sqlx::PgPool;
use uuid::Uuid;

use crate::dto::registro_dto::{
    media_url, ArchivoNuevo, FotoData, FotografiaResponse, GuardarRegistroRequest,
    RegistroResponse, TareaResponse, TrabajadorHorasResponse,
};
use crate::dto::usuario_dto::ApiResponse;
use crate::middleware::identity::AuthenticatedUser;
use crate::models::registro::TipoArchivo;
use crate::repositories::obra_repository::ObraRepository;
use crate::repositories::registro_repository::{
    ArchivoGuardar, RegistroFila, RegistroRepository,
};
use crate::repositories::usuario_repository::UsuarioRepository;
use crate::services::cambios_service::{registro_sin_cambios, RegistroSnapshot, SIN_CAMBIOS};
use crate::services::horas_service::validar_trabajadores;
use crate::utils::errors::{AppError, AppResult};

pub const MAX_ARCHIVOS_POR_REGISTRO: usize = 20;
const EXTENSIONES_PERMITIDAS: [&str; 9] = [
    ".jpg", ".jpeg", ".png", ".gif", ".mp4", ".mov", ".avi", ".mkv", ".webp",
];

pub struct RegistroController {
    repository: RegistroRepository,
    obras: ObraRepository,
    usuarios: UsuarioRepository,
}

impl RegistroController {
    pub fn new(pool: PgPool) -> Self {
        Self {
            repository: RegistroRepository::new(pool.clone()),
            obras: ObraRepository::new(pool.clone()),
            usuarios: UsuarioRepository::new(pool),
        }
    }

    pub async fn listar(&self) -> AppResult<Vec<RegistroResponse>> {
        let filas = self.repository.listar().await?;
        let mut respuesta = Vec::with_capacity(filas.len());
        for fila in filas {
            respuesta.push(self.armar_respuesta(fila).await?);
        }
        Ok(respuesta)
    }

    pub async fn obtener(&self, id: Uuid) -> AppResult<RegistroResponse> {
        let fila = self
            .repository
            .buscar_fila(id)
            .await?
            .ok_or_else(|| AppError::NotFound("Registro no encontrado".to_string()))?;
        self.armar_respuesta(fila).await
    }

    /// Crea un registro. El supervisor es quien lo crea.
    pub async fn crear(
        &self,
        identidad: &AuthenticatedUser,
        request: GuardarRegistroRequest,
    ) -> AppResult<ApiResponse<RegistroResponse>> {
        let obra_id = self.obra_activa(request.obra).await?;
        let fecha = NaiveDate::parse_from_str(request.fecha.trim(), "%Y-%m-%d")
            .map_err(|_| AppError::Validation("La fecha no es válida.".to_string()))?;

        let tareas = tareas_limpias(&request.tarea);
        let filas = validar_trabajadores(
            &request.trabajador,
            &request.horas,
            &request.horas_extra,
            &identidad.id.to_string(),
        )?;
        let trabajadores = self.resolver_trabajadores(&filas).await?;

        let archivos = archivos_validos(&request.archivos)?;
        if archivos.len() > MAX_ARCHIVOS_POR_REGISTRO {
            return Err(AppError::Validation(
                "Un registro no puede tener más de 20 archivos.".to_string(),
            ));
        }
        let fotografia = ruta_fotografia(request.fotografia.as_ref())?;

        let registro = self
            .repository
            .crear(
                obra_id,
                fecha,
                identidad.id,
                request.observaciones.trim(),
                fotografia.as_deref(),
                &tareas,
                &trabajadores,
                &archivos,
            )
            .await?;

        let respuesta = self.obtener(registro.id).await?;
        Ok(ApiResponse::success_with_message(
            respuesta,
            "Registro guardado exitosamente".to_string(),
        ))
    }

    /// Edita un registro. Si el formulario no cambia nada, no se
    /// escribe nada y se informa "sin cambios".
    pub async fn actualizar(
        &self,
        id: Uuid,
        request: GuardarRegistroRequest,
    ) -> AppResult<ApiResponse<RegistroResponse>> {
        let registro = self
            .repository
            .buscar_por_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound("Registro no encontrado".to_string()))?;
        let tareas_guardadas = self.repository.tareas_de(id).await?;
        let trabajadores_guardados = self.trabajadores_modelo(id).await?;

        let obra_id = self.obra_activa(request.obra.or(Some(registro.obra_id))).await?;
        // Una fecha ilegible conserva la guardada
        let fecha = NaiveDate::parse_from_str(request.fecha.trim(), "%Y-%m-%d")
            .unwrap_or(registro.fecha);

        let tareas = tareas_limpias(&request.tarea);
        // La exclusión de supervisor compara contra el supervisor
        // guardado del registro, que es inmutable.
        let filas = validar_trabajadores(
            &request.trabajador,
            &request.horas,
            &request.horas_extra,
            &registro.supervisor_id.to_string(),
        )?;
        let trabajadores = self.resolver_trabajadores(&filas).await?;

        let eliminar = ids_eliminar(&request.deleted_ids);
        let archivos_nuevos = archivos_validos(&request.archivos)?;
        let nueva_fotografia = ruta_fotografia(request.fotografia.as_ref())?;

        let original = RegistroSnapshot::desde_guardado(
            &registro,
            &tareas_guardadas,
            &trabajadores_guardados,
        );
        let nuevo = RegistroSnapshot::desde_propuesta(
            obra_id,
            fecha,
            request.observaciones.trim(),
            &tareas,
            &filas,
        );
        if registro_sin_cambios(
            &original,
            &nuevo,
            !archivos_nuevos.is_empty(),
            nueva_fotografia.is_some(),
            !eliminar.is_empty(),
        ) {
            let respuesta = self.obtener(id).await?;
            return Ok(ApiResponse::success_with_message(
                respuesta,
                SIN_CAMBIOS.to_string(),
            ));
        }

        let existentes = self.repository.contar_fotografias(id).await? as usize;
        // Solo descuentan las eliminaciones que apuntan a adjuntos de
        // este registro; los ids ajenos se ignoran en el borrado y no
        // pueden abrir espacio en el tope.
        let eliminables = self.repository.contar_fotografias_en(id, &eliminar).await? as usize;
        if existentes.saturating_sub(eliminables) + archivos_nuevos.len()
            > MAX_ARCHIVOS_POR_REGISTRO
        {
            return Err(AppError::Validation(
                "Un registro no puede tener más de 20 archivos.".to_string(),
            ));
        }

        self.repository
            .actualizar(
                id,
                obra_id,
                fecha,
                request.observaciones.trim(),
                nueva_fotografia.as_deref(),
                &eliminar,
                &archivos_nuevos,
                &tareas,
                &trabajadores,
            )
            .await?;

        let respuesta = self.obtener(id).await?;
        Ok(ApiResponse::success_with_message(
            respuesta,
            "Registro actualizado correctamente.".to_string(),
        ))
    }

    pub async fn eliminar(&self, id: Uuid) -> AppResult<ApiResponse<()>> {
        match self.repository.eliminar(id).await? {
            0 => Err(AppError::NotFound("Registro no encontrado".to_string())),
            _ => Ok(ApiResponse {
                success: true,
                message: Some("Registro eliminado exitosamente.".to_string()),
                data: None,
            }),
        }
    }

    /// Borra un adjunto individual; responde con el registro dueño para
    /// que la pantalla de edición pueda recargarse.
    pub async fn eliminar_fotografia(&self, id: Uuid) -> AppResult<ApiResponse<Uuid>> {
        let registro_id = self
            .repository
            .eliminar_fotografia(id)
            .await?
            .ok_or_else(|| AppError::NotFound("Archivo no encontrado".to_string()))?;
        Ok(ApiResponse::success_with_message(
            registro_id,
            "Archivo eliminado exitosamente".to_string(),
        ))
    }

    async fn obra_activa(&self, obra: Option<Uuid>) -> AppResult<Uuid> {
        let obra_id =
            obra.ok_or_else(|| AppError::Validation("Debe seleccionar una obra.".to_string()))?;
        let obra = self
            .obras
            .buscar_por_id(obra_id)
            .await?
            .ok_or_else(|| AppError::Validation("La obra seleccionada no existe.".to_string()))?;
        if !obra.estado {
            return Err(AppError::Validation(
                "La obra seleccionada no está activa.".to_string(),
            ));
        }
        Ok(obra_id)
    }

    /// Convierte las filas validadas en referencias reales: el id debe
    /// ser un UUID de un usuario activo.
    async fn resolver_trabajadores(
        &self,
        filas: &[crate::services::horas_service::FilaTrabajador],
    ) -> AppResult<Vec<(Uuid, Decimal, Decimal)>> {
        let mut resueltos = Vec::with_capacity(filas.len());
        for fila in filas {
            let trabajador_id = Uuid::parse_str(&fila.trabajador_id)
                .map_err(|_| AppError::Validation("Trabajador inválido.".to_string()))?;
            let usuario = self
                .usuarios
                .buscar_por_id(trabajador_id)
                .await?
                .ok_or_else(|| {
                    AppError::Validation("El trabajador seleccionado no existe.".to_string())
                })?;
            if !usuario.is_active {
                return Err(AppError::Validation(
                    "El trabajador seleccionado no está activo.".to_string(),
                ));
            }
            resueltos.push((trabajador_id, fila.horas, fila.horas_extra));
        }
        Ok(resueltos)
    }

    async fn trabajadores_modelo(
        &self,
        registro_id: Uuid,
    ) -> AppResult<Vec<crate::models::registro::TrabajadorRegistro>> {
        let filas = self.repository.trabajadores_de(registro_id).await?;
        Ok(filas
            .into_iter()
            .map(|f| crate::models::registro::TrabajadorRegistro {
                id: f.id,
                registro_id,
                trabajador_id: f.trabajador_id,
                horas_trabajadas: f.horas_trabajadas,
                horas_extras: f.horas_extras,
            })
            .collect())
    }

    async fn armar_respuesta(&self, fila: RegistroFila) -> AppResult<RegistroResponse> {
        let tareas = self.repository.tareas_de(fila.id).await?;
        let trabajadores = self.repository.trabajadores_de(fila.id).await?;
        let fotografias = self.repository.fotografias_de(fila.id).await?;

        // Galería: la foto principal primero, luego los adjuntos en orden
        let mut photos_data = Vec::with_capacity(fotografias.len() + 1);
        if let Some(principal) = &fila.fotografia {
            photos_data.push(FotoData {
                url: media_url(principal),
                name: principal.clone(),
            });
        }
        for foto in &fotografias {
            photos_data.push(FotoData {
                url: media_url(&foto.archivo),
                name: foto.archivo.clone(),
            });
        }

        Ok(RegistroResponse {
            id: fila.id,
            obra_id: fila.obra_id,
            obra_nombre: fila.obra_nombre,
            fecha: fila.fecha,
            supervisor_id: fila.supervisor_id,
            supervisor_nombre: fila.supervisor_nombre,
            observaciones: fila.observaciones.unwrap_or_default(),
            fotografia: fila.fotografia,
            tareas: tareas
                .into_iter()
                .map(|t| TareaResponse {
                    id: t.id,
                    descripcion: t.descripcion,
                    orden: t.orden,
                })
                .collect(),
            trabajadores: trabajadores
                .into_iter()
                .map(|t| TrabajadorHorasResponse {
                    id: t.id,
                    trabajador_id: t.trabajador_id,
                    trabajador_nombre: t.trabajador_nombre,
                    horas_trabajadas: t.horas_trabajadas,
                    horas_extras: t.horas_extras,
                })
                .collect(),
            fotografias: fotografias
                .into_iter()
                .map(|f| FotografiaResponse {
                    id: f.id,
                    url: media_url(&f.archivo),
                    archivo: f.archivo,
                    tipo: f.tipo,
                    orden: f.orden,
                })
                .collect(),
            photos_data,
            fecha_creacion: fila.fecha_creacion,
            fecha_modificacion: fila.fecha_modificacion,
        })
    }
}

fn tareas_limpias(tareas: &[String]) -> Vec<String> {
    tareas
        .iter()
        .map(|t| t.trim().to_string())
        .filter(|t| !t.is_empty())
        .collect()
}

/// Ids de adjuntos a eliminar, separados por coma; lo que no sea un
/// UUID se descarta en silencio.
fn ids_eliminar(deleted_ids: &str) -> Vec<Uuid> {
    deleted_ids
        .split(',')
        .filter_map(|parte| Uuid::parse_str(parte.trim()).ok())
        .collect()
}

fn extension_permitida(nombre: &str) -> bool {
    let nombre = nombre.to_lowercase();
    EXTENSIONES_PERMITIDAS
        .iter()
        .any(|ext| nombre.ends_with(ext))
}

fn archivos_validos(archivos: &[ArchivoNuevo]) -> AppResult<Vec<ArchivoGuardar>> {
    archivos
        .iter()
        .map(|archivo| {
            if !extension_permitida(&archivo.nombre) {
                return Err(AppError::Validation(format!(
                    "Tipo de archivo no permitido: {}",
                    archivo.nombre
                )));
            }
            Ok(ArchivoGuardar {
                archivo: format!("libro_obras/{}", archivo.nombre),
                tipo: TipoArchivo::desde_content_type(&archivo.content_type)
                    .as_str()
                    .to_string(),
            })
        })
        .collect()
}

fn ruta_fotografia(fotografia: Option<&ArchivoNuevo>) -> AppResult<Option<String>> {
    match fotografia {
        None => Ok(None),
        Some(archivo) => {
            if !extension_permitida(&archivo.nombre) {
                return Err(AppError::Validation(format!(
                    "Tipo de archivo no permitido: {}",
                    archivo.nombre
                )));
            }
            Ok(Some(format!("libro_obras/{}", archivo.nombre)))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tareas_limpias_filtra_vacias_y_conserva_orden() {
        let tareas = vec![
            "  Moldaje ".to_string(),
            "".to_string(),
            "Hormigonado".to_string(),
            "   ".to_string(),
        ];
        assert_eq!(tareas_limpias(&tareas), ["Moldaje", "Hormigonado"]);
    }

    #[test]
    fn test_ids_eliminar_descarta_basura() {
        let id = Uuid::new_v4();
        let texto = format!("{}, no-es-uuid, ,42", id);
        assert_eq!(ids_eliminar(&texto), [id]);
    }

    #[test]
    fn test_extension_permitida() {
        assert!(extension_permitida("muro.JPG"));
        assert!(extension_permitida("avance.webp"));
        assert!(extension_permitida("recorrido.mp4"));
        assert!(!extension_permitida("informe.pdf"));
        assert!(!extension_permitida("script.sh"));
    }

    #[test]
    fn test_archivos_validos_clasifica_por_content_type() {
        let archivos = vec![
            ArchivoNuevo {
                nombre: "muro.jpg".to_string(),
                content_type: "image/jpeg".to_string(),
            },
            ArchivoNuevo {
                nombre: "recorrido.mp4".to_string(),
                content_type: "video/mp4".to_string(),
            },
        ];
        let validos = archivos_validos(&archivos).unwrap();
        assert_eq!(validos[0].archivo, "libro_obras/muro.jpg");
        assert_eq!(validos[0].tipo, "imagen");
        assert_eq!(validos[1].tipo, "video");
    }

    #[test]
    fn test_archivos_validos_rechaza_extension() {
        let archivos = vec![ArchivoNuevo {
            nombre: "informe.pdf".to_string(),
            content_type: "application/pdf".to_string(),
        }];
        let err = archivos_validos(&archivos).unwrap_err();
        assert_eq!(
            err.to_string(),
            "Validation error: Tipo de archivo no permitido: informe.pdf"
        );
    }
}
