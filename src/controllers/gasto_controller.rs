//! Reglas de negocio de la rendición de gastos y sus catálogos

use chrono::{NaiveDate, Utc};
use rust_decimal::Decimal;
use sqlx::PgPool;
use uuid::Uuid;
use validator::Validate;

use crate::dto::gasto_dto::{
    GastoResponse, GuardarCategoriaRequest, GuardarGastoRequest, GuardarProveedorRequest,
    GuardarTipoDocumentoRequest,
};
use crate::dto::registro_dto::{media_url, FotoData};
use crate::dto::usuario_dto::{ApiResponse, ToggleResponse};
use crate::middleware::identity::AuthenticatedUser;
use crate::models::gasto::{Categoria, Proveedor, TipoDocumento};
use crate::repositories::gasto_repository::{GastoFila, GastoRepository};
use crate::services::cambios_service::{gasto_sin_cambios, GastoSnapshot, SIN_CAMBIOS};
use crate::utils::errors::{es_violacion_unicidad, AppError, AppResult};
use crate::utils::validation::{parse_decimal, parse_fecha_flexible, validate_rut};

pub struct GastoController {
    repository: GastoRepository,
}

impl GastoController {
    pub fn new(pool: PgPool) -> Self {
        Self {
            repository: GastoRepository::new(pool),
        }
    }

    // ---- Proveedores ----

    pub async fn listar_proveedores(&self) -> AppResult<Vec<Proveedor>> {
        self.repository.listar_proveedores().await
    }

    pub async fn crear_proveedor(
        &self,
        identidad: &AuthenticatedUser,
        request: GuardarProveedorRequest,
    ) -> AppResult<ApiResponse<Proveedor>> {
        request.validate()?;
        let nombre = request.nombre.trim();
        let rut = request.rut.trim();
        if nombre.is_empty() || rut.is_empty() {
            return Err(AppError::Validation(
                "Nombre y RUT son obligatorios.".to_string(),
            ));
        }
        if validate_rut(rut).is_err() {
            return Err(AppError::Validation(
                "El RUT no tiene un formato válido.".to_string(),
            ));
        }
        let fecha = fecha_o_hoy(&request.fecha_creacion);

        match self
            .repository
            .crear_proveedor(
                nombre,
                rut,
                request.direccion.trim(),
                request.telefono.trim(),
                fecha,
                identidad.id,
            )
            .await
        {
            Ok(proveedor) => Ok(ApiResponse::success_with_message(
                proveedor,
                "Proveedor creado correctamente.".to_string(),
            )),
            Err(AppError::Database(e)) if es_violacion_unicidad(&e) => Err(AppError::Validation(
                "No se pudo guardar el proveedor (posible RUT duplicado).".to_string(),
            )),
            Err(e) => Err(e),
        }
    }

    pub async fn actualizar_proveedor(
        &self,
        identidad: &AuthenticatedUser,
        id: Uuid,
        request: GuardarProveedorRequest,
    ) -> AppResult<ApiResponse<Proveedor>> {
        request.validate()?;
        let proveedor = self
            .repository
            .buscar_proveedor(id)
            .await?
            .ok_or_else(|| AppError::NotFound("Proveedor no encontrado".to_string()))?;

        let nombre = request.nombre.trim();
        let rut = request.rut.trim();
        if nombre.is_empty() || rut.is_empty() {
            return Err(AppError::Validation(
                "Nombre y RUT son obligatorios.".to_string(),
            ));
        }
        if validate_rut(rut).is_err() {
            return Err(AppError::Validation(
                "El RUT no tiene un formato válido.".to_string(),
            ));
        }
        let fecha = parse_fecha_flexible(&request.fecha_creacion).unwrap_or(proveedor.fecha_creacion);

        match self
            .repository
            .actualizar_proveedor(
                id,
                nombre,
                rut,
                request.direccion.trim(),
                request.telefono.trim(),
                fecha,
                identidad.id,
            )
            .await
        {
            Ok(proveedor) => Ok(ApiResponse::success_with_message(
                proveedor,
                "Proveedor actualizado correctamente.".to_string(),
            )),
            Err(AppError::Database(e)) if es_violacion_unicidad(&e) => Err(AppError::Validation(
                "No se pudo guardar el proveedor (posible RUT duplicado).".to_string(),
            )),
            Err(e) => Err(e),
        }
    }

    pub async fn cambiar_estado_proveedor(&self, id: Uuid) -> AppResult<ToggleResponse> {
        let proveedor = self
            .repository
            .cambiar_estado_proveedor(id)
            .await?
            .ok_or_else(|| AppError::NotFound("Proveedor no encontrado".to_string()))?;
        Ok(ToggleResponse {
            success: true,
            estado: proveedor.estado,
            message: None,
        })
    }

    // ---- Categorías ----

    pub async fn listar_categorias(&self) -> AppResult<Vec<Categoria>> {
        self.repository.listar_categorias().await
    }

    pub async fn crear_categoria(
        &self,
        identidad: &AuthenticatedUser,
        request: GuardarCategoriaRequest,
    ) -> AppResult<ApiResponse<Categoria>> {
        request.validate()?;
        let nombre = request.nombre.trim();
        if nombre.is_empty() {
            return Err(AppError::Validation("El nombre es obligatorio.".to_string()));
        }
        let fecha = fecha_o_hoy(&request.fecha_creacion);

        match self.repository.crear_categoria(nombre, fecha, identidad.id).await {
            Ok(categoria) => Ok(ApiResponse::success_with_message(
                categoria,
                "Categoria creada correctamente.".to_string(),
            )),
            Err(AppError::Database(e)) if es_violacion_unicidad(&e) => Err(AppError::Conflict(
                "Ya existe una categoría con ese nombre.".to_string(),
            )),
            Err(e) => Err(e),
        }
    }

    pub async fn actualizar_categoria(
        &self,
        identidad: &AuthenticatedUser,
        id: Uuid,
        request: GuardarCategoriaRequest,
    ) -> AppResult<ApiResponse<Categoria>> {
        request.validate()?;
        let categoria = self
            .repository
            .buscar_categoria(id)
            .await?
            .ok_or_else(|| AppError::NotFound("Categoría no encontrada".to_string()))?;

        let nombre = request.nombre.trim();
        if nombre.is_empty() {
            return Err(AppError::Validation("El nombre es obligatorio.".to_string()));
        }
        let fecha = parse_fecha_flexible(&request.fecha_creacion).unwrap_or(categoria.fecha_creacion);

        match self
            .repository
            .actualizar_categoria(id, nombre, fecha, identidad.id)
            .await
        {
            Ok(categoria) => Ok(ApiResponse::success_with_message(
                categoria,
                "Categoria actualizada correctamente.".to_string(),
            )),
            Err(AppError::Database(e)) if es_violacion_unicidad(&e) => Err(AppError::Conflict(
                "Ya existe una categoría con ese nombre.".to_string(),
            )),
            Err(e) => Err(e),
        }
    }

    pub async fn cambiar_estado_categoria(&self, id: Uuid) -> AppResult<ToggleResponse> {
        let categoria = self
            .repository
            .cambiar_estado_categoria(id)
            .await?
            .ok_or_else(|| AppError::NotFound("Categoría no encontrada".to_string()))?;
        Ok(ToggleResponse {
            success: true,
            estado: categoria.estado,
            message: None,
        })
    }

    // ---- Tipos de documento ----

    pub async fn listar_tipos_documento(&self) -> AppResult<Vec<TipoDocumento>> {
        self.repository.listar_tipos_documento().await
    }

    pub async fn crear_tipo_documento(
        &self,
        identidad: &AuthenticatedUser,
        request: GuardarTipoDocumentoRequest,
    ) -> AppResult<ApiResponse<TipoDocumento>> {
        request.validate()?;
        let nombre = request.nombre.trim();
        if nombre.is_empty() {
            return Err(AppError::Validation("El nombre es obligatorio.".to_string()));
        }
        let fecha = fecha_o_hoy(&request.fecha_creacion);

        match self
            .repository
            .crear_tipo_documento(nombre, fecha, identidad.id)
            .await
        {
            Ok(tipo) => Ok(ApiResponse::success_with_message(
                tipo,
                "Tipo de documento creado correctamente.".to_string(),
            )),
            Err(AppError::Database(e)) if es_violacion_unicidad(&e) => Err(AppError::Conflict(
                "Ya existe un tipo de documento con ese nombre.".to_string(),
            )),
            Err(e) => Err(e),
        }
    }

    pub async fn actualizar_tipo_documento(
        &self,
        identidad: &AuthenticatedUser,
        id: Uuid,
        request: GuardarTipoDocumentoRequest,
    ) -> AppResult<ApiResponse<TipoDocumento>> {
        request.validate()?;
        let tipo = self
            .repository
            .buscar_tipo_documento(id)
            .await?
            .ok_or_else(|| AppError::NotFound("Tipo de documento no encontrado".to_string()))?;

        let nombre = request.nombre.trim();
        if nombre.is_empty() {
            return Err(AppError::Validation("El nombre es obligatorio.".to_string()));
        }
        let fecha = parse_fecha_flexible(&request.fecha_creacion).unwrap_or(tipo.fecha_creacion);

        match self
            .repository
            .actualizar_tipo_documento(id, nombre, fecha, identidad.id)
            .await
        {
            Ok(tipo) => Ok(ApiResponse::success_with_message(
                tipo,
                "Tipo de documento actualizado correctamente.".to_string(),
            )),
            Err(AppError::Database(e)) if es_violacion_unicidad(&e) => Err(AppError::Conflict(
                "Ya existe un tipo de documento con ese nombre.".to_string(),
            )),
            Err(e) => Err(e),
        }
    }

    pub async fn cambiar_estado_tipo_documento(&self, id: Uuid) -> AppResult<ToggleResponse> {
        let tipo = self
            .repository
            .cambiar_estado_tipo_documento(id)
            .await?
            .ok_or_else(|| AppError::NotFound("Tipo de documento no encontrado".to_string()))?;
        Ok(ToggleResponse {
            success: true,
            estado: tipo.estado,
            message: None,
        })
    }

    // ---- Gastos ----

    pub async fn listar_gastos(&self) -> AppResult<Vec<GastoResponse>> {
        let gastos = self.repository.listar_gastos().await?;
        Ok(gastos.into_iter().map(respuesta_desde_fila).collect())
    }

    pub async fn obtener_gasto(&self, id: Uuid) -> AppResult<GastoResponse> {
        let gasto = self
            .repository
            .buscar_gasto_fila(id)
            .await?
            .ok_or_else(|| AppError::NotFound("Gasto no encontrado".to_string()))?;
        Ok(respuesta_desde_fila(gasto))
    }

    pub async fn crear_gasto(
        &self,
        identidad: &AuthenticatedUser,
        request: GuardarGastoRequest,
    ) -> AppResult<ApiResponse<GastoResponse>> {
        let (obra_id, categoria_id, proveedor_id, tipo_documento_id) =
            referencias_de(&request)?;
        let monto = monto_valido(&request.monto)?;

        let fecha = fecha_o_hoy(&request.fecha);
        let fecha_creacion = parse_fecha_flexible(&request.fecha_creacion).unwrap_or(fecha);

        // "Sin foto" gana a cualquier archivo adjunto
        let foto = if request.sin_foto {
            None
        } else {
            request
                .foto
                .as_ref()
                .map(|archivo| format!("gastos/{}", archivo.nombre))
        };

        let gasto = self
            .repository
            .crear_gasto(
                obra_id,
                categoria_id,
                proveedor_id,
                tipo_documento_id,
                monto,
                fecha,
                fecha_creacion,
                foto.as_deref(),
                request.sin_foto,
                request.nota.trim(),
                identidad.id,
            )
            .await?;

        let respuesta = self.obtener_gasto(gasto.id).await?;
        Ok(ApiResponse::success_with_message(
            respuesta,
            "Gasto creado correctamente.".to_string(),
        ))
    }

    pub async fn actualizar_gasto(
        &self,
        id: Uuid,
        request: GuardarGastoRequest,
    ) -> AppResult<ApiResponse<GastoResponse>> {
        let gasto = self
            .repository
            .buscar_gasto(id)
            .await?
            .ok_or_else(|| AppError::NotFound("Gasto no encontrado".to_string()))?;

        let (obra_id, categoria_id, proveedor_id, tipo_documento_id) =
            referencias_de(&request)?;
        let monto = monto_valido(&request.monto)?;
        let fecha = parse_fecha_flexible(&request.fecha).unwrap_or(gasto.fecha);
        let fecha_creacion =
            parse_fecha_flexible(&request.fecha_creacion).unwrap_or(gasto.fecha_creacion);

        // La guarda ignora estado, foto y "sin foto"; una foto nueva
        // siempre cuenta como cambio.
        let original = GastoSnapshot {
            obra: gasto.obra_id,
            categoria: gasto.categoria_id,
            proveedor: gasto.proveedor_id,
            tipo_documento: gasto.tipo_documento_id,
            monto: gasto.monto,
            fecha: gasto.fecha,
            fecha_creacion: gasto.fecha_creacion,
            nota: gasto.nota.clone(),
        };
        let nuevo = GastoSnapshot {
            obra: obra_id,
            categoria: categoria_id,
            proveedor: proveedor_id,
            tipo_documento: tipo_documento_id,
            monto,
            fecha,
            fecha_creacion,
            nota: request.nota.trim().to_string(),
        };
        if gasto_sin_cambios(&original, &nuevo, request.foto.is_some()) {
            let respuesta = self.obtener_gasto(id).await?;
            return Ok(ApiResponse::success_with_message(
                respuesta,
                SIN_CAMBIOS.to_string(),
            ));
        }

        let foto = if request.sin_foto {
            None
        } else {
            request
                .foto
                .as_ref()
                .map(|archivo| format!("gastos/{}", archivo.nombre))
                .or(gasto.foto)
        };

        self.repository
            .actualizar_gasto(
                id,
                obra_id,
                categoria_id,
                proveedor_id,
                tipo_documento_id,
                monto,
                fecha,
                fecha_creacion,
                foto.as_deref(),
                request.sin_foto,
                &nuevo.nota,
            )
            .await?;

        let respuesta = self.obtener_gasto(id).await?;
        Ok(ApiResponse::success_with_message(
            respuesta,
            "Gasto actualizado correctamente.".to_string(),
        ))
    }

    pub async fn cambiar_estado_gasto(&self, id: Uuid) -> AppResult<ToggleResponse> {
        let gasto = self
            .repository
            .cambiar_estado_gasto(id)
            .await?
            .ok_or_else(|| AppError::NotFound("Gasto no encontrado".to_string()))?;
        Ok(ToggleResponse {
            success: true,
            estado: gasto.estado,
            message: None,
        })
    }
}

fn referencias_de(request: &GuardarGastoRequest) -> AppResult<(Uuid, Uuid, Uuid, Uuid)> {
    let obra = request
        .obra
        .ok_or_else(|| AppError::Validation("Debe seleccionar una obra.".to_string()))?;
    let categoria = request
        .categoria
        .ok_or_else(|| AppError::Validation("Debe seleccionar una categoría.".to_string()))?;
    let proveedor = request
        .proveedor
        .ok_or_else(|| AppError::Validation("Debe seleccionar un proveedor.".to_string()))?;
    let tipo_documento = request
        .tipo_documento
        .ok_or_else(|| AppError::Validation("Debe seleccionar un tipo de documento.".to_string()))?;
    Ok((obra, categoria, proveedor, tipo_documento))
}

fn monto_valido(texto: &str) -> AppResult<Decimal> {
    let monto = parse_decimal(texto).unwrap_or(Decimal::ZERO);
    if monto <= Decimal::ZERO {
        return Err(AppError::Validation(
            "No se pueden ingresar montos iguales o menores a 0.".to_string(),
        ));
    }
    Ok(monto.round_dp(2))
}

fn fecha_o_hoy(texto: &str) -> NaiveDate {
    parse_fecha_flexible(texto).unwrap_or_else(|| Utc::now().date_naive())
}

fn respuesta_desde_fila(fila: GastoFila) -> GastoResponse {
    let photos_data = fila
        .foto
        .iter()
        .map(|foto| FotoData {
            url: media_url(foto),
            name: foto.clone(),
        })
        .collect();
    GastoResponse {
        id: fila.id,
        obra_id: fila.obra_id,
        obra_nombre: fila.obra_nombre,
        categoria_id: fila.categoria_id,
        categoria_nombre: fila.categoria_nombre,
        proveedor_id: fila.proveedor_id,
        proveedor_nombre: fila.proveedor_nombre,
        tipo_documento_id: fila.tipo_documento_id,
        tipo_documento_nombre: fila.tipo_documento_nombre,
        monto: fila.monto,
        fecha: fila.fecha,
        fecha_creacion: fila.fecha_creacion,
        estado: fila.estado,
        foto: fila.foto,
        sin_foto: fila.sin_foto,
        nota: fila.nota,
        creado_por_nombre: fila.creado_por_nombre,
        photos_data,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn test_monto_valido_rechaza_cero_y_negativos() {
        for invalido in ["0", "-100", "", "abc"] {
            let err = monto_valido(invalido).unwrap_err();
            assert_eq!(
                err.to_string(),
                "Validation error: No se pueden ingresar montos iguales o menores a 0."
            );
        }
    }

    #[test]
    fn test_monto_valido_acepta_coma_decimal() {
        assert_eq!(
            monto_valido("45990,50").unwrap(),
            Decimal::from_str("45990.50").unwrap()
        );
    }
}
