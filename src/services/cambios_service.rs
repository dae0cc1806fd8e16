//! Detección de cambios antes de escribir
//!
//! Las pantallas de edición reenvían el formulario completo, así que
//! antes de tocar la base se compara una instantánea del estado actual
//! con lo recibido; si nada cambió se responde "No se realizaron
//! cambios." y no se escribe nada (tampoco la fecha de modificación).

use chrono::NaiveDate;
use rust_decimal::Decimal;
use uuid::Uuid;

use crate::models::registro::{RegistroLibroObra, TareaRealizada, TrabajadorRegistro};
use crate::services::horas_service::FilaTrabajador;

/// Mensaje estándar cuando la edición no modifica nada.
pub const SIN_CAMBIOS: &str = "No se realizaron cambios.";

/// Instantánea del estado editable de un registro del libro de obras.
///
/// Las tareas se comparan en orden (reordenarlas sí es un cambio); los
/// trabajadores se normalizan y ordenan por id para que el orden de las
/// filas no importe.
#[derive(Debug, Clone, PartialEq)]
pub struct RegistroSnapshot {
    pub obra: String,
    pub fecha: String,
    pub observaciones: String,
    pub tareas: Vec<String>,
    pub trabajadores: Vec<(String, Decimal, Decimal)>,
}

impl RegistroSnapshot {
    /// Instantánea del estado guardado, antes de aplicar el formulario.
    pub fn desde_guardado(
        registro: &RegistroLibroObra,
        tareas: &[TareaRealizada],
        trabajadores: &[TrabajadorRegistro],
    ) -> Self {
        Self {
            obra: registro.obra_id.to_string(),
            fecha: registro.fecha.to_string(),
            observaciones: registro.observaciones.clone().unwrap_or_default(),
            tareas: tareas.iter().map(|t| t.descripcion.clone()).collect(),
            trabajadores: normalizar_trabajadores(
                trabajadores
                    .iter()
                    .map(|t| (t.trabajador_id.to_string(), t.horas_trabajadas, t.horas_extras)),
            ),
        }
    }

    /// Instantánea del estado candidato construido desde el formulario.
    pub fn desde_propuesta(
        obra_id: Uuid,
        fecha: NaiveDate,
        observaciones: &str,
        tareas: &[String],
        filas: &[FilaTrabajador],
    ) -> Self {
        Self {
            obra: obra_id.to_string(),
            fecha: fecha.to_string(),
            observaciones: observaciones.to_string(),
            tareas: tareas.to_vec(),
            trabajadores: normalizar_trabajadores(
                filas
                    .iter()
                    .map(|f| (f.trabajador_id.clone(), f.horas, f.horas_extra)),
            ),
        }
    }
}

/// Normaliza una lista de trabajadores para comparación independiente
/// del orden: redondeo a 3 decimales y orden por id.
pub fn normalizar_trabajadores(
    filas: impl IntoIterator<Item = (String, Decimal, Decimal)>,
) -> Vec<(String, Decimal, Decimal)> {
    let mut norm: Vec<(String, Decimal, Decimal)> = filas
        .into_iter()
        .map(|(id, horas, extra)| (id, horas.round_dp(3), extra.round_dp(3)))
        .collect();
    norm.sort_by(|a, b| a.0.cmp(&b.0));
    norm
}

/// `true` si la edición no modifica nada. Cualquier archivo nuevo, foto
/// principal nueva o eliminación pedida cuenta como cambio siempre.
pub fn registro_sin_cambios(
    original: &RegistroSnapshot,
    nuevo: &RegistroSnapshot,
    hay_archivos_nuevos: bool,
    hay_foto_nueva: bool,
    hay_eliminaciones: bool,
) -> bool {
    original == nuevo && !hay_archivos_nuevos && !hay_foto_nueva && !hay_eliminaciones
}

/// Campos editables de una obra. El estado activo y el creador quedan
/// fuera de la comparación.
#[derive(Debug, Clone, PartialEq)]
pub struct ObraSnapshot {
    pub nombre: String,
    pub codigo: String,
    pub descripcion: Option<String>,
    pub direccion: String,
    pub ciudad: Uuid,
    pub fecha_inicio: NaiveDate,
    pub fecha_fin_estimada: NaiveDate,
    pub estado_obra: Uuid,
}

/// `true` si la edición de la obra no modifica nada.
pub fn obra_sin_cambios(original: &ObraSnapshot, nuevo: &ObraSnapshot) -> bool {
    original == nuevo
}

/// Campos editables de un gasto. El estado activo, la foto y la marca
/// "sin foto" quedan fuera de la comparación a propósito.
#[derive(Debug, Clone, PartialEq)]
pub struct GastoSnapshot {
    pub obra: Uuid,
    pub categoria: Uuid,
    pub proveedor: Uuid,
    pub tipo_documento: Uuid,
    pub monto: Decimal,
    pub fecha: NaiveDate,
    pub fecha_creacion: NaiveDate,
    pub nota: String,
}

/// `true` si la edición del gasto no modifica nada; subir una foto
/// cuenta como cambio aunque el resto sea idéntico.
pub fn gasto_sin_cambios(
    original: &GastoSnapshot,
    nuevo: &GastoSnapshot,
    hay_foto_nueva: bool,
) -> bool {
    original == nuevo && !hay_foto_nueva
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    fn snapshot_base() -> RegistroSnapshot {
        RegistroSnapshot {
            obra: "a3bb189e-8bf9-3888-9912-ace4e6543002".to_string(),
            fecha: "2025-06-10".to_string(),
            observaciones: "Avance normal".to_string(),
            tareas: vec!["Moldaje".to_string(), "Hormigonado".to_string()],
            trabajadores: normalizar_trabajadores(vec![
                ("3".to_string(), dec("8"), dec("0")),
                ("7".to_string(), dec("6.5"), dec("1")),
            ]),
        }
    }

    #[test]
    fn test_identico_no_tiene_cambios() {
        let original = snapshot_base();
        let nuevo = snapshot_base();
        assert!(registro_sin_cambios(&original, &nuevo, false, false, false));
    }

    #[test]
    fn test_observaciones_distintas_es_cambio() {
        let original = snapshot_base();
        let mut nuevo = snapshot_base();
        nuevo.observaciones = "Avance lento".to_string();
        assert!(!registro_sin_cambios(&original, &nuevo, false, false, false));
    }

    #[test]
    fn test_orden_de_tareas_es_cambio() {
        // mismas tareas en otro orden: sí es un cambio
        let original = snapshot_base();
        let mut nuevo = snapshot_base();
        nuevo.tareas.reverse();
        assert!(!registro_sin_cambios(&original, &nuevo, false, false, false));
    }

    #[test]
    fn test_orden_de_trabajadores_no_es_cambio() {
        let original = snapshot_base();
        let nuevo = RegistroSnapshot {
            trabajadores: normalizar_trabajadores(vec![
                ("7".to_string(), dec("6.5"), dec("1")),
                ("3".to_string(), dec("8"), dec("0")),
            ]),
            ..snapshot_base()
        };
        assert!(registro_sin_cambios(&original, &nuevo, false, false, false));
    }

    #[test]
    fn test_horas_equivalentes_comparan_iguales() {
        // 8 y 8.00 son las mismas horas aunque cambie la escala
        let original = snapshot_base();
        let nuevo = RegistroSnapshot {
            trabajadores: normalizar_trabajadores(vec![
                ("3".to_string(), dec("8.00"), dec("0.000")),
                ("7".to_string(), dec("6.500"), dec("1.0")),
            ]),
            ..snapshot_base()
        };
        assert!(registro_sin_cambios(&original, &nuevo, false, false, false));
    }

    #[test]
    fn test_archivos_nuevos_siempre_son_cambio() {
        let original = snapshot_base();
        let nuevo = snapshot_base();
        assert!(!registro_sin_cambios(&original, &nuevo, true, false, false));
        assert!(!registro_sin_cambios(&original, &nuevo, false, true, false));
        assert!(!registro_sin_cambios(&original, &nuevo, false, false, true));
    }

    fn obra_base() -> ObraSnapshot {
        ObraSnapshot {
            nombre: "Edificio Mirador".to_string(),
            codigo: "OB-001".to_string(),
            descripcion: None,
            direccion: "Av. Principal 1234".to_string(),
            ciudad: Uuid::from_u128(1),
            fecha_inicio: NaiveDate::from_ymd_opt(2025, 3, 1).unwrap(),
            fecha_fin_estimada: NaiveDate::from_ymd_opt(2026, 3, 1).unwrap(),
            estado_obra: Uuid::from_u128(2),
        }
    }

    #[test]
    fn test_obra_identica_no_tiene_cambios() {
        // formulario reenviado sin tocar: no hay nada que escribir
        let original = obra_base();
        let nuevo = obra_base();
        assert!(obra_sin_cambios(&original, &nuevo));
    }

    #[test]
    fn test_obra_con_campo_distinto_es_cambio() {
        let original = obra_base();

        let mut nuevo = obra_base();
        nuevo.direccion = "Av. Principal 1236".to_string();
        assert!(!obra_sin_cambios(&original, &nuevo));

        let mut nuevo = obra_base();
        nuevo.descripcion = Some("Torre de 12 pisos".to_string());
        assert!(!obra_sin_cambios(&original, &nuevo));

        let mut nuevo = obra_base();
        nuevo.estado_obra = Uuid::from_u128(3);
        assert!(!obra_sin_cambios(&original, &nuevo));
    }

    #[test]
    fn test_gasto_identico_no_tiene_cambios() {
        let original = GastoSnapshot {
            obra: Uuid::new_v4(),
            categoria: Uuid::new_v4(),
            proveedor: Uuid::new_v4(),
            tipo_documento: Uuid::new_v4(),
            monto: dec("45990"),
            fecha: NaiveDate::from_ymd_opt(2025, 6, 10).unwrap(),
            fecha_creacion: NaiveDate::from_ymd_opt(2025, 6, 1).unwrap(),
            nota: "Compra de áridos".to_string(),
        };
        let nuevo = original.clone();
        assert!(gasto_sin_cambios(&original, &nuevo, false));
        // una foto nueva es cambio aunque el resto sea idéntico
        assert!(!gasto_sin_cambios(&original, &nuevo, true));

        let mut con_monto_distinto = original.clone();
        con_monto_distinto.monto = dec("45991");
        assert!(!gasto_sin_cambios(&original, &con_monto_distinto, false));
    }
}
