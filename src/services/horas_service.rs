//! Normalización y validación de horas trabajadas
//!
//! Cada fila del formulario de registro trae el id del trabajador y dos
//! campos de texto libre: horas normales y horas extra. Aquí se
//! convierten a decimal, se aplican los topes diarios y se valida la
//! lista completa (sin trabajadores repetidos, sin el supervisor).

use std::collections::HashSet;

use lazy_static::lazy_static;
use rust_decimal::Decimal;

use crate::utils::errors::{AppError, AppResult};
use crate::utils::validation::parse_decimal_o_cero;

lazy_static! {
    /// Tope diario por trabajador: horas normales + extra
    pub static ref MAX_HORAS_TOTAL: Decimal = Decimal::new(120, 1);
    /// Mínimo de horas normales exigido al guardar una fila
    pub static ref HORAS_MINIMAS: Decimal = Decimal::ONE;
}

/// Fila de trabajador ya normalizada, lista para persistir.
///
/// El id se mantiene como texto: las comparaciones de duplicados y de
/// supervisor se hacen sobre lo que envió el formulario, antes de
/// interpretar el id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilaTrabajador {
    pub trabajador_id: String,
    pub horas: Decimal,
    pub horas_extra: Decimal,
}

/// Normaliza un par (horas, horas extra) de texto libre.
///
/// Acepta coma o punto decimal; lo no numérico vale cero y los
/// negativos se truncan a cero. Con `min_base` en cero el mínimo de
/// horas normales no se exige (filas opcionales).
pub fn normaliza_par(
    horas: &str,
    horas_extra: &str,
    min_base: Decimal,
) -> AppResult<(Decimal, Decimal)> {
    let mut base = parse_decimal_o_cero(horas);
    let mut extra = parse_decimal_o_cero(horas_extra);
    if base < Decimal::ZERO {
        base = Decimal::ZERO;
    }
    if extra < Decimal::ZERO {
        extra = Decimal::ZERO;
    }

    let total = base + extra;
    if total > *MAX_HORAS_TOTAL {
        return Err(AppError::Validation(
            "La suma de horas y horas extra no puede superar 12 por trabajador.".to_string(),
        ));
    }
    if base > *MAX_HORAS_TOTAL {
        return Err(AppError::Validation(
            "Las horas normales no pueden superar 12 por trabajador.".to_string(),
        ));
    }
    if min_base > Decimal::ZERO && base < min_base {
        return Err(AppError::Validation(
            "Las horas normales deben ser al menos 1 por trabajador.".to_string(),
        ));
    }
    Ok((base.round_dp(2), extra.round_dp(2)))
}

/// Valida la lista completa de trabajadores y devuelve las filas
/// normalizadas en el orden recibido.
///
/// Las tres listas son paralelas: `trabajadores[i]` va con `horas[i]` y
/// `horas_extra[i]`. Una fila con id pero sin ninguna hora escrita se
/// descarta en silencio, igual que en el formulario.
pub fn validar_trabajadores(
    trabajadores: &[String],
    horas: &[String],
    horas_extra: &[String],
    supervisor_id: &str,
) -> AppResult<Vec<FilaTrabajador>> {
    let limpios: Vec<&str> = trabajadores
        .iter()
        .map(|t| t.as_str())
        .filter(|t| !t.is_empty())
        .collect();
    let unicos: HashSet<&str> = limpios.iter().copied().collect();
    if unicos.len() != limpios.len() {
        return Err(AppError::Validation(
            "Un trabajador no puede repetirse en el mismo registro.".to_string(),
        ));
    }
    if limpios.contains(&supervisor_id) {
        return Err(AppError::Validation(
            "El supervisor no puede ser seleccionado como trabajador.".to_string(),
        ));
    }

    let mut filas = Vec::new();
    for ((trabajador, h), extra) in trabajadores.iter().zip(horas).zip(horas_extra) {
        if trabajador.is_empty() || (h.is_empty() && extra.is_empty()) {
            continue;
        }
        let (base, extra) = normaliza_par(h, extra, *HORAS_MINIMAS)?;
        filas.push(FilaTrabajador {
            trabajador_id: trabajador.clone(),
            horas: base,
            horas_extra: extra,
        });
    }
    Ok(filas)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    fn vecs(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_normaliza_par_redondea_a_dos_decimales() {
        let (base, extra) = normaliza_par("8,005", "1.5", Decimal::ZERO).unwrap();
        // redondeo bancario: 8.005 -> 8.00
        assert_eq!(base, dec("8.00"));
        assert_eq!(extra, dec("1.50"));
    }

    #[test]
    fn test_normaliza_par_acepta_coma_decimal() {
        let (base, extra) = normaliza_par("4,5", "2,25", Decimal::ZERO).unwrap();
        assert_eq!(base, dec("4.50"));
        assert_eq!(extra, dec("2.25"));
    }

    #[test]
    fn test_normaliza_par_texto_no_numerico_vale_cero() {
        let (base, extra) = normaliza_par("abc", "", Decimal::ZERO).unwrap();
        assert_eq!(base, Decimal::ZERO);
        assert_eq!(extra, Decimal::ZERO);
    }

    #[test]
    fn test_normaliza_par_trunca_negativos_a_cero() {
        let (base, extra) = normaliza_par("-3", "-1", Decimal::ZERO).unwrap();
        assert_eq!(base, Decimal::ZERO);
        assert_eq!(extra, Decimal::ZERO);
    }

    #[test]
    fn test_normaliza_par_rechaza_total_sobre_12() {
        let err = normaliza_par("10", "5", Decimal::ZERO).unwrap_err();
        assert_eq!(
            err.to_string(),
            "Validation error: La suma de horas y horas extra no puede superar 12 por trabajador."
        );
    }

    #[test]
    fn test_normaliza_par_acepta_exactamente_12() {
        let (base, extra) = normaliza_par("12", "0", *HORAS_MINIMAS).unwrap();
        assert_eq!(base, dec("12.00"));
        assert_eq!(extra, dec("0.00"));

        let (base, extra) = normaliza_par("6", "6", *HORAS_MINIMAS).unwrap();
        assert_eq!(base + extra, dec("12.00"));
    }

    #[test]
    fn test_normaliza_par_exige_minimo_de_horas_normales() {
        let err = normaliza_par("0.5", "0", *HORAS_MINIMAS).unwrap_err();
        assert_eq!(
            err.to_string(),
            "Validation error: Las horas normales deben ser al menos 1 por trabajador."
        );

        // sin mínimo la misma fila es válida
        assert!(normaliza_par("0.5", "0", Decimal::ZERO).is_ok());
    }

    #[test]
    fn test_validar_trabajadores_rechaza_duplicados() {
        let err = validar_trabajadores(
            &vecs(&["5", "5"]),
            &vecs(&["4", "2"]),
            &vecs(&["0", "0"]),
            "99",
        )
        .unwrap_err();
        assert_eq!(
            err.to_string(),
            "Validation error: Un trabajador no puede repetirse en el mismo registro."
        );
    }

    #[test]
    fn test_validar_trabajadores_rechaza_al_supervisor() {
        let err = validar_trabajadores(
            &vecs(&["7", "99"]),
            &vecs(&["8", "8"]),
            &vecs(&["0", "0"]),
            "99",
        )
        .unwrap_err();
        assert_eq!(
            err.to_string(),
            "Validation error: El supervisor no puede ser seleccionado como trabajador."
        );
    }

    #[test]
    fn test_validar_trabajadores_descarta_filas_vacias() {
        // fila sin trabajador y fila sin horas: ninguna se guarda
        let filas = validar_trabajadores(
            &vecs(&["", "7", "8"]),
            &vecs(&["4", "", "8"]),
            &vecs(&["0", "", "1"]),
            "99",
        )
        .unwrap();
        assert_eq!(filas.len(), 1);
        assert_eq!(filas[0].trabajador_id, "8");
        assert_eq!(filas[0].horas, dec("8.00"));
        assert_eq!(filas[0].horas_extra, dec("1.00"));
    }

    #[test]
    fn test_validar_trabajadores_conserva_el_orden_de_envio() {
        let filas = validar_trabajadores(
            &vecs(&["9", "3", "6"]),
            &vecs(&["8", "7,5", "6"]),
            &vecs(&["0", "1", "2"]),
            "99",
        )
        .unwrap();
        let ids: Vec<&str> = filas.iter().map(|f| f.trabajador_id.as_str()).collect();
        assert_eq!(ids, ["9", "3", "6"]);
        assert_eq!(filas[1].horas, dec("7.50"));
    }

    #[test]
    fn test_validar_trabajadores_duplicado_gana_a_las_horas() {
        // el duplicado se detecta aunque las horas de la fila sean inválidas
        let err = validar_trabajadores(
            &vecs(&["5", "5"]),
            &vecs(&["99", "99"]),
            &vecs(&["0", "0"]),
            "1",
        )
        .unwrap_err();
        assert_eq!(
            err.to_string(),
            "Validation error: Un trabajador no puede repetirse en el mismo registro."
        );
    }
}
