//! Utilidades de validación
//!
//! Este módulo contiene funciones helper para validación de datos
//! y conversión de tipos compartidas por todos los formularios.

use chrono::NaiveDate;
use lazy_static::lazy_static;
use regex::Regex;
use rust_decimal::Decimal;
use std::str::FromStr;
use validator::ValidationError;

lazy_static! {
    /// RUT chileno: 12.345.678-9 o 12345678-9 (dígito verificador 0-9 o K)
    static ref RUT_REGEX: Regex =
        Regex::new(r"^\d{1,2}(\.?\d{3}){2}-[\dkK]$").unwrap();
}

/// Parsear una fecha aceptando YYYY-MM-DD, DD-MM-YYYY o DD/MM/YYYY.
///
/// Los formularios de catálogo envían la fecha de creación en cualquiera
/// de los tres formatos según el navegador; `None` si no se reconoce.
pub fn parse_fecha_flexible(value: &str) -> Option<NaiveDate> {
    let value = value.trim();
    if value.is_empty() {
        return None;
    }
    for formato in ["%Y-%m-%d", "%d-%m-%Y", "%d/%m/%Y"] {
        if let Ok(fecha) = NaiveDate::parse_from_str(value, formato) {
            return Some(fecha);
        }
    }
    None
}

/// Parsear un decimal desde texto libre, aceptando coma o punto como
/// separador decimal. `None` si el texto no es un número.
pub fn parse_decimal(value: &str) -> Option<Decimal> {
    let normalizado = value.trim().replace(',', ".");
    if normalizado.is_empty() {
        return None;
    }
    Decimal::from_str(&normalizado).ok()
}

/// Variante tolerante de [`parse_decimal`]: un texto no numérico vale cero.
/// Es la semántica de los campos de horas del libro de obras.
pub fn parse_decimal_o_cero(value: &str) -> Decimal {
    parse_decimal(value).unwrap_or(Decimal::ZERO)
}

/// Validar formato de RUT chileno
pub fn validate_rut(value: &str) -> Result<(), ValidationError> {
    if !RUT_REGEX.is_match(value.trim()) {
        let mut error = ValidationError::new("rut");
        error.add_param("value".into(), &value.to_string());
        return Err(error);
    }
    Ok(())
}

/// Capitalizar un nombre palabra por palabra ("valle del elqui" -> "Valle Del Elqui").
///
/// Cada letra que sigue a un carácter no alfabético queda en mayúscula y el
/// resto en minúscula, que es como se guardan los nombres de catálogo.
pub fn title_case(value: &str) -> String {
    let mut resultado = String::with_capacity(value.len());
    let mut anterior_alfabetico = false;
    for c in value.chars() {
        if c.is_alphabetic() {
            if anterior_alfabetico {
                resultado.extend(c.to_lowercase());
            } else {
                resultado.extend(c.to_uppercase());
            }
            anterior_alfabetico = true;
        } else {
            resultado.push(c);
            anterior_alfabetico = false;
        }
    }
    resultado
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_fecha_flexible() {
        let esperada = NaiveDate::from_ymd_opt(2024, 1, 15).unwrap();
        assert_eq!(parse_fecha_flexible("2024-01-15"), Some(esperada));
        assert_eq!(parse_fecha_flexible("15-01-2024"), Some(esperada));
        assert_eq!(parse_fecha_flexible("15/01/2024"), Some(esperada));
        assert_eq!(parse_fecha_flexible(""), None);
        assert_eq!(parse_fecha_flexible("ayer"), None);
    }

    #[test]
    fn test_parse_decimal_acepta_coma_y_punto() {
        assert_eq!(parse_decimal("4,5"), Some(Decimal::new(45, 1)));
        assert_eq!(parse_decimal("4.5"), Some(Decimal::new(45, 1)));
        assert_eq!(parse_decimal(" 8 "), Some(Decimal::new(8, 0)));
        assert_eq!(parse_decimal("abc"), None);
        assert_eq!(parse_decimal(""), None);
    }

    #[test]
    fn test_parse_decimal_o_cero() {
        assert_eq!(parse_decimal_o_cero("no-numero"), Decimal::ZERO);
        assert_eq!(parse_decimal_o_cero(""), Decimal::ZERO);
        assert_eq!(parse_decimal_o_cero("2,25"), Decimal::new(225, 2));
    }

    #[test]
    fn test_validate_rut() {
        assert!(validate_rut("12.345.678-9").is_ok());
        assert!(validate_rut("12345678-K").is_ok());
        assert!(validate_rut("9.876.543-2").is_ok());
        assert!(validate_rut("12345678").is_err());
        assert!(validate_rut("no-es-rut").is_err());
    }

    #[test]
    fn test_title_case() {
        assert_eq!(title_case("santiago"), "Santiago");
        assert_eq!(title_case("valle del elqui"), "Valle Del Elqui");
        assert_eq!(title_case("VIÑA DEL MAR"), "Viña Del Mar");
        assert_eq!(title_case("o'higgins"), "O'Higgins");
        assert_eq!(title_case(""), "");
    }
}
