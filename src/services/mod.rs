//! Services module
//!
//! Reglas de negocio puras del libro de obras: normalización de horas
//! y detección de cambios. No tocan la base de datos, lo que permite
//! probarlas sin infraestructura.

pub mod cambios_service;
pub mod horas_service;

pub use cambios_service::*;
pub use horas_service::*;
