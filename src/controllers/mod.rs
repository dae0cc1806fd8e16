//! Controllers module
//!
//! Orquestan validación, reglas de negocio y repositorios. Cada
//! controller se construye por petición con un clon barato del pool.

pub mod catalogo_controller;
pub mod gasto_controller;
pub mod obra_controller;
pub mod registro_controller;
pub mod usuario_controller;
