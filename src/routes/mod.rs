//! Routes module
//!
//! Handlers delgados de axum: extraen, delegan al controller y
//! serializan. Toda la superficie cuelga de `/api` detrás del
//! middleware de identidad.

pub mod catalogo_routes;
pub mod gasto_routes;
pub mod obra_routes;
pub mod registro_routes;
pub mod usuario_routes;
