//! Acceso a datos
//!
//! Un repositorio por área de la aplicación, cada uno sobre el pool de
//! PostgreSQL. Las escrituras multi-fila van siempre en transacción.

pub mod catalogo_repository;
pub mod gasto_repository;
pub mod obra_repository;
pub mod registro_repository;
pub mod usuario_repository;
