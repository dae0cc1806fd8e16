//! Middleware del sistema
//!
//! CORS y resolución de identidad. La autenticación de sesión es
//! responsabilidad del gateway; aquí sólo se resuelve y verifica el
//! usuario que el gateway ya autenticó.

pub mod cors;
pub mod identity;

pub use identity::AuthenticatedUser;
