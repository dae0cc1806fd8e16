pub mod catalogo;
pub mod gasto;
pub mod obra;
pub mod registro;
pub mod usuario;

pub use catalogo::*;
pub use gasto::*;
pub use obra::*;
pub use registro::*;
pub use usuario::*;
