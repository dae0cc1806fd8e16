pub mod catalogo_dto;
pub mod gasto_dto;
pub mod obra_dto;
pub mod registro_dto;
pub mod usuario_dto;
