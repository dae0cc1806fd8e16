//! Middleware de identidad
//!
//! La autenticación de sesión vive en el gateway; acá sólo llega el id
//! del usuario ya autenticado en la cabecera `X-Usuario-Id`. Este
//! middleware carga el usuario, exige que esté activo y lo inyecta como
//! extensión para que cada handler reciba la identidad explícita.

use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};
use uuid::Uuid;

use crate::models::usuario::Usuario;
use crate::state::AppState;
use crate::utils::errors::AppError;

pub const HEADER_USUARIO: &str = "x-usuario-id";

/// Usuario autenticado que se inyecta en las requests
#[derive(Debug, Clone)]
pub struct AuthenticatedUser {
    pub id: Uuid,
    pub username: String,
    pub nombre: String,
}

pub async fn identity_middleware(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, AppError> {
    let usuario_id = request
        .headers()
        .get(HEADER_USUARIO)
        .and_then(|valor| valor.to_str().ok())
        .ok_or_else(|| AppError::Unauthorized("Identidad requerida.".to_string()))?;

    let usuario_id = Uuid::parse_str(usuario_id)
        .map_err(|_| AppError::Unauthorized("Identidad inválida.".to_string()))?;

    let usuario = sqlx::query_as::<_, Usuario>("SELECT * FROM usuarios WHERE id = $1")
        .bind(usuario_id)
        .fetch_optional(&state.pool)
        .await?
        .ok_or_else(|| AppError::Unauthorized("Usuario no encontrado.".to_string()))?;

    if !usuario.is_active {
        return Err(AppError::Unauthorized("Usuario inactivo.".to_string()));
    }

    let authenticated_user = AuthenticatedUser {
        id: usuario.id,
        username: usuario.username.clone(),
        nombre: usuario.nombre_completo(),
    };
    request.extensions_mut().insert(authenticated_user);

    Ok(next.run(request).await)
}
