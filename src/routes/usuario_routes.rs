use axum::{
    extract::{Path, Query, State},
    routing::{delete, get, post, put},
    Json, Router,
};
use uuid::Uuid;

use crate::controllers::usuario_controller::UsuarioController;
use crate::dto::usuario_dto::{
    ActualizarUsuarioRequest, ApiResponse, CrearUsuarioRequest, ListaUsuariosQuery,
    ToggleResponse, UsuarioResponse,
};
use crate::models::usuario::Grupo;
use crate::state::AppState;
use crate::utils::errors::AppError;

pub fn create_usuario_router() -> Router<AppState> {
    Router::new()
        .route("/", get(listar_usuarios))
        .route("/", post(crear_usuario))
        .route("/:id", get(obtener_usuario))
        .route("/:id", put(actualizar_usuario))
        .route("/:id", delete(eliminar_usuario))
        .route("/:id/toggle", post(cambiar_estado_usuario))
}

pub fn create_grupo_router() -> Router<AppState> {
    Router::new().route("/", get(listar_grupos))
}

async fn listar_usuarios(
    State(state): State<AppState>,
    Query(query): Query<ListaUsuariosQuery>,
) -> Result<Json<Vec<UsuarioResponse>>, AppError> {
    let controller = UsuarioController::new(state.pool.clone());
    let response = controller.listar(query.q.as_deref()).await?;
    Ok(Json(response))
}

async fn obtener_usuario(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<UsuarioResponse>, AppError> {
    let controller = UsuarioController::new(state.pool.clone());
    let response = controller.obtener(id).await?;
    Ok(Json(response))
}

async fn crear_usuario(
    State(state): State<AppState>,
    Json(request): Json<CrearUsuarioRequest>,
) -> Result<Json<ApiResponse<UsuarioResponse>>, AppError> {
    let controller = UsuarioController::new(state.pool.clone());
    let response = controller.crear(request).await?;
    Ok(Json(response))
}

async fn actualizar_usuario(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(request): Json<ActualizarUsuarioRequest>,
) -> Result<Json<ApiResponse<UsuarioResponse>>, AppError> {
    let controller = UsuarioController::new(state.pool.clone());
    let response = controller.actualizar(id, request).await?;
    Ok(Json(response))
}

async fn cambiar_estado_usuario(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<ToggleResponse>, AppError> {
    let controller = UsuarioController::new(state.pool.clone());
    let response = controller.cambiar_estado(id).await?;
    Ok(Json(response))
}

async fn eliminar_usuario(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<()>>, AppError> {
    let controller = UsuarioController::new(state.pool.clone());
    let response = controller.eliminar(id).await?;
    Ok(Json(response))
}

async fn listar_grupos(State(state): State<AppState>) -> Result<Json<Vec<Grupo>>, AppError> {
    let controller = UsuarioController::new(state.pool.clone());
    let response = controller.listar_grupos().await?;
    Ok(Json(response))
}
