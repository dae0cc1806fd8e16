use axum::{
    extract::{Path, State},
    routing::{delete, get, post, put},
    Extension, Json, Router,
};
use uuid::Uuid;

use crate::controllers::catalogo_controller::CatalogoController;
use crate::dto::catalogo_dto::{
    CiudadResponse, GuardarCiudadRequest, GuardarEstadoObraRequest, GuardarPaisRequest,
};
use crate::dto::usuario_dto::{ApiResponse, ToggleResponse};
use crate::middleware::identity::AuthenticatedUser;
use crate::models::catalogo::{EstadoObra, Pais};
use crate::state::AppState;
use crate::utils::errors::AppError;

pub fn create_pais_router() -> Router<AppState> {
    Router::new()
        .route("/", get(listar_paises))
        .route("/", post(crear_pais))
        .route("/:id", put(actualizar_pais))
        .route("/:id", delete(eliminar_pais))
        .route("/:id/toggle", post(cambiar_estado_pais))
}

pub fn create_ciudad_router() -> Router<AppState> {
    Router::new()
        .route("/", get(listar_ciudades))
        .route("/", post(crear_ciudad))
        .route("/:id", put(actualizar_ciudad))
        .route("/:id", delete(eliminar_ciudad))
        .route("/:id/toggle", post(cambiar_estado_ciudad))
}

pub fn create_estado_obra_router() -> Router<AppState> {
    Router::new()
        .route("/", get(listar_estados_obra))
        .route("/", post(crear_estado_obra))
        .route("/:id", put(actualizar_estado_obra))
        .route("/:id", delete(eliminar_estado_obra))
        .route("/:id/toggle", post(cambiar_estado_estado_obra))
}

async fn listar_paises(State(state): State<AppState>) -> Result<Json<Vec<Pais>>, AppError> {
    let controller = CatalogoController::new(state.pool.clone());
    let response = controller.listar_paises().await?;
    Ok(Json(response))
}

async fn crear_pais(
    State(state): State<AppState>,
    Extension(identidad): Extension<AuthenticatedUser>,
    Json(request): Json<GuardarPaisRequest>,
) -> Result<Json<ApiResponse<Pais>>, AppError> {
    let controller = CatalogoController::new(state.pool.clone());
    let response = controller.crear_pais(&identidad, request).await?;
    Ok(Json(response))
}

async fn actualizar_pais(
    State(state): State<AppState>,
    Extension(identidad): Extension<AuthenticatedUser>,
    Path(id): Path<Uuid>,
    Json(request): Json<GuardarPaisRequest>,
) -> Result<Json<ApiResponse<Pais>>, AppError> {
    let controller = CatalogoController::new(state.pool.clone());
    let response = controller.actualizar_pais(&identidad, id, request).await?;
    Ok(Json(response))
}

async fn eliminar_pais(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<()>>, AppError> {
    let controller = CatalogoController::new(state.pool.clone());
    let response = controller.eliminar_pais(id).await?;
    Ok(Json(response))
}

async fn cambiar_estado_pais(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<ToggleResponse>, AppError> {
    let controller = CatalogoController::new(state.pool.clone());
    let response = controller.cambiar_estado_pais(id).await?;
    Ok(Json(response))
}

async fn listar_ciudades(
    State(state): State<AppState>,
) -> Result<Json<Vec<CiudadResponse>>, AppError> {
    let controller = CatalogoController::new(state.pool.clone());
    let response = controller.listar_ciudades().await?;
    Ok(Json(response))
}

async fn crear_ciudad(
    State(state): State<AppState>,
    Extension(identidad): Extension<AuthenticatedUser>,
    Json(request): Json<GuardarCiudadRequest>,
) -> Result<Json<ApiResponse<CiudadResponse>>, AppError> {
    let controller = CatalogoController::new(state.pool.clone());
    let response = controller.crear_ciudad(&identidad, request).await?;
    Ok(Json(response))
}

async fn actualizar_ciudad(
    State(state): State<AppState>,
    Extension(identidad): Extension<AuthenticatedUser>,
    Path(id): Path<Uuid>,
    Json(request): Json<GuardarCiudadRequest>,
) -> Result<Json<ApiResponse<CiudadResponse>>, AppError> {
    let controller = CatalogoController::new(state.pool.clone());
    let response = controller.actualizar_ciudad(&identidad, id, request).await?;
    Ok(Json(response))
}

async fn eliminar_ciudad(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<()>>, AppError> {
    let controller = CatalogoController::new(state.pool.clone());
    let response = controller.eliminar_ciudad(id).await?;
    Ok(Json(response))
}

async fn cambiar_estado_ciudad(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<ToggleResponse>, AppError> {
    let controller = CatalogoController::new(state.pool.clone());
    let response = controller.cambiar_estado_ciudad(id).await?;
    Ok(Json(response))
}

async fn listar_estados_obra(
    State(state): State<AppState>,
) -> Result<Json<Vec<EstadoObra>>, AppError> {
    let controller = CatalogoController::new(state.pool.clone());
    let response = controller.listar_estados().await?;
    Ok(Json(response))
}

async fn crear_estado_obra(
    State(state): State<AppState>,
    Extension(identidad): Extension<AuthenticatedUser>,
    Json(request): Json<GuardarEstadoObraRequest>,
) -> Result<Json<ApiResponse<EstadoObra>>, AppError> {
    let controller = CatalogoController::new(state.pool.clone());
    let response = controller.crear_estado(&identidad, request).await?;
    Ok(Json(response))
}

async fn actualizar_estado_obra(
    State(state): State<AppState>,
    Extension(identidad): Extension<AuthenticatedUser>,
    Path(id): Path<Uuid>,
    Json(request): Json<GuardarEstadoObraRequest>,
) -> Result<Json<ApiResponse<EstadoObra>>, AppError> {
    let controller = CatalogoController::new(state.pool.clone());
    let response = controller.actualizar_estado(&identidad, id, request).await?;
    Ok(Json(response))
}

async fn eliminar_estado_obra(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<()>>, AppError> {
    let controller = CatalogoController::new(state.pool.clone());
    let response = controller.eliminar_estado(id).await?;
    Ok(Json(response))
}

async fn cambiar_estado_estado_obra(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<ToggleResponse>, AppError> {
    let controller = CatalogoController::new(state.pool.clone());
    let response = controller.cambiar_estado_estado(id).await?;
    Ok(Json(response))
}
