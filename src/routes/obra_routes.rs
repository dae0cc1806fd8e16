use axum::{
    extract::{Path, State},
    routing::{delete, get, post, put},
    Extension, Json, Router,
};
use uuid::Uuid;

use crate::controllers::obra_controller::ObraController;
use crate::dto::obra_dto::{GuardarObraRequest, ObraResponse};
use crate::dto::usuario_dto::{ApiResponse, ToggleResponse};
use crate::middleware::identity::AuthenticatedUser;
use crate::models::obra::Obra;
use crate::state::AppState;
use crate::utils::errors::AppError;

pub fn create_obra_router() -> Router<AppState> {
    Router::new()
        .route("/", get(listar_obras))
        .route("/", post(crear_obra))
        .route("/:id", get(obtener_obra))
        .route("/:id", put(actualizar_obra))
        .route("/:id", delete(eliminar_obra))
        .route("/:id/toggle", post(cambiar_estado_obra))
}

async fn listar_obras(State(state): State<AppState>) -> Result<Json<Vec<ObraResponse>>, AppError> {
    let controller = ObraController::new(state.pool.clone());
    let response = controller.listar().await?;
    Ok(Json(response))
}

async fn obtener_obra(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<Obra>, AppError> {
    let controller = ObraController::new(state.pool.clone());
    let response = controller.obtener(id).await?;
    Ok(Json(response))
}

async fn crear_obra(
    State(state): State<AppState>,
    Extension(identidad): Extension<AuthenticatedUser>,
    Json(request): Json<GuardarObraRequest>,
) -> Result<Json<ApiResponse<Obra>>, AppError> {
    let controller = ObraController::new(state.pool.clone());
    let response = controller.crear(&identidad, request).await?;
    Ok(Json(response))
}

async fn actualizar_obra(
    State(state): State<AppState>,
    Extension(identidad): Extension<AuthenticatedUser>,
    Path(id): Path<Uuid>,
    Json(request): Json<GuardarObraRequest>,
) -> Result<Json<ApiResponse<Obra>>, AppError> {
    let controller = ObraController::new(state.pool.clone());
    let response = controller.actualizar(&identidad, id, request).await?;
    Ok(Json(response))
}

async fn eliminar_obra(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<()>>, AppError> {
    let controller = ObraController::new(state.pool.clone());
    let response = controller.eliminar(id).await?;
    Ok(Json(response))
}

async fn cambiar_estado_obra(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<ToggleResponse>, AppError> {
    let controller = ObraController::new(state.pool.clone());
    let response = controller.cambiar_estado(id).await?;
    Ok(Json(response))
}
