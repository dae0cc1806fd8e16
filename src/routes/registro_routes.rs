use axum::{
    extract::{Path, State},
    routing::{delete, get, post, put},
    Extension, Json, Router,
};
use uuid::Uuid;

use crate::controllers::registro_controller::RegistroController;
use crate::dto::registro_dto::{GuardarRegistroRequest, RegistroResponse};
use crate::dto::usuario_dto::ApiResponse;
use crate::middleware::identity::AuthenticatedUser;
use crate::state::AppState;
use crate::utils::errors::AppError;

pub fn create_registro_router() -> Router<AppState> {
    Router::new()
        .route("/", get(listar_registros))
        .route("/", post(crear_registro))
        .route("/:id", get(obtener_registro))
        .route("/:id", put(actualizar_registro))
        .route("/:id", delete(eliminar_registro))
        .route("/fotografias/:id", delete(eliminar_fotografia))
}

async fn listar_registros(
    State(state): State<AppState>,
) -> Result<Json<Vec<RegistroResponse>>, AppError> {
    let controller = RegistroController::new(state.pool.clone());
    let response = controller.listar().await?;
    Ok(Json(response))
}

async fn obtener_registro(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<RegistroResponse>, AppError> {
    let controller = RegistroController::new(state.pool.clone());
    let response = controller.obtener(id).await?;
    Ok(Json(response))
}

async fn crear_registro(
    State(state): State<AppState>,
    Extension(identidad): Extension<AuthenticatedUser>,
    Json(request): Json<GuardarRegistroRequest>,
) -> Result<Json<ApiResponse<RegistroResponse>>, AppError> {
    let controller = RegistroController::new(state.pool.clone());
    let response = controller.crear(&identidad, request).await?;
    Ok(Json(response))
}

async fn actualizar_registro(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(request): Json<GuardarRegistroRequest>,
) -> Result<Json<ApiResponse<RegistroResponse>>, AppError> {
    let controller = RegistroController::new(state.pool.clone());
    let response = controller.actualizar(id, request).await?;
    Ok(Json(response))
}

async fn eliminar_registro(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<()>>, AppError> {
    let controller = RegistroController::new(state.pool.clone());
    let response = controller.eliminar(id).await?;
    Ok(Json(response))
}

async fn eliminar_fotografia(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<Uuid>>, AppError> {
    let controller = RegistroController::new(state.pool.clone());
    let response = controller.eliminar_fotografia(id).await?;
    Ok(Json(response))
}
