use axum::{
    extract::{Path, State},
    routing::{get, post, put},
    Extension, Json, Router,
};
use uuid::Uuid;

use crate::controllers::gasto_controller::GastoController;
use crate::dto::gasto_dto::{
    GastoResponse, GuardarCategoriaRequest, GuardarGastoRequest, GuardarProveedorRequest,
    GuardarTipoDocumentoRequest,
};
use crate::dto::usuario_dto::{ApiResponse, ToggleResponse};
use crate::middleware::identity::AuthenticatedUser;
use crate::models::gasto::{Categoria, Proveedor, TipoDocumento};
use crate::state::AppState;
use crate::utils::errors::AppError;

pub fn create_proveedor_router() -> Router<AppState> {
    Router::new()
        .route("/", get(listar_proveedores))
        .route("/", post(crear_proveedor))
        .route("/:id", put(actualizar_proveedor))
        .route("/:id/toggle", post(cambiar_estado_proveedor))
}

pub fn create_categoria_router() -> Router<AppState> {
    Router::new()
        .route("/", get(listar_categorias))
        .route("/", post(crear_categoria))
        .route("/:id", put(actualizar_categoria))
        .route("/:id/toggle", post(cambiar_estado_categoria))
}

pub fn create_tipo_documento_router() -> Router<AppState> {
    Router::new()
        .route("/", get(listar_tipos_documento))
        .route("/", post(crear_tipo_documento))
        .route("/:id", put(actualizar_tipo_documento))
        .route("/:id/toggle", post(cambiar_estado_tipo_documento))
}

pub fn create_gasto_router() -> Router<AppState> {
    Router::new()
        .route("/", get(listar_gastos))
        .route("/", post(crear_gasto))
        .route("/:id", get(obtener_gasto))
        .route("/:id", put(actualizar_gasto))
        .route("/:id/toggle", post(cambiar_estado_gasto))
}

async fn listar_proveedores(
    State(state): State<AppState>,
) -> Result<Json<Vec<Proveedor>>, AppError> {
    let controller = GastoController::new(state.pool.clone());
    let response = controller.listar_proveedores().await?;
    Ok(Json(response))
}

async fn crear_proveedor(
    State(state): State<AppState>,
    Extension(identidad): Extension<AuthenticatedUser>,
    Json(request): Json<GuardarProveedorRequest>,
) -> Result<Json<ApiResponse<Proveedor>>, AppError> {
    let controller = GastoController::new(state.pool.clone());
    let response = controller.crear_proveedor(&identidad, request).await?;
    Ok(Json(response))
}

async fn actualizar_proveedor(
    State(state): State<AppState>,
    Extension(identidad): Extension<AuthenticatedUser>,
    Path(id): Path<Uuid>,
    Json(request): Json<GuardarProveedorRequest>,
) -> Result<Json<ApiResponse<Proveedor>>, AppError> {
    let controller = GastoController::new(state.pool.clone());
    let response = controller.actualizar_proveedor(&identidad, id, request).await?;
    Ok(Json(response))
}

async fn cambiar_estado_proveedor(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<ToggleResponse>, AppError> {
    let controller = GastoController::new(state.pool.clone());
    let response = controller.cambiar_estado_proveedor(id).await?;
    Ok(Json(response))
}

async fn listar_categorias(
    State(state): State<AppState>,
) -> Result<Json<Vec<Categoria>>, AppError> {
    let controller = GastoController::new(state.pool.clone());
    let response = controller.listar_categorias().await?;
    Ok(Json(response))
}

async fn crear_categoria(
    State(state): State<AppState>,
    Extension(identidad): Extension<AuthenticatedUser>,
    Json(request): Json<GuardarCategoriaRequest>,
) -> Result<Json<ApiResponse<Categoria>>, AppError> {
    let controller = GastoController::new(state.pool.clone());
    let response = controller.crear_categoria(&identidad, request).await?;
    Ok(Json(response))
}

async fn actualizar_categoria(
    State(state): State<AppState>,
    Extension(identidad): Extension<AuthenticatedUser>,
    Path(id): Path<Uuid>,
    Json(request): Json<GuardarCategoriaRequest>,
) -> Result<Json<ApiResponse<Categoria>>, AppError> {
    let controller = GastoController::new(state.pool.clone());
    let response = controller.actualizar_categoria(&identidad, id, request).await?;
    Ok(Json(response))
}

async fn cambiar_estado_categoria(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<ToggleResponse>, AppError> {
    let controller = GastoController::new(state.pool.clone());
    let response = controller.cambiar_estado_categoria(id).await?;
    Ok(Json(response))
}

async fn listar_tipos_documento(
    State(state): State<AppState>,
) -> Result<Json<Vec<TipoDocumento>>, AppError> {
    let controller = GastoController::new(state.pool.clone());
    let response = controller.listar_tipos_documento().await?;
    Ok(Json(response))
}

async fn crear_tipo_documento(
    State(state): State<AppState>,
    Extension(identidad): Extension<AuthenticatedUser>,
    Json(request): Json<GuardarTipoDocumentoRequest>,
) -> Result<Json<ApiResponse<TipoDocumento>>, AppError> {
    let controller = GastoController::new(state.pool.clone());
    let response = controller.crear_tipo_documento(&identidad, request).await?;
    Ok(Json(response))
}

async fn actualizar_tipo_documento(
    State(state): State<AppState>,
    Extension(identidad): Extension<AuthenticatedUser>,
    Path(id): Path<Uuid>,
    Json(request): Json<GuardarTipoDocumentoRequest>,
) -> Result<Json<ApiResponse<TipoDocumento>>, AppError> {
    let controller = GastoController::new(state.pool.clone());
    let response = controller
        .actualizar_tipo_documento(&identidad, id, request)
        .await?;
    Ok(Json(response))
}

async fn cambiar_estado_tipo_documento(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<ToggleResponse>, AppError> {
    let controller = GastoController::new(state.pool.clone());
    let response = controller.cambiar_estado_tipo_documento(id).await?;
    Ok(Json(response))
}

async fn listar_gastos(
    State(state): State<AppState>,
) -> Result<Json<Vec<GastoResponse>>, AppError> {
    let controller = GastoController::new(state.pool.clone());
    let response = controller.listar_gastos().await?;
    Ok(Json(response))
}

async fn obtener_gasto(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<GastoResponse>, AppError> {
    let controller = GastoController::new(state.pool.clone());
    let response = controller.obtener_gasto(id).await?;
    Ok(Json(response))
}

async fn crear_gasto(
    State(state): State<AppState>,
    Extension(identidad): Extension<AuthenticatedUser>,
    Json(request): Json<GuardarGastoRequest>,
) -> Result<Json<ApiResponse<GastoResponse>>, AppError> {
    let controller = GastoController::new(state.pool.clone());
    let response = controller.crear_gasto(&identidad, request).await?;
    Ok(Json(response))
}

async fn actualizar_gasto(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(request): Json<GuardarGastoRequest>,
) -> Result<Json<ApiResponse<GastoResponse>>, AppError> {
    let controller = GastoController::new(state.pool.clone());
    let response = controller.actualizar_gasto(id, request).await?;
    Ok(Json(response))
}

async fn cambiar_estado_gasto(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<ToggleResponse>, AppError> {
    let controller = GastoController::new(state.pool.clone());
    let response = controller.cambiar_estado_gasto(id).await?;
    Ok(Json(response))
}
