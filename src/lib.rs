pub mod config;
pub mod controllers;
pub mod database;
pub mod dto;
pub mod middleware;
pub mod models;
pub mod repositories;
pub mod routes;
pub mod services;
pub mod state;
pub mod utils;

use anyhow::Result;
use axum::{middleware::from_fn_with_state, routing::get, Json, Router};
use dotenvy::dotenv;
use serde_json::json;
use std::net::SocketAddr;
use tokio::signal;
use tracing::{error, info};

use config::environment::EnvironmentConfig;
use middleware::cors::{cors_middleware, cors_middleware_with_origins};
use middleware::identity::identity_middleware;
use state::AppState;

/// Arma el router completo de la aplicación.
///
/// `/salud` queda fuera del middleware de identidad para que los
/// health checks no necesiten cabecera.
pub fn create_app(state: AppState) -> Router {
    let api = Router::new()
        .nest("/usuarios", routes::usuario_routes::create_usuario_router())
        .nest("/grupos", routes::usuario_routes::create_grupo_router())
        .nest("/paises", routes::catalogo_routes::create_pais_router())
        .nest("/ciudades", routes::catalogo_routes::create_ciudad_router())
        .nest(
            "/estados-obra",
            routes::catalogo_routes::create_estado_obra_router(),
        )
        .nest(
            "/proveedores",
            routes::gasto_routes::create_proveedor_router(),
        )
        .nest("/categorias", routes::gasto_routes::create_categoria_router())
        .nest(
            "/tipos-documento",
            routes::gasto_routes::create_tipo_documento_router(),
        )
        .nest("/gastos", routes::gasto_routes::create_gasto_router())
        .nest("/obras", routes::obra_routes::create_obra_router())
        .nest(
            "/registros",
            routes::registro_routes::create_registro_router(),
        )
        // route_layer: las rutas desconocidas responden 404, no 401
        .route_layer(from_fn_with_state(state.clone(), identity_middleware));

    let cors = if state.config.cors_origins.is_empty() {
        cors_middleware()
    } else {
        cors_middleware_with_origins(state.config.cors_origins.clone())
    };

    Router::new()
        .route("/salud", get(salud))
        .nest("/api", api)
        .layer(tower_http::trace::TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}

/// Arranca el servidor: entorno, logging, pool, migraciones y axum con
/// apagado graceful.
pub async fn run() -> Result<()> {
    dotenv().ok();

    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::INFO)
        .init();

    info!("🏗️ Urbix Backend - Libro de Obras");
    info!("==================================");

    let config = EnvironmentConfig::default();

    let pool = match database::create_pool(&config.database_url).await {
        Ok(pool) => pool,
        Err(e) => {
            error!("❌ Error conectando a la base de datos: {}", e);
            return Err(e);
        }
    };
    database::run_migrations(&pool).await?;
    info!("✅ Base de datos lista");

    let addr: SocketAddr = config.server_url().parse()?;
    let app = create_app(AppState::new(pool, config));

    info!("🌐 Servidor iniciando en http://{}", addr);
    info!("🔍 Superficie de la API:");
    info!("   GET  /salud - Health check");
    info!("   /api/usuarios, /api/grupos - Administración de usuarios");
    info!("   /api/paises, /api/ciudades, /api/estados-obra - Catálogos");
    info!("   /api/proveedores, /api/categorias, /api/tipos-documento - Catálogos de gastos");
    info!("   /api/gastos - Gastos");
    info!("   /api/obras - Obras");
    info!("   /api/registros - Registros de libro de obras");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("👋 Servidor terminado");
    Ok(())
}

async fn salud() -> Json<serde_json::Value> {
    Json(json!({
        "status": "ok",
        "service": "urbix-backend",
        "timestamp": chrono::Utc::now().to_rfc3339(),
    }))
}

/// Señal de apagado graceful
async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("🛑 Señal Ctrl+C recibida, apagando servidor...");
        },
        _ = terminate => {
            info!("🛑 Señal de terminación recibida, apagando servidor...");
        },
    }
}
