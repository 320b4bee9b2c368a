//! `verifarm serve` -- HTTP JSON API for the product registry.
//!
//! Serves the registry stored in one JSON file as an async HTTP service
//! using `axum` + `tokio`.
//!
//! Endpoints:
//! - GET  /api/health          - Fixed operational status
//! - GET  /api/products        - All products, stored order
//! - GET  /api/products/{id}   - One product, case-insensitive id
//! - POST /api/products        - Register a product from {name, farm, harvestDate}
//!
//! All responses use Content-Type: application/json. CORS is permissive.

mod handlers;
mod middleware;
mod state;

use std::path::PathBuf;
use std::sync::Arc;

use axum::extract::DefaultBodyLimit;
use axum::http::{Method, StatusCode};
use axum::response::IntoResponse;
use axum::routing::get;
use axum::{middleware as axum_middleware, Json, Router};
use tower_http::cors::{Any, CorsLayer};
use verifarm_storage::{BootstrapOutcome, JsonFileStore, ProductStore};

use self::handlers::{
    handle_create_product, handle_get_product, handle_health, handle_list_products,
    handle_not_found,
};
use self::middleware::log_requests;
use self::state::AppState;

/// Port used when neither `--port` nor `PORT` is given.
pub(crate) const DEFAULT_PORT: u16 = 3001;

/// Registry file used when neither `--data` nor `VERIFARM_DATA` is given.
pub(crate) const DEFAULT_DATA_FILE: &str = "products.json";

/// Maximum request body size: 1 MB.
const MAX_BODY_SIZE: usize = 1024 * 1024;

/// Construct a JSON error response with the given status code and message.
fn json_error(status: StatusCode, message: &str) -> impl IntoResponse {
    (status, Json(serde_json::json!({"error": message})))
}

/// Resolved settings for one server run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct ServeConfig {
    pub(crate) port: u16,
    pub(crate) data_path: PathBuf,
}

impl ServeConfig {
    /// Flags win over environment variables, which win over defaults.
    ///
    /// - port: `--port`, then `PORT`, then 3001
    /// - data file: `--data`, then `VERIFARM_DATA`, then `products.json`
    pub(crate) fn resolve(port: Option<u16>, data: Option<PathBuf>) -> Result<Self, String> {
        let port = match port {
            Some(p) => p,
            None => match std::env::var("PORT").ok().filter(|v| !v.is_empty()) {
                Some(v) => v
                    .parse::<u16>()
                    .map_err(|_| format!("invalid PORT value '{}'", v))?,
                None => DEFAULT_PORT,
            },
        };

        let data_path = data
            .or_else(|| {
                std::env::var("VERIFARM_DATA")
                    .ok()
                    .filter(|v| !v.is_empty())
                    .map(PathBuf::from)
            })
            .unwrap_or_else(|| PathBuf::from(DEFAULT_DATA_FILE));

        Ok(Self { port, data_path })
    }
}

/// Assemble the router over `state`.
pub(crate) fn build_router(state: Arc<AppState>) -> Router {
    // CORS: permissive, the tracker page may be served from anywhere
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST])
        .allow_headers(Any);

    Router::new()
        .route("/api/health", get(handle_health))
        .route(
            "/api/products",
            get(handle_list_products).post(handle_create_product),
        )
        .route("/api/products/{id}", get(handle_get_product))
        .fallback(handle_not_found)
        .layer(axum_middleware::from_fn(log_requests))
        .layer(cors)
        .layer(DefaultBodyLimit::max(MAX_BODY_SIZE))
        .with_state(state)
}

/// Bootstrap the registry file and serve the API until Ctrl+C.
pub async fn start_server(config: ServeConfig) -> Result<(), Box<dyn std::error::Error>> {
    let store = JsonFileStore::new(config.data_path.clone());

    match store.bootstrap().await? {
        BootstrapOutcome::Seeded { count } => tracing::info!(
            path = %config.data_path.display(),
            count,
            "registry seeded with demo products"
        ),
        BootstrapOutcome::Existing { count } => tracing::info!(
            path = %config.data_path.display(),
            count,
            "registry loaded"
        ),
    }

    let state = Arc::new(AppState::new(Arc::new(store)));
    let app = build_router(state);

    let addr = format!("0.0.0.0:{}", config.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!("VeriFarm registry listening on http://0.0.0.0:{}", config.port);
    tracing::info!("API health: http://localhost:{}/api/health", config.port);
    tracing::info!("Products API: http://localhost:{}/api/products", config.port);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("server shut down");
    Ok(())
}

/// Wait for a shutdown signal (Ctrl+C).
async fn shutdown_signal() {
    match tokio::signal::ctrl_c().await {
        Ok(()) => tracing::info!("received shutdown signal"),
        Err(e) => {
            // Without a signal handler the server runs until killed.
            tracing::error!(error = %e, "failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
    }
}
