//! Route configuration and setup.
//!
//! The upload endpoint and health checks; health handlers live in [health](health).

mod health;

use crate::error::{json_payload_too_large, panic_response};
use crate::handlers::vegetable_upload::{method_not_allowed, upload_vegetable_data};
use crate::state::AppState;
use axum::{
    extract::DefaultBodyLimit,
    http::{HeaderValue, Method, StatusCode},
    middleware::map_response,
    routing::{get, post, MethodRouter},
    Router,
};
use harvest_core::{Config, StorageBackend};
use std::sync::Arc;
use tower_http::catch_panic::CatchPanicLayer;
use tower_http::cors::{Any, CorsLayer};
use tower_http::limit::RequestBodyLimitLayer;
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;

pub const UPLOAD_PATH: &str = "/uploadVegetableData";
pub const LOCAL_BLOBS_PATH: &str = "/blobs";

/// Setup all application routes
pub fn setup_routes(config: &Config, state: Arc<AppState>) -> Result<Router<()>, anyhow::Error> {
    let cors = setup_cors(config)?;

    tracing::info!(
        max_body_size_bytes = config.max_body_size_bytes,
        "Request body limit enabled"
    );

    let mut app = Router::new()
        .route(UPLOAD_PATH, upload_route())
        .route("/", upload_route())
        .route("/health", get(health::liveness_check))
        .route("/health/ready", get(health::readiness_check));

    if config.storage_backend == StorageBackend::Local {
        if let Some(path) = &config.local_storage_path {
            tracing::info!(path = %path, route = LOCAL_BLOBS_PATH, "Serving local blobs");
            app = app.nest_service(LOCAL_BLOBS_PATH, ServeDir::new(path));
        }
    }

    let app = app
        .layer(RequestBodyLimitLayer::new(config.max_body_size_bytes))
        .layer(map_response(json_payload_too_large))
        .layer(DefaultBodyLimit::disable())
        .layer(CatchPanicLayer::custom(panic_response))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state);

    Ok(app)
}

/// POST runs the pipeline; OPTIONS without preflight headers gets an empty 204;
/// every other method gets 405.
fn upload_route() -> MethodRouter<Arc<AppState>> {
    post(upload_vegetable_data)
        .options(|| async { StatusCode::NO_CONTENT })
        .fallback(method_not_allowed)
}

fn setup_cors(config: &Config) -> Result<CorsLayer, anyhow::Error> {
    let cors = if config.cors_origins.iter().any(|o| o == "*") {
        if config.is_production() {
            tracing::warn!("CORS configured to allow all origins in production");
        }
        CorsLayer::new()
            .allow_origin(Any)
            .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
            .allow_headers(Any)
    } else {
        let origins = config
            .cors_origins
            .iter()
            .map(|o| o.parse::<HeaderValue>())
            .collect::<Result<Vec<_>, _>>()
            .map_err(|e| anyhow::anyhow!("Invalid CORS origin: {}", e))?;
        CorsLayer::new()
            .allow_origin(origins)
            .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
            .allow_headers(Any)
    };
    Ok(cors)
}
