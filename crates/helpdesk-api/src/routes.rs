//! Router setup with all API routes and middleware.

use std::any::Any;

use axum::extract::DefaultBodyLimit;
use axum::http::HeaderValue;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::Router;
use tower_http::catch_panic::CatchPanicLayer;
use tower_http::compression::CompressionLayer;
use tower_http::cors::{AllowHeaders, AllowMethods, AllowOrigin, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::{error, info, warn};

use helpdesk_core::config::HelpdeskConfig;
use helpdesk_core::error::HelpdeskError;

use crate::error::ApiError;
use crate::handlers;
use crate::state::AppState;

/// Maximum accepted request body size.
const BODY_LIMIT_BYTES: usize = 1024 * 1024;

/// Create the axum Router with all routes and middleware.
pub fn create_router(state: AppState) -> Router {
    let origins = state.config.general.cors_origins.clone();

    let routes = Router::new()
        .route("/", get(handlers::root))
        .route("/api/health", get(handlers::health))
        .route("/api/chat", post(handlers::chat))
        .route("/api/chat/history/{session_id}", get(handlers::history))
        .route("/api/chat/sessions", get(handlers::sessions))
        .with_state(state);

    with_middleware(routes, &origins)
}

/// Wrap `router` in the standard middleware stack.
///
/// Origins that are not valid header values are skipped with a warning.
pub fn with_middleware(router: Router, cors_origins: &[String]) -> Router {
    let origins: Vec<HeaderValue> = cors_origins
        .iter()
        .filter_map(|origin| match origin.parse::<HeaderValue>() {
            Ok(value) => Some(value),
            Err(e) => {
                warn!(origin = %origin, error = %e, "Ignoring invalid CORS origin");
                None
            }
        })
        .collect();

    let cors = CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_methods(AllowMethods::mirror_request())
        .allow_headers(AllowHeaders::mirror_request())
        .allow_credentials(true);

    router
        .layer(DefaultBodyLimit::max(BODY_LIMIT_BYTES))
        .layer(CatchPanicLayer::custom(handle_panic))
        .layer(CompressionLayer::new())
        .layer(TraceLayer::new_for_http())
        .layer(cors)
}

/// Convert a handler panic into a generic JSON 500.
fn handle_panic(err: Box<dyn Any + Send + 'static>) -> Response {
    let detail = if let Some(s) = err.downcast_ref::<String>() {
        s.clone()
    } else if let Some(s) = err.downcast_ref::<&str>() {
        s.to_string()
    } else {
        "unknown panic".to_string()
    };
    error!(panic = %detail, "Request handler panicked");

    ApiError::Internal("Internal server error".to_string()).into_response()
}

/// Start the HTTP server on the configured host and port.
pub async fn start_server(config: &HelpdeskConfig, state: AppState) -> Result<(), HelpdeskError> {
    let addr = format!("{}:{}", config.general.host, config.general.port);
    let start_time = state.start_time;

    let router = create_router(state);

    info!("Starting API server on {}", addr);

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .map_err(|e| HelpdeskError::Api(format!("Failed to bind {}: {}", addr, e)))?;

    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(|e| HelpdeskError::Api(format!("Server error: {}", e)))?;

    info!(uptime_secs = start_time.elapsed().as_secs(), "API server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        error!(error = %e, "Failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received");
}
