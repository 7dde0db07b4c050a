//! Axum server setup and router construction.

use std::io;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;

use axum::Router;
use axum::routing::{get, post};
use promptlens::analysis::AnalysisHandler;
use tower_http::cors::{Any, CorsLayer};
use tower_http::services::ServeDir;
use tracing::{error, info};

use crate::api::{self, AppState};

/// Build the full axum router.
///
/// The router serves:
/// - REST API at `/api/*`
/// - Optional static files for a frontend build
pub fn build_router(handler: Arc<AnalysisHandler>, static_dir: Option<PathBuf>) -> Router {
    let app_state = AppState { handler };

    // Browser frontends are usually served from a different origin in development.
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let mut router = Router::new()
        .route("/api/analyze", post(api::post_analyze))
        .route("/api/health", get(api::get_health))
        .with_state(app_state)
        .layer(cors);

    if let Some(dir) = static_dir {
        info!("serving static files from {}", dir.display());
        router = router.fallback_service(ServeDir::new(dir));
    }

    router
}

/// Bind, spawn the server on a Tokio task, and return the bound address.
pub async fn start_server(router: Router, bind_addr: SocketAddr) -> io::Result<SocketAddr> {
    let listener = tokio::net::TcpListener::bind(bind_addr).await?;
    let addr = listener.local_addr()?;

    tokio::spawn(async move {
        if let Err(e) = axum::serve(listener, router).await {
            error!("server on {addr} stopped: {e}");
        }
    });

    Ok(addr)
}
