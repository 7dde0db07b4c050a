//! HTTP API for promptlens website analysis.
//!
//! `promptlens-web` wraps a shared
//! [`AnalysisHandler`](promptlens::analysis::AnalysisHandler) in an axum
//! server. Each request is independent; the handler is shared through an
//! `Arc` with no locking.
//!
//! # Quick start
//!
//! ```ignore
//! use promptlens::prelude::*;
//! use promptlens_web::{WebConfig, spawn_web};
//! use std::sync::Arc;
//!
//! let client = AnthropicClient::new(api_key)?;
//! let handler = Arc::new(AnalysisHandler::new(Arc::new(client), AnalysisConfig::default()));
//!
//! let addr = spawn_web(handler, WebConfig::default()).await?;
//! println!("API: http://{addr}/api/analyze");
//! ```
//!
//! # Routes
//!
//! | Route | Response |
//! |-------|----------|
//! | `POST /api/analyze` | 200 + result, 400 bad input, 502 model failure, 500 unusable reply |
//! | `GET /api/health` | `{"status": "ok", "model": "..."}` |
//! | fallback | files from [`WebConfig::static_dir`], when set |
//!
//! Every error body is `{"error": "<message>"}`.

mod api;
mod server;

pub use api::{ApiError, ErrorBody};
pub use server::build_router;

use std::io;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;

use promptlens::analysis::AnalysisHandler;

/// Configuration for the web server.
pub struct WebConfig {
    /// Address to bind to. Default: `127.0.0.1:3001`.
    pub bind_addr: SocketAddr,
    /// Directory of static frontend files served for unmatched routes.
    ///
    /// If `None`, only the API is served.
    pub static_dir: Option<PathBuf>,
}

impl Default for WebConfig {
    fn default() -> Self {
        Self {
            bind_addr: SocketAddr::from(([127, 0, 0, 1], 3001)),
            static_dir: None,
        }
    }
}

/// Spawn the web server on a Tokio task and return the bound address.
///
/// The server runs until the Tokio runtime shuts down.
pub async fn spawn_web(handler: Arc<AnalysisHandler>, config: WebConfig) -> io::Result<SocketAddr> {
    let router = server::build_router(handler, config.static_dir);
    server::start_server(router, config.bind_addr).await
}
