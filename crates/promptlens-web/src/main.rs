//! promptlens HTTP API server.
//!
//! # Usage
//!
//! ```bash
//! ANTHROPIC_API_KEY=sk-ant-... cargo run -p promptlens-web
//! ANTHROPIC_API_KEY=sk-ant-... cargo run -p promptlens-web -- --port 8080
//! ANTHROPIC_API_KEY=sk-ant-... cargo run -p promptlens-web -- --static-dir ./web/out
//! ```
//!
//! Then:
//!
//! ```bash
//! curl -s localhost:3001/api/analyze \
//!   -H 'content-type: application/json' \
//!   -d '{"type": "url", "value": "https://stripe.com"}'
//! ```

use std::net::IpAddr;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use clap::Parser;
use promptlens::analysis::{AnalysisConfig, AnalysisHandler};
use promptlens::anthropic::{ANTHROPIC_BASE_URL, AnthropicClient, ClientConfig};
use promptlens::{DEFAULT_MAX_TOKENS, DEFAULT_MODEL, logging};
use promptlens_web::{WebConfig, spawn_web};
use tracing::info;

/// Serve website analyses over HTTP.
#[derive(Parser)]
#[command(about = "HTTP API server for promptlens website analysis")]
struct Args {
    /// Anthropic API key.
    #[arg(long, env = "ANTHROPIC_API_KEY", hide_env_values = true)]
    api_key: String,

    /// Model used for every analysis.
    #[arg(long, env = "PROMPTLENS_MODEL", default_value = DEFAULT_MODEL)]
    model: String,

    /// Maximum output tokens per model call.
    #[arg(long, env = "PROMPTLENS_MAX_TOKENS", default_value_t = DEFAULT_MAX_TOKENS)]
    max_tokens: u32,

    /// Deadline for each model call, in seconds.
    #[arg(
        long,
        env = "PROMPTLENS_TIMEOUT_SECS",
        default_value_t = 120,
        value_parser = clap::value_parser!(u64).range(1..)
    )]
    timeout_secs: u64,

    /// API base URL.
    #[arg(long, env = "ANTHROPIC_BASE_URL", default_value = ANTHROPIC_BASE_URL)]
    base_url: String,

    /// Interface to bind.
    #[arg(long, default_value = "127.0.0.1")]
    host: IpAddr,

    /// Port to listen on.
    #[arg(long, env = "PROMPTLENS_PORT", default_value_t = 3001)]
    port: u16,

    /// Serve static frontend files from this directory.
    #[arg(long)]
    static_dir: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<(), String> {
    let _ = dotenv::dotenv();
    let args = Args::parse();
    logging::init(logging::DEFAULT_DIRECTIVES)?;

    let timeout = Duration::from_secs(args.timeout_secs);
    let client = AnthropicClient::with_config(
        ClientConfig::new(args.api_key)
            .with_base_url(args.base_url)
            .with_timeout(timeout),
    )
    .map_err(|e| e.to_string())?;

    let config = AnalysisConfig::default()
        .with_model(args.model)
        .with_max_tokens(args.max_tokens)
        .with_timeout(timeout);
    let handler = Arc::new(AnalysisHandler::new(Arc::new(client), config));

    let web_config = WebConfig {
        bind_addr: (args.host, args.port).into(),
        static_dir: args.static_dir,
    };
    let addr = spawn_web(handler, web_config)
        .await
        .map_err(|e| format!("failed to bind: {e}"))?;
    info!("listening on http://{addr}");

    tokio::signal::ctrl_c()
        .await
        .map_err(|e| format!("failed to wait for shutdown signal: {e}"))?;
    info!("shutting down");
    Ok(())
}
