//! Analyze a website URL or description and print the reconstructed prompts.
//!
//! Reads the API key from the `ANTHROPIC_API_KEY` environment variable
//! (a `.env` file in the working directory is honored).
//!
//! # Examples
//!
//! ```sh
//! # Analyze a live site, print the JSON result
//! promptlens --url https://linear.app
//!
//! # Describe a site instead
//! promptlens --description "a calm fintech dashboard with dense tables"
//!
//! # Pipe a long description from stdin and print a readable summary
//! cat brief.md | promptlens --stdin --summary
//! ```
//!
//! Exit codes: 0 success, 2 invalid input, 3 model call failed,
//! 4 unusable model reply.

use std::fmt::Write as _;
use std::io::{self, Read};
use std::process;
use std::sync::Arc;
use std::time::Duration;

use clap::{ArgGroup, Parser};
use promptlens::analysis::{AnalysisConfig, AnalysisHandler, AnalysisInput, AnalysisResult, style};
use promptlens::anthropic::{ANTHROPIC_BASE_URL, AnthropicClient, ClientConfig};
use promptlens::error::{AnalysisError, ErrorClass};
use promptlens::{DEFAULT_MAX_TOKENS, DEFAULT_MODEL, logging};
use tracing::debug;

/// Reverse-engineer a website into the prompts that likely built it.
#[derive(Parser)]
#[command(name = "promptlens", version)]
#[command(group(ArgGroup::new("input").required(true).args(["url", "description", "stdin"])))]
struct Cli {
    // ── Input ──────────────────────────────────────────────────
    /// Website URL to analyze
    #[arg(long)]
    url: Option<String>,

    /// Free-text description of a website
    #[arg(long)]
    description: Option<String>,

    /// Read the description from stdin
    #[arg(long)]
    stdin: bool,

    // ── Model ──────────────────────────────────────────────────
    /// Anthropic API key
    #[arg(long, env = "ANTHROPIC_API_KEY", hide_env_values = true)]
    api_key: String,

    /// Model identifier
    #[arg(long, env = "PROMPTLENS_MODEL", default_value = DEFAULT_MODEL)]
    model: String,

    /// Maximum output tokens for the model call
    #[arg(long, env = "PROMPTLENS_MAX_TOKENS", default_value_t = DEFAULT_MAX_TOKENS)]
    max_tokens: u32,

    /// Deadline for the model call, in seconds
    #[arg(
        long,
        env = "PROMPTLENS_TIMEOUT_SECS",
        default_value_t = 120,
        value_parser = clap::value_parser!(u64).range(1..)
    )]
    timeout_secs: u64,

    /// API base URL
    #[arg(long, env = "ANTHROPIC_BASE_URL", default_value = ANTHROPIC_BASE_URL)]
    base_url: String,

    // ── Output ─────────────────────────────────────────────────
    /// Print a human-readable summary instead of JSON
    #[arg(long)]
    summary: bool,
}

impl Cli {
    fn input(&self) -> Result<AnalysisInput, String> {
        if let Some(url) = &self.url {
            return Ok(AnalysisInput::new("url", url.as_str()));
        }
        if let Some(description) = &self.description {
            return Ok(AnalysisInput::new("description", description.as_str()));
        }
        let mut buf = String::new();
        io::stdin()
            .read_to_string(&mut buf)
            .map_err(|e| format!("failed to read stdin: {e}"))?;
        Ok(AnalysisInput::new("description", buf))
    }
}

/// Confidence, style DNA annotated from the catalog, and the core intent.
fn render_summary(result: &AnalysisResult) -> String {
    let mut out = String::new();
    let confidence = result.confidence().map_or("Unknown", |c| c.as_str());
    let _ = writeln!(out, "Confidence: {confidence} ({})", result.confidence_level);

    let _ = writeln!(out, "\nStyle DNA:");
    for name in &result.style_dna {
        match style::lookup(name) {
            Some(t) => {
                let _ = writeln!(out, "  - {name}: {} [{}]", t.description, t.category);
            }
            None => {
                let _ = writeln!(out, "  - {name}");
            }
        }
    }

    let _ = writeln!(out, "\nCore intent:\n{}", result.core_intent_prompt);
    let _ = writeln!(out, "\nComponents:");
    for (name, prompt) in result.component_prompts.iter() {
        let _ = writeln!(out, "  {name}: {prompt}");
    }
    if !result.assumptions.is_empty() {
        let _ = writeln!(out, "\nAssumptions:\n{}", result.assumptions);
    }
    out
}

async fn run(cli: &Cli) -> Result<AnalysisResult, AnalysisError> {
    let input = cli.input().map_err(AnalysisError::InvalidInput)?;

    let timeout = Duration::from_secs(cli.timeout_secs);
    let client = AnthropicClient::with_config(
        ClientConfig::new(cli.api_key.as_str())
            .with_base_url(cli.base_url.as_str())
            .with_timeout(timeout),
    )?;
    debug!("posting to {}", client.endpoint());

    let config = AnalysisConfig::default()
        .with_model(cli.model.as_str())
        .with_max_tokens(cli.max_tokens)
        .with_timeout(timeout);
    let handler = AnalysisHandler::new(Arc::new(client), config);

    handler.analyze(input).await
}

#[tokio::main]
async fn main() {
    let _ = dotenv::dotenv();
    let cli = Cli::parse();
    if let Err(e) = logging::init(logging::DEFAULT_DIRECTIVES) {
        eprintln!("Warning: {e}");
    }

    let result = match run(&cli).await {
        Ok(result) => result,
        Err(e) => {
            eprintln!("Error: {e}");
            process::exit(e.class().exit_code());
        }
    };

    if cli.summary {
        print!("{}", render_summary(&result));
    } else {
        match serde_json::to_string_pretty(&result) {
            Ok(json) => println!("{json}"),
            Err(e) => {
                eprintln!("Error: failed to encode result: {e}");
                process::exit(ErrorClass::Internal.exit_code());
            }
        }
    }
}
