//! Lifecycle events emitted by the [`AnalysisHandler`](super::AnalysisHandler).
//!
//! Callers implement [`EventHandler`] to observe an analysis as it moves
//! from validation through the model call to the normalized result.
//!
//! # Choosing an event handler
//!
//! | Handler | Use case |
//! |---------|----------|
//! | [`NoopHandler`] | Tests or silent runs |
//! | [`LoggingHandler`] | Structured logging via `tracing` (the default) |
//! | [`FnEventHandler`] | Quick closures for simple callbacks |
//! | [`CompositeEventHandler`] | Compose multiple handlers in order |

use std::time::Duration;

use tracing::{debug, error, info, warn};

use super::request::InputKind;
use crate::error::{AnalysisError, ErrorClass};
use crate::model::Usage;

/// Events emitted during one analysis.
#[derive(Debug)]
pub enum AnalysisEvent<'a> {
    /// Input passed validation.
    Validated {
        request_id: &'a str,
        kind: InputKind,
    },
    /// The prompt pair was built.
    PromptComposed {
        request_id: &'a str,
        system_chars: usize,
        user_chars: usize,
    },
    /// The model call is about to be sent.
    ModelCallStarted {
        request_id: &'a str,
        model: &'a str,
        max_tokens: u32,
    },
    /// The model call returned a reply.
    ModelReplied {
        request_id: &'a str,
        usage: Option<Usage>,
        blocks: usize,
        text_blocks: usize,
        elapsed: Duration,
    },
    /// The reply text is being normalized.
    Normalizing { request_id: &'a str, raw_len: usize },
    /// The analysis succeeded.
    Completed {
        request_id: &'a str,
        elapsed: Duration,
    },
    /// The analysis failed.
    Failed {
        request_id: &'a str,
        error: &'a AnalysisError,
    },
}

impl AnalysisEvent<'_> {
    /// Short, stable name for the event variant.
    pub fn name(&self) -> &'static str {
        match self {
            AnalysisEvent::Validated { .. } => "validated",
            AnalysisEvent::PromptComposed { .. } => "prompt_composed",
            AnalysisEvent::ModelCallStarted { .. } => "model_call_started",
            AnalysisEvent::ModelReplied { .. } => "model_replied",
            AnalysisEvent::Normalizing { .. } => "normalizing",
            AnalysisEvent::Completed { .. } => "completed",
            AnalysisEvent::Failed { .. } => "failed",
        }
    }

    pub fn request_id(&self) -> &str {
        match self {
            AnalysisEvent::Validated { request_id, .. }
            | AnalysisEvent::PromptComposed { request_id, .. }
            | AnalysisEvent::ModelCallStarted { request_id, .. }
            | AnalysisEvent::ModelReplied { request_id, .. }
            | AnalysisEvent::Normalizing { request_id, .. }
            | AnalysisEvent::Completed { request_id, .. }
            | AnalysisEvent::Failed { request_id, .. } => request_id,
        }
    }
}

/// Handler for analysis events.
///
/// The default implementation ignores every event.
pub trait EventHandler: Send + Sync {
    fn on_event(&self, event: &AnalysisEvent<'_>) {
        let _ = event;
    }
}

/// A no-op event handler.
pub struct NoopHandler;
impl EventHandler for NoopHandler {}

/// An event handler backed by a closure.
///
/// # Example
///
/// ```ignore
/// let handler = FnEventHandler::new(|event| {
///     println!("{}: {}", event.request_id(), event.name());
/// });
/// ```
pub struct FnEventHandler<F>(F)
where
    F: Fn(&AnalysisEvent<'_>) + Send + Sync;

impl<F> FnEventHandler<F>
where
    F: Fn(&AnalysisEvent<'_>) + Send + Sync,
{
    pub fn new(f: F) -> Self {
        Self(f)
    }
}

impl<F> EventHandler for FnEventHandler<F>
where
    F: Fn(&AnalysisEvent<'_>) + Send + Sync,
{
    fn on_event(&self, event: &AnalysisEvent<'_>) {
        (self.0)(event)
    }
}

/// An event handler that delegates to multiple inner handlers, in order.
///
/// # Example
///
/// ```ignore
/// let handler = CompositeEventHandler::new()
///     .with(LoggingHandler)
///     .with(my_metrics_handler);
/// ```
pub struct CompositeEventHandler {
    handlers: Vec<Box<dyn EventHandler>>,
}

impl CompositeEventHandler {
    pub fn new() -> Self {
        Self {
            handlers: Vec::new(),
        }
    }

    /// Add a handler to the chain. Handlers are called in registration order.
    pub fn with(mut self, handler: impl EventHandler + 'static) -> Self {
        self.handlers.push(Box::new(handler));
        self
    }

    /// Conditionally add a handler to the chain.
    pub fn with_if(self, condition: bool, handler: impl EventHandler + 'static) -> Self {
        if condition { self.with(handler) } else { self }
    }
}

impl Default for CompositeEventHandler {
    fn default() -> Self {
        Self::new()
    }
}

impl EventHandler for CompositeEventHandler {
    fn on_event(&self, event: &AnalysisEvent<'_>) {
        for handler in &self.handlers {
            handler.on_event(event);
        }
    }
}

/// Logs every event through `tracing`.
pub struct LoggingHandler;

impl EventHandler for LoggingHandler {
    fn on_event(&self, event: &AnalysisEvent<'_>) {
        match event {
            AnalysisEvent::Validated { request_id, kind } => {
                info!("[{request_id}] analysis requested ({kind})");
            }
            AnalysisEvent::PromptComposed {
                request_id,
                system_chars,
                user_chars,
            } => {
                debug!("[{request_id}] prompt composed: system={system_chars} chars, user={user_chars} chars");
            }
            AnalysisEvent::ModelCallStarted {
                request_id,
                model,
                max_tokens,
            } => {
                debug!("[{request_id}] calling {model} (max_tokens={max_tokens})");
            }
            AnalysisEvent::ModelReplied {
                request_id,
                usage,
                blocks,
                text_blocks,
                elapsed,
            } => {
                let (input, output) = usage.map_or((0, 0), |u| (u.input_tokens, u.output_tokens));
                info!(
                    "[{request_id}] model replied in {:.1}s: {blocks} block(s), {text_blocks} text, tokens in={input} out={output}",
                    elapsed.as_secs_f64()
                );
            }
            AnalysisEvent::Normalizing {
                request_id,
                raw_len,
            } => {
                debug!("[{request_id}] normalizing {raw_len} chars of model text");
            }
            AnalysisEvent::Completed {
                request_id,
                elapsed,
            } => {
                info!(
                    "[{request_id}] analysis completed in {:.1}s",
                    elapsed.as_secs_f64()
                );
            }
            AnalysisEvent::Failed { request_id, error } => match error.class() {
                ErrorClass::InvalidInput => warn!("[{request_id}] rejected: {error}"),
                ErrorClass::Upstream => error!("[{request_id}] upstream failure: {error}"),
                ErrorClass::Internal => error!("[{request_id}] analysis failed: {error}"),
            },
        }
    }
}
