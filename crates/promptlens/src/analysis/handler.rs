//! The request handler: validate, compose, call the model once, normalize.

use std::sync::Arc;
use std::time::Instant;

use tracing::{debug, error};

use super::composer;
use super::config::AnalysisConfig;
use super::events::{AnalysisEvent, EventHandler, LoggingHandler};
use super::normalizer::ResponseNormalizer;
use super::request::{AnalysisInput, AnalysisRequest};
use super::result::AnalysisResult;
use crate::error::AnalysisError;
use crate::model::{CompletionRequest, ModelError, ModelReply, TextModel};
use crate::trace;

/// Runs analyses against a [`TextModel`].
///
/// Holds only immutable state, so one handler can be wrapped in an `Arc`
/// and shared by every request task.
///
/// # Example
///
/// ```ignore
/// let client = AnthropicClient::new(api_key)?;
/// let handler = AnalysisHandler::new(Arc::new(client), AnalysisConfig::default());
///
/// let result = handler
///     .analyze(AnalysisInput::new("url", "https://stripe.com"))
///     .await?;
/// println!("{}", result.core_intent_prompt);
/// ```
pub struct AnalysisHandler {
    model: Arc<dyn TextModel>,
    config: AnalysisConfig,
    normalizer: ResponseNormalizer,
    events: Box<dyn EventHandler>,
}

impl AnalysisHandler {
    /// Create a handler that logs its lifecycle through [`LoggingHandler`].
    pub fn new(model: Arc<dyn TextModel>, config: AnalysisConfig) -> Self {
        Self {
            model,
            config,
            normalizer: ResponseNormalizer::new(),
            events: Box::new(LoggingHandler),
        }
    }

    /// Replace the event handler.
    pub fn with_event_handler(mut self, events: impl EventHandler + 'static) -> Self {
        self.events = Box::new(events);
        self
    }

    pub fn config(&self) -> &AnalysisConfig {
        &self.config
    }

    /// Validate raw input and run the analysis.
    ///
    /// Invalid input is rejected before the model is contacted.
    pub async fn analyze(&self, input: AnalysisInput) -> Result<AnalysisResult, AnalysisError> {
        let request_id = trace::generate_request_id();
        match input.validate() {
            Ok(request) => self.run(&request_id, &request).await,
            Err(e) => {
                self.emit(AnalysisEvent::Failed {
                    request_id: &request_id,
                    error: &e,
                });
                Err(e)
            }
        }
    }

    /// Run the analysis for an already-validated request.
    pub async fn analyze_request(
        &self,
        request: &AnalysisRequest,
    ) -> Result<AnalysisResult, AnalysisError> {
        let request_id = trace::generate_request_id();
        self.run(&request_id, request).await
    }

    async fn run(
        &self,
        request_id: &str,
        request: &AnalysisRequest,
    ) -> Result<AnalysisResult, AnalysisError> {
        let started = Instant::now();
        let outcome = self.pipeline(request_id, request).await;
        match &outcome {
            Ok(_) => self.emit(AnalysisEvent::Completed {
                request_id,
                elapsed: started.elapsed(),
            }),
            Err(e) => {
                if let AnalysisError::UnparsableResponse(parse) = e {
                    error!(
                        "[{request_id}] {}; raw model text:\n{}",
                        parse.reason(),
                        parse.raw()
                    );
                }
                self.emit(AnalysisEvent::Failed {
                    request_id,
                    error: e,
                });
            }
        }
        outcome
    }

    async fn pipeline(
        &self,
        request_id: &str,
        request: &AnalysisRequest,
    ) -> Result<AnalysisResult, AnalysisError> {
        self.emit(AnalysisEvent::Validated {
            request_id,
            kind: request.kind(),
        });

        let prompts = composer::compose(request);
        self.emit(AnalysisEvent::PromptComposed {
            request_id,
            system_chars: prompts.system.len(),
            user_chars: prompts.user.len(),
        });

        let completion = CompletionRequest {
            model: self.config.model.clone(),
            system: prompts.system,
            user: prompts.user,
            max_tokens: self.config.max_tokens,
        };
        self.emit(AnalysisEvent::ModelCallStarted {
            request_id,
            model: &completion.model,
            max_tokens: completion.max_tokens,
        });

        let call_started = Instant::now();
        let reply = self.call_model(&completion).await?;
        let text_blocks = reply.text_block_count();
        self.emit(AnalysisEvent::ModelReplied {
            request_id,
            usage: reply.usage,
            blocks: reply.content.len(),
            text_blocks,
            elapsed: call_started.elapsed(),
        });
        if let Some(usage) = &reply.usage {
            let model = reply.model.as_deref().unwrap_or(&completion.model);
            debug!(
                "[{request_id}] est. cost ${:.4} ({} tokens)",
                trace::estimate_cost(model, usage),
                usage.total()
            );
        }
        if text_blocks > 1 {
            debug!("[{request_id}] using first of {text_blocks} text blocks");
        }

        let text = reply.first_text().ok_or(AnalysisError::MissingText)?;
        self.emit(AnalysisEvent::Normalizing {
            request_id,
            raw_len: text.len(),
        });
        Ok(self.normalizer.normalize(text)?)
    }

    async fn call_model(&self, request: &CompletionRequest) -> Result<ModelReply, ModelError> {
        let call = self.model.complete(request);
        match self.config.timeout {
            Some(limit) => tokio::time::timeout(limit, call)
                .await
                .map_err(|_| ModelError::Timeout(limit))?,
            None => call.await,
        }
    }

    fn emit(&self, event: AnalysisEvent<'_>) {
        self.events.on_event(&event);
    }
}
