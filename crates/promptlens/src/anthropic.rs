//! Async HTTP client for the Anthropic Messages API.

use std::time::{Duration, Instant};

use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

use crate::model::{CompletionRequest, ModelError, ModelFuture, ModelReply, TextModel};

pub const ANTHROPIC_BASE_URL: &str = "https://api.anthropic.com";

/// Value sent in the `anthropic-version` header.
pub const ANTHROPIC_VERSION: &str = "2023-06-01";

/// Default overall HTTP timeout for a single call.
pub const DEFAULT_HTTP_TIMEOUT: Duration = Duration::from_secs(120);

// ── Request types ──────────────────────────────────────────────────

/// Messages API request body.
#[derive(Serialize, Debug)]
pub struct MessagesRequest<'a> {
    pub model: &'a str,
    pub max_tokens: u32,
    pub system: &'a str,
    pub messages: Vec<RequestMessage<'a>>,
}

#[derive(Serialize, Debug)]
pub struct RequestMessage<'a> {
    pub role: &'static str,
    pub content: &'a str,
}

impl<'a> MessagesRequest<'a> {
    /// A single-turn request: one system prompt, one user message.
    pub fn from_completion(request: &'a CompletionRequest) -> Self {
        Self {
            model: &request.model,
            max_tokens: request.max_tokens,
            system: &request.system,
            messages: vec![RequestMessage {
                role: "user",
                content: &request.user,
            }],
        }
    }
}

// ── Error envelope ─────────────────────────────────────────────────

#[derive(Deserialize, Debug)]
struct ErrorEnvelope {
    error: ApiErrorBody,
}

#[derive(Deserialize, Debug)]
struct ApiErrorBody {
    #[serde(rename = "type", default)]
    kind: Option<String>,
    message: String,
}

/// Pull a human-readable message out of an error response body.
///
/// Falls back to the raw body text when it is not an error envelope.
fn error_message(body: &str) -> String {
    match serde_json::from_str::<ErrorEnvelope>(body) {
        Ok(env) => match env.error.kind {
            Some(kind) => format!("{kind}: {}", env.error.message),
            None => env.error.message,
        },
        Err(_) if body.trim().is_empty() => "empty response body".to_string(),
        Err(_) => body.trim().to_string(),
    }
}

/// Map a non-success HTTP status and its body to a [`ModelError`].
fn status_error(status: u16, body: &str) -> ModelError {
    let message = error_message(body);
    match status {
        401 | 403 => ModelError::Auth(message),
        429 => ModelError::RateLimited(message),
        _ => ModelError::Status { status, message },
    }
}

// ── Client ─────────────────────────────────────────────────────────

/// Connection settings for [`AnthropicClient`].
#[derive(Debug, Clone)]
pub struct ClientConfig {
    pub api_key: String,
    /// Base URL without the `/v1/messages` suffix. Default: [`ANTHROPIC_BASE_URL`].
    pub base_url: String,
    /// Overall HTTP timeout. Default: 120s.
    pub timeout: Duration,
}

impl ClientConfig {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            base_url: ANTHROPIC_BASE_URL.to_string(),
            timeout: DEFAULT_HTTP_TIMEOUT,
        }
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

/// Async HTTP client for the Anthropic Messages API.
///
/// Constructed explicitly and handed to the
/// [`AnalysisHandler`](crate::analysis::AnalysisHandler); there is no
/// process-wide instance.
pub struct AnthropicClient {
    client: reqwest::Client,
    api_key: String,
    endpoint: String,
}

impl AnthropicClient {
    /// Create a new client with default base URL and timeout.
    pub fn new(api_key: impl Into<String>) -> Result<Self, ModelError> {
        Self::with_config(ClientConfig::new(api_key))
    }

    pub fn with_config(config: ClientConfig) -> Result<Self, ModelError> {
        if config.api_key.trim().is_empty() {
            return Err(ModelError::Auth("API key is empty".to_string()));
        }
        let client = reqwest::Client::builder()
            .user_agent(concat!("promptlens/", env!("CARGO_PKG_VERSION")))
            .timeout(config.timeout)
            .build()
            .map_err(|e| ModelError::Transport(format!("failed to build HTTP client: {e}")))?;
        Ok(Self {
            client,
            api_key: config.api_key,
            endpoint: format!("{}/v1/messages", config.base_url.trim_end_matches('/')),
        })
    }

    /// The full messages endpoint this client posts to.
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// Send a Messages API request.
    pub async fn messages(&self, request: &CompletionRequest) -> Result<ModelReply, ModelError> {
        let body = MessagesRequest::from_completion(request);
        debug!(
            "LLM request: model={}, max_tokens={}, system={} chars, user={} chars",
            body.model,
            body.max_tokens,
            body.system.len(),
            request.user.len(),
        );
        trace!(
            "Request payload size: {} bytes",
            serde_json::to_string(&body).map_or(0, |s| s.len())
        );

        let start = Instant::now();

        let resp = self
            .client
            .post(&self.endpoint)
            .header("x-api-key", &self.api_key)
            .header("anthropic-version", ANTHROPIC_VERSION)
            .json(&body)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    ModelError::Timeout(start.elapsed())
                } else {
                    ModelError::Transport(e.to_string())
                }
            })?;

        let status = resp.status();
        let text = resp
            .text()
            .await
            .map_err(|e| ModelError::Transport(format!("failed to read response: {e}")))?;

        let elapsed = start.elapsed();
        debug!(
            "LLM response: HTTP {} in {:.1}s ({} bytes)",
            status,
            elapsed.as_secs_f64(),
            text.len()
        );

        if !status.is_success() {
            return Err(status_error(status.as_u16(), &text));
        }

        parse_reply(&text)
    }
}

/// Decode a successful response body into a [`ModelReply`].
fn parse_reply(body: &str) -> Result<ModelReply, ModelError> {
    // Some proxies return 200 with an error envelope.
    if let Ok(env) = serde_json::from_str::<ErrorEnvelope>(body) {
        return Err(ModelError::Status {
            status: 200,
            message: match env.error.kind {
                Some(kind) => format!("{kind}: {}", env.error.message),
                None => env.error.message,
            },
        });
    }

    let reply: ModelReply = serde_json::from_str(body)
        .map_err(|e| ModelError::MalformedResponse(format!("failed to parse response: {e}")))?;

    if let Some(usage) = reply.usage {
        debug!(
            "Token usage: input={}, output={}, total={}",
            usage.input_tokens,
            usage.output_tokens,
            usage.total(),
        );
    }
    debug!(
        "LLM output: {} block(s), {} text, stop_reason={}",
        reply.content.len(),
        reply.text_block_count(),
        reply.stop_reason.as_deref().unwrap_or("(none)")
    );

    Ok(reply)
}

impl TextModel for AnthropicClient {
    fn complete<'a>(&'a self, request: &'a CompletionRequest) -> ModelFuture<'a> {
        Box::pin(self.messages(request))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn completion() -> CompletionRequest {
        CompletionRequest {
            model: "claude-sonnet-4-20250514".into(),
            system: "sys".into(),
            user: "hello".into(),
            max_tokens: 4096,
        }
    }

    #[test]
    fn request_body_shape() {
        let req = completion();
        let json = serde_json::to_value(MessagesRequest::from_completion(&req)).unwrap();
        assert_eq!(json["model"], "claude-sonnet-4-20250514");
        assert_eq!(json["max_tokens"], 4096);
        assert_eq!(json["system"], "sys");
        assert_eq!(json["messages"][0]["role"], "user");
        assert_eq!(json["messages"][0]["content"], "hello");
        assert_eq!(json["messages"].as_array().unwrap().len(), 1);
    }

    #[test]
    fn error_envelope_message_extracted() {
        let body = r#"{"type":"error","error":{"type":"overloaded_error","message":"Overloaded"}}"#;
        assert_eq!(error_message(body), "overloaded_error: Overloaded");
        assert_eq!(error_message("  upstream down \n"), "upstream down");
        assert_eq!(error_message(""), "empty response body");
    }

    #[test]
    fn status_errors_classified() {
        let body = r#"{"type":"error","error":{"type":"authentication_error","message":"invalid x-api-key"}}"#;
        assert!(matches!(status_error(401, body), ModelError::Auth(m) if m.contains("invalid x-api-key")));
        assert!(matches!(status_error(429, "{}"), ModelError::RateLimited(_)));
        assert!(matches!(
            status_error(529, "overloaded"),
            ModelError::Status { status: 529, .. }
        ));
    }

    #[test]
    fn parse_reply_accepts_message_body() {
        let body = r#"{"content":[{"type":"text","text":"{\"a\":1}"}],"usage":{"input_tokens":1,"output_tokens":2}}"#;
        let reply = parse_reply(body).unwrap();
        assert_eq!(reply.first_text(), Some("{\"a\":1}"));
    }

    #[test]
    fn parse_reply_rejects_garbage_and_error_envelopes() {
        assert!(matches!(
            parse_reply("<html>bad gateway</html>"),
            Err(ModelError::MalformedResponse(_))
        ));
        let env = r#"{"type":"error","error":{"message":"boom"}}"#;
        assert!(matches!(
            parse_reply(env),
            Err(ModelError::Status { status: 200, message }) if message == "boom"
        ));
    }

    #[test]
    fn parse_reply_rejects_body_without_content() {
        for body in ["{}", r#"{"id":"msg_01","type":"message"}"#] {
            assert!(
                matches!(parse_reply(body), Err(ModelError::MalformedResponse(_))),
                "accepted {body}"
            );
        }
    }

    #[test]
    fn empty_api_key_rejected() {
        assert!(matches!(AnthropicClient::new("  "), Err(ModelError::Auth(_))));
    }

    #[test]
    fn endpoint_joins_base_url() {
        let client =
            AnthropicClient::with_config(ClientConfig::new("k").with_base_url("http://localhost:9/"))
                .unwrap();
        assert_eq!(client.endpoint(), "http://localhost:9/v1/messages");
    }

    // ── HTTP round trips ─────────────────────────────────────────────

    use std::sync::{Arc, Mutex};

    use axum::Json;
    use axum::Router;
    use axum::extract::State;
    use axum::http::{HeaderMap, StatusCode};
    use axum::routing::post;

    use crate::analysis::{AnalysisConfig, AnalysisHandler, AnalysisInput, NoopHandler};
    use crate::error::ErrorClass;

    /// Headers and JSON bodies received by the stub API.
    #[derive(Clone, Default)]
    struct Received(Arc<Mutex<Vec<(HeaderMap, serde_json::Value)>>>);

    async fn record_and_reply(
        State(received): State<Received>,
        headers: HeaderMap,
        Json(body): Json<serde_json::Value>,
    ) -> Json<serde_json::Value> {
        received.0.lock().unwrap().push((headers, body));
        Json(serde_json::json!({
            "id": "msg_01",
            "type": "message",
            "role": "assistant",
            "model": "claude-sonnet-4-20250514",
            "content": [{"type": "text", "text": "hello back"}],
            "stop_reason": "end_turn",
            "usage": {"input_tokens": 5, "output_tokens": 2}
        }))
    }

    /// Each route prefix acts as a separate base URL with fixed behavior.
    async fn spawn_stub_api() -> (String, Received) {
        let received = Received::default();
        let router = Router::new()
            .route("/ok/v1/messages", post(record_and_reply))
            .route(
                "/unauthorized/v1/messages",
                post(|| async {
                    (
                        StatusCode::UNAUTHORIZED,
                        r#"{"type":"error","error":{"type":"authentication_error","message":"invalid x-api-key"}}"#,
                    )
                }),
            )
            .route(
                "/limited/v1/messages",
                post(|| async {
                    (
                        StatusCode::TOO_MANY_REQUESTS,
                        r#"{"type":"error","error":{"type":"rate_limit_error","message":"slow down"}}"#,
                    )
                }),
            )
            .route(
                "/overloaded/v1/messages",
                post(|| async {
                    (
                        StatusCode::from_u16(529).unwrap(),
                        r#"{"type":"error","error":{"type":"overloaded_error","message":"Overloaded"}}"#,
                    )
                }),
            )
            .route(
                "/shapeless/v1/messages",
                post(|| async { (StatusCode::OK, "{}") }),
            )
            .route(
                "/slow/v1/messages",
                post(|| async {
                    tokio::time::sleep(Duration::from_secs(10)).await;
                    (StatusCode::OK, "{}")
                }),
            )
            .with_state(received.clone());

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, router).await.unwrap();
        });
        (format!("http://{addr}"), received)
    }

    fn client_for(base: &str, prefix: &str) -> AnthropicClient {
        AnthropicClient::with_config(
            ClientConfig::new("test-key").with_base_url(format!("{base}/{prefix}")),
        )
        .unwrap()
    }

    #[tokio::test]
    async fn messages_posts_headers_and_body() {
        let (base, received) = spawn_stub_api().await;
        let client = client_for(&base, "ok");

        let reply = client.messages(&completion()).await.unwrap();
        assert_eq!(reply.first_text(), Some("hello back"));
        assert_eq!(reply.usage.map(|u| u.total()), Some(7));

        let received = received.0.lock().unwrap();
        assert_eq!(received.len(), 1);
        let (headers, body) = &received[0];
        assert_eq!(headers["x-api-key"], "test-key");
        assert_eq!(headers["anthropic-version"], ANTHROPIC_VERSION);
        assert_eq!(body["model"], "claude-sonnet-4-20250514");
        assert_eq!(body["max_tokens"], 4096);
        assert_eq!(body["system"], "sys");
        assert_eq!(body["messages"][0]["role"], "user");
        assert_eq!(body["messages"][0]["content"], "hello");
    }

    #[tokio::test]
    async fn messages_maps_error_statuses() {
        let (base, _received) = spawn_stub_api().await;

        let err = client_for(&base, "unauthorized")
            .messages(&completion())
            .await
            .unwrap_err();
        assert!(matches!(&err, ModelError::Auth(m) if m.contains("invalid x-api-key")));

        let err = client_for(&base, "limited")
            .messages(&completion())
            .await
            .unwrap_err();
        assert!(matches!(&err, ModelError::RateLimited(m) if m.contains("slow down")));

        let err = client_for(&base, "overloaded")
            .messages(&completion())
            .await
            .unwrap_err();
        assert!(matches!(
            &err,
            ModelError::Status { status: 529, message } if message == "overloaded_error: Overloaded"
        ));
    }

    #[tokio::test]
    async fn messages_rejects_reply_without_content() {
        let (base, _received) = spawn_stub_api().await;
        let err = client_for(&base, "shapeless")
            .messages(&completion())
            .await
            .unwrap_err();
        assert!(matches!(err, ModelError::MalformedResponse(_)));
    }

    #[tokio::test]
    async fn messages_times_out() {
        let (base, _received) = spawn_stub_api().await;
        let client = AnthropicClient::with_config(
            ClientConfig::new("test-key")
                .with_base_url(format!("{base}/slow"))
                .with_timeout(Duration::from_millis(200)),
        )
        .unwrap();

        let err = client.messages(&completion()).await.unwrap_err();
        assert!(matches!(err, ModelError::Timeout(_)));
    }

    #[tokio::test]
    async fn shapeless_reply_is_upstream_failure_for_analysis() {
        let (base, _received) = spawn_stub_api().await;
        let handler = AnalysisHandler::new(
            Arc::new(client_for(&base, "shapeless")),
            AnalysisConfig::default(),
        )
        .with_event_handler(NoopHandler);

        let err = handler
            .analyze(AnalysisInput::new("url", "https://example.com"))
            .await
            .unwrap_err();
        assert_eq!(err.class(), ErrorClass::Upstream);
        assert_eq!(err.class().status_code(), 502);
    }
}
