//! Gemini API Provider
//!
//! Text generation through the `generateContent` REST endpoint.
//!
//! ## Retry policy
//!
//! | Outcome                      | Action                                   |
//! |------------------------------|------------------------------------------|
//! | 2xx with text                | return the text                          |
//! | 2xx without text             | `Extraction`, no retry                   |
//! | 503                          | wait `2 * attempt` units, retry          |
//! | other non-2xx                | `Upstream`, no retry                     |
//! | transport failure or timeout | wait `attempt` units, retry              |
//!
//! Both the HTTP call and every wait race against the caller's
//! [`Cancellation`].

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::{Value, json};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::{debug, info, warn};

use super::transport::{HttpReply, HttpTransport, ReqwestTransport, TransportError};
use super::{ModelInfo, TextGenerator};
use crate::ai::cancel::Cancellation;
use crate::ai::timeout::with_timeout;
use crate::config::LlmConfig;
use crate::constants::{network, retry};
use crate::types::{ErrorCategory, ModelError, Result};

/// Prompt used by `health_check`
const PING_PROMPT: &str = "Reply with the single word: ok";

// =============================================================================
// Retry Policy
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Total attempts per call, including the first
    pub max_retries: u32,
    pub backoff_unit: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_retries: retry::DEFAULT_MAX_RETRIES,
            backoff_unit: Duration::from_millis(retry::BACKOFF_UNIT_MS),
        }
    }
}

impl RetryPolicy {
    pub fn new(max_retries: u32, backoff_unit: Duration) -> Self {
        Self {
            max_retries: max_retries.max(1),
            backoff_unit,
        }
    }

    /// Wait before the attempt following `attempt` (1-based)
    pub fn delay_for(&self, category: ErrorCategory, attempt: u32) -> Duration {
        let units = match category {
            ErrorCategory::Transient => retry::OVERLOAD_BACKOFF_FACTOR * attempt,
            _ => attempt,
        };
        self.backoff_unit * units
    }
}

// =============================================================================
// Response Envelope
// =============================================================================

/// `{ candidates: [{ content: { parts: [{ text }] } }] }`
#[derive(Debug, Deserialize)]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Option<Content>,
}

#[derive(Debug, Deserialize)]
struct Content {
    #[serde(default)]
    parts: Vec<Part>,
}

#[derive(Debug, Deserialize)]
struct Part {
    text: Option<String>,
}

impl GenerateContentResponse {
    fn parse(body: &str) -> std::result::Result<Self, ModelError> {
        serde_json::from_str(body)
            .map_err(|e| ModelError::Extraction(format!("response body is not JSON: {}", e)))
    }

    /// Text of the first part of the first candidate
    fn into_text(self) -> std::result::Result<String, ModelError> {
        let candidate = self
            .candidates
            .into_iter()
            .next()
            .ok_or_else(|| ModelError::Extraction("response has no candidates".into()))?;
        let content = candidate
            .content
            .ok_or_else(|| ModelError::Extraction("candidate has no content".into()))?;
        let part = content
            .parts
            .into_iter()
            .next()
            .ok_or_else(|| ModelError::Extraction("content has no parts".into()))?;

        part.text
            .filter(|text| !text.trim().is_empty())
            .ok_or_else(|| ModelError::Extraction("part has no text".into()))
    }
}

#[derive(Debug, Deserialize)]
struct ListModelsResponse {
    #[serde(default)]
    models: Vec<ModelInfo>,
}

// =============================================================================
// Client
// =============================================================================

#[derive(Debug, Clone, Copy)]
struct GenerationConfig {
    temperature: f32,
    top_p: f32,
    top_k: u32,
    max_output_tokens: u32,
}

pub struct GeminiClient {
    transport: Arc<dyn HttpTransport>,
    api_base: String,
    model: String,
    generation: GenerationConfig,
    retry: RetryPolicy,
    timeout: Duration,
}

impl std::fmt::Debug for GeminiClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GeminiClient")
            .field("api_base", &self.api_base)
            .field("model", &self.model)
            .field("generation", &self.generation)
            .field("retry", &self.retry)
            .field("timeout", &self.timeout)
            .finish()
    }
}

impl GeminiClient {
    /// Build the production client. Fails with `QuizError::Config` when the
    /// credential is missing, before anything touches the network.
    pub fn new(config: &LlmConfig) -> Result<Self> {
        let api_key = config.credential()?;
        let transport = ReqwestTransport::new(api_key, config.timeout())?;
        Ok(Self::with_transport(config, Arc::new(transport)))
    }

    pub fn with_transport(config: &LlmConfig, transport: Arc<dyn HttpTransport>) -> Self {
        Self {
            transport,
            api_base: config.api_base.trim_end_matches('/').to_string(),
            model: config.model.clone(),
            generation: GenerationConfig {
                temperature: config.temperature,
                top_p: config.top_p,
                top_k: config.top_k,
                max_output_tokens: config.max_output_tokens,
            },
            retry: RetryPolicy::new(config.max_retries, config.backoff_unit()),
            timeout: config.timeout(),
        }
    }

    pub fn with_retry_policy(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    pub fn with_request_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    fn generate_url(&self) -> String {
        format!("{}/models/{}:generateContent", self.api_base, self.model)
    }

    fn build_request(&self, prompt: &str) -> Value {
        json!({
            "contents": [{ "parts": [{ "text": prompt }] }],
            "generationConfig": {
                "temperature": self.generation.temperature,
                "topP": self.generation.top_p,
                "topK": self.generation.top_k,
                "maxOutputTokens": self.generation.max_output_tokens,
            }
        })
    }

    /// Map a non-success reply to the error it represents on this attempt
    fn reply_error(reply: HttpReply, attempt: u32) -> ModelError {
        match ErrorCategory::from_http_status(reply.status) {
            ErrorCategory::Transient => ModelError::Overloaded { attempts: attempt },
            _ => ModelError::Upstream {
                status: reply.status,
                body: truncate_body(&reply.body),
            },
        }
    }

    /// List the models visible to the configured credential
    pub async fn list_models(&self) -> std::result::Result<Vec<ModelInfo>, ModelError> {
        let url = format!("{}/models", self.api_base);
        debug!(url = %url, "Listing Gemini models");

        let reply = with_timeout(self.timeout, self.transport.get(&url), "listModels request")
            .await
            .map_err(|e| transport_error(e, 1))?;

        if !reply.is_success() {
            return Err(ModelError::Upstream {
                status: reply.status,
                body: truncate_body(&reply.body),
            });
        }

        let listing: ListModelsResponse = serde_json::from_str(&reply.body)
            .map_err(|e| ModelError::Extraction(format!("unexpected model listing: {}", e)))?;
        Ok(listing.models)
    }
}

#[async_trait]
impl TextGenerator for GeminiClient {
    async fn generate(
        &self,
        prompt: &str,
        cancel: &Cancellation,
    ) -> std::result::Result<String, ModelError> {
        info!(
            "Generating with Gemini (model: {}, temperature: {})",
            self.model, self.generation.temperature
        );

        let url = self.generate_url();
        let body = self.build_request(prompt);
        let start_time = Instant::now();
        let mut attempt = 0;

        loop {
            attempt += 1;
            if cancel.is_cancelled() {
                return Err(ModelError::Cancelled);
            }

            debug!(attempt, max_retries = self.retry.max_retries, "Sending generateContent request");

            let outcome = tokio::select! {
                biased;
                _ = cancel.cancelled() => return Err(ModelError::Cancelled),
                outcome = with_timeout(
                    self.timeout,
                    self.transport.post_json(&url, &body),
                    "generateContent request",
                ) => outcome,
            };

            let error = match outcome {
                Ok(reply) if reply.is_success() => {
                    let text = GenerateContentResponse::parse(&reply.body)?.into_text()?;
                    debug!(
                        attempt,
                        elapsed_ms = start_time.elapsed().as_millis() as u64,
                        chars = text.len(),
                        "Received Gemini response"
                    );
                    return Ok(text);
                }
                Ok(reply) => Self::reply_error(reply, attempt),
                Err(error) => transport_error(error, attempt),
            };

            let category = error.category();
            if !category.is_retryable() {
                warn!(attempt, error = %error, "Gemini request failed, not retrying");
                return Err(error);
            }

            if attempt >= self.retry.max_retries {
                warn!(attempt, error = %error, "Gemini retries exhausted");
                return Err(error);
            }

            let delay = self.retry.delay_for(category, attempt);
            warn!(
                attempt,
                category = %category,
                delay_ms = delay.as_millis() as u64,
                "Gemini request failed, retrying after backoff"
            );

            tokio::select! {
                biased;
                _ = cancel.cancelled() => return Err(ModelError::Cancelled),
                _ = tokio::time::sleep(delay) => {}
            }
        }
    }

    fn name(&self) -> &str {
        "gemini"
    }

    fn model(&self) -> &str {
        &self.model
    }

    async fn health_check(&self) -> std::result::Result<(), ModelError> {
        let single_attempt = Self {
            transport: Arc::clone(&self.transport),
            api_base: self.api_base.clone(),
            model: self.model.clone(),
            generation: self.generation,
            retry: RetryPolicy::new(1, self.retry.backoff_unit),
            timeout: self.timeout,
        };
        single_attempt
            .generate(PING_PROMPT, &Cancellation::new())
            .await
            .map(|_| ())
    }
}

fn transport_error(error: TransportError, attempts: u32) -> ModelError {
    match error {
        TransportError::Timeout(elapsed) => ModelError::Timeout {
            attempts,
            timeout_secs: elapsed.timeout.as_secs(),
        },
        TransportError::Request(message) => ModelError::Transport { attempts, message },
    }
}

fn truncate_body(body: &str) -> String {
    if body.chars().count() <= network::MAX_ERROR_BODY_CHARS {
        body.to_string()
    } else {
        let head: String = body.chars().take(network::MAX_ERROR_BODY_CHARS).collect();
        format!("{}...", head)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ai::provider::transport::mock::{ScriptedTransport, gemini_reply};

    fn config() -> LlmConfig {
        LlmConfig {
            api_base: "https://example.test/v1beta/".to_string(),
            backoff_unit_ms: 1,
            ..LlmConfig::default()
        }
    }

    fn client(transport: &Arc<ScriptedTransport>) -> GeminiClient {
        GeminiClient::with_transport(&config(), transport.clone())
    }

    #[test]
    fn test_new_requires_credential() {
        let err = GeminiClient::new(&LlmConfig::default()).unwrap_err();
        assert!(err.is_fatal());
        assert!(err.to_string().contains("GEMINI_API_KEY"));
    }

    #[test]
    fn test_retry_delays() {
        let policy = RetryPolicy::new(3, Duration::from_secs(1));
        assert_eq!(
            policy.delay_for(ErrorCategory::Transient, 1),
            Duration::from_secs(2)
        );
        assert_eq!(
            policy.delay_for(ErrorCategory::Transient, 2),
            Duration::from_secs(4)
        );
        assert_eq!(
            policy.delay_for(ErrorCategory::Network, 2),
            Duration::from_secs(2)
        );
        assert_eq!(RetryPolicy::new(0, Duration::ZERO).max_retries, 1);
    }

    #[tokio::test]
    async fn test_generate_success_extracts_text() {
        let transport = Arc::new(ScriptedTransport::replies([gemini_reply("{\"ok\":true}")]));
        let text = client(&transport)
            .generate("hello", &Cancellation::new())
            .await
            .unwrap();

        assert_eq!(text, "{\"ok\":true}");
        assert_eq!(transport.calls(), 1);

        let (url, body) = transport.last_request().unwrap();
        assert_eq!(
            url,
            "https://example.test/v1beta/models/gemini-1.5-flash:generateContent"
        );
        assert_eq!(body["contents"][0]["parts"][0]["text"], "hello");
        assert_eq!(body["generationConfig"]["topK"], 40);
        assert_eq!(body["generationConfig"]["maxOutputTokens"], 2048);
    }

    #[tokio::test]
    async fn test_overloaded_then_success_retries() {
        let transport = Arc::new(ScriptedTransport::replies([
            HttpReply::new(503, "overloaded"),
            gemini_reply("done"),
        ]));
        let text = client(&transport)
            .generate("p", &Cancellation::new())
            .await
            .unwrap();

        assert_eq!(text, "done");
        assert_eq!(transport.calls(), 2);
    }

    #[tokio::test]
    async fn test_overloaded_every_attempt() {
        let transport = Arc::new(ScriptedTransport::replies([
            HttpReply::new(503, ""),
            HttpReply::new(503, ""),
            HttpReply::new(503, ""),
            gemini_reply("never reached"),
        ]));
        let err = client(&transport)
            .generate("p", &Cancellation::new())
            .await
            .unwrap_err();

        assert_eq!(err, ModelError::Overloaded { attempts: 3 });
        assert_eq!(transport.calls(), 3);
    }

    #[tokio::test]
    async fn test_other_status_is_not_retried() {
        let transport = Arc::new(ScriptedTransport::replies([
            HttpReply::new(500, "internal"),
            gemini_reply("never reached"),
        ]));
        let err = client(&transport)
            .generate("p", &Cancellation::new())
            .await
            .unwrap_err();

        assert_eq!(
            err,
            ModelError::Upstream {
                status: 500,
                body: "internal".into()
            }
        );
        assert_eq!(transport.calls(), 1);
    }

    #[tokio::test]
    async fn test_missing_envelope_levels_are_extraction_errors() {
        let bodies = [
            r#"{"candidates": []}"#,
            r#"{"candidates": [{}]}"#,
            r#"{"candidates": [{"content": {"parts": []}}]}"#,
            r#"{"candidates": [{"content": {"parts": [{"text": ""}]}}]}"#,
            r#"{"promptFeedback": {"blockReason": "SAFETY"}}"#,
            "not json",
        ];

        for body in bodies {
            let transport = Arc::new(ScriptedTransport::replies([
                HttpReply::new(200, body),
                gemini_reply("never reached"),
            ]));
            let err = client(&transport)
                .generate("p", &Cancellation::new())
                .await
                .unwrap_err();

            assert!(
                matches!(err, ModelError::Extraction(_)),
                "body {} gave {:?}",
                body,
                err
            );
            assert_eq!(transport.calls(), 1, "extraction must not retry: {}", body);
        }
    }

    #[tokio::test]
    async fn test_transport_failure_retries_then_succeeds() {
        let transport = Arc::new(ScriptedTransport::new([
            Err(TransportError::Request("connection reset".into())),
            Ok(gemini_reply("recovered")),
        ]));
        let text = client(&transport)
            .generate("p", &Cancellation::new())
            .await
            .unwrap();

        assert_eq!(text, "recovered");
        assert_eq!(transport.calls(), 2);
    }

    #[tokio::test]
    async fn test_transport_failure_exhausts_retries() {
        let transport = Arc::new(ScriptedTransport::new([]));
        let err = client(&transport)
            .generate("p", &Cancellation::new())
            .await
            .unwrap_err();

        assert!(matches!(err, ModelError::Transport { attempts: 3, .. }));
        assert_eq!(transport.calls(), 3);
    }

    #[tokio::test]
    async fn test_request_timeout_is_retried_then_surfaced() {
        let transport = Arc::new(
            ScriptedTransport::replies([gemini_reply("late"), gemini_reply("late")])
                .with_delay(Duration::from_secs(5)),
        );
        let err = client(&transport)
            .with_retry_policy(RetryPolicy::new(2, Duration::from_millis(1)))
            .with_request_timeout(Duration::from_millis(20))
            .generate("p", &Cancellation::new())
            .await
            .unwrap_err();

        assert!(matches!(err, ModelError::Timeout { attempts: 2, .. }));
        assert_eq!(transport.calls(), 2);
    }

    #[tokio::test]
    async fn test_cancelled_before_first_call() {
        let transport = Arc::new(ScriptedTransport::replies([gemini_reply("x")]));
        let cancel = Cancellation::new();
        cancel.cancel();

        let err = client(&transport).generate("p", &cancel).await.unwrap_err();
        assert_eq!(err, ModelError::Cancelled);
        assert_eq!(transport.calls(), 0);
    }

    #[tokio::test]
    async fn test_cancel_interrupts_backoff() {
        let transport = Arc::new(ScriptedTransport::replies([
            HttpReply::new(503, ""),
            gemini_reply("never reached"),
        ]));
        let client = client(&transport)
            .with_retry_policy(RetryPolicy::new(3, Duration::from_secs(30)));
        let cancel = Cancellation::new();

        let trigger = cancel.clone();
        tokio::spawn(async move {
            tokio::time::sleep(Duration::from_millis(20)).await;
            trigger.cancel();
        });

        let err = tokio::time::timeout(Duration::from_secs(5), client.generate("p", &cancel))
            .await
            .expect("cancellation should cut the 60s backoff short")
            .unwrap_err();

        assert_eq!(err, ModelError::Cancelled);
        assert_eq!(transport.calls(), 1);
    }

    #[tokio::test]
    async fn test_cancel_interrupts_in_flight_call() {
        let transport = Arc::new(
            ScriptedTransport::replies([gemini_reply("slow")]).with_delay(Duration::from_secs(30)),
        );
        let client = client(&transport);
        let cancel = Cancellation::new();

        let trigger = cancel.clone();
        tokio::spawn(async move {
            tokio::time::sleep(Duration::from_millis(20)).await;
            trigger.cancel();
        });

        let err = tokio::time::timeout(Duration::from_secs(5), client.generate("p", &cancel))
            .await
            .expect("cancellation should abort the request")
            .unwrap_err();
        assert_eq!(err, ModelError::Cancelled);
    }

    #[tokio::test]
    async fn test_error_body_is_truncated() {
        let long_body = "x".repeat(2_000);
        let transport = Arc::new(ScriptedTransport::replies([HttpReply::new(400, long_body)]));
        let err = client(&transport)
            .generate("p", &Cancellation::new())
            .await
            .unwrap_err();

        match err {
            ModelError::Upstream { status, body } => {
                assert_eq!(status, 400);
                assert_eq!(body.chars().count(), network::MAX_ERROR_BODY_CHARS + 3);
            }
            other => panic!("unexpected {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_list_models() {
        let listing = json!({
            "models": [{
                "name": "models/gemini-1.5-flash",
                "displayName": "Gemini 1.5 Flash",
                "description": "Fast multimodal model",
                "supportedGenerationMethods": ["generateContent", "countTokens"]
            }]
        });
        let transport = Arc::new(ScriptedTransport::replies([HttpReply::new(
            200,
            listing.to_string(),
        )]));
        let models = client(&transport).list_models().await.unwrap();

        assert_eq!(models.len(), 1);
        assert_eq!(models[0].name, "models/gemini-1.5-flash");
        assert!(models[0].supports_generation());
        assert_eq!(
            transport.last_request().unwrap().0,
            "https://example.test/v1beta/models"
        );
    }

    #[tokio::test]
    async fn test_health_check_uses_single_attempt() {
        let transport = Arc::new(ScriptedTransport::replies([
            HttpReply::new(503, ""),
            gemini_reply("ok"),
        ]));
        let err = client(&transport).health_check().await.unwrap_err();

        assert_eq!(err, ModelError::Overloaded { attempts: 1 });
        assert_eq!(transport.calls(), 1);
    }
}
