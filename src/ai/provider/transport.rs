//! HTTP Transport
//!
//! The seam between the model client and the network. The client only ever
//! sees a status code and a body; everything reqwest-specific stays here.

use async_trait::async_trait;
use secrecy::{ExposeSecret, SecretString};
use serde_json::Value;
use std::time::Duration;
use thiserror::Error;

use crate::ai::timeout::TimeoutElapsed;
use crate::types::{QuizError, Result};

/// Header carrying the Gemini API credential
const API_KEY_HEADER: &str = "x-goog-api-key";

/// Raw HTTP reply, success or not
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpReply {
    pub status: u16,
    pub body: String,
}

impl HttpReply {
    pub fn new(status: u16, body: impl Into<String>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Failure to obtain any HTTP reply at all
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TransportError {
    #[error("request failed: {0}")]
    Request(String),

    #[error(transparent)]
    Timeout(#[from] TimeoutElapsed),
}

#[async_trait]
pub trait HttpTransport: Send + Sync {
    /// POST a JSON body and return whatever the server answered
    async fn post_json(
        &self,
        url: &str,
        body: &Value,
    ) -> std::result::Result<HttpReply, TransportError>;

    async fn get(&self, url: &str) -> std::result::Result<HttpReply, TransportError>;
}

// =============================================================================
// reqwest implementation
// =============================================================================

/// Production transport with secure API key handling
pub struct ReqwestTransport {
    /// Never exposed in logs or debug output
    api_key: SecretString,
    client: reqwest::Client,
}

impl std::fmt::Debug for ReqwestTransport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ReqwestTransport")
            .field("api_key", &"[REDACTED]")
            .finish()
    }
}

impl ReqwestTransport {
    pub fn new(api_key: SecretString, timeout: Duration) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| QuizError::Config(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self { api_key, client })
    }

    async fn read_reply(
        response: reqwest::Response,
    ) -> std::result::Result<HttpReply, TransportError> {
        let status = response.status().as_u16();
        let body = response
            .text()
            .await
            .map_err(|e| TransportError::Request(format!("failed to read body: {}", e)))?;
        Ok(HttpReply { status, body })
    }
}

#[async_trait]
impl HttpTransport for ReqwestTransport {
    async fn post_json(
        &self,
        url: &str,
        body: &Value,
    ) -> std::result::Result<HttpReply, TransportError> {
        let response = self
            .client
            .post(url)
            .header(API_KEY_HEADER, self.api_key.expose_secret())
            .header("Content-Type", "application/json")
            .json(body)
            .send()
            .await
            .map_err(|e| TransportError::Request(e.to_string()))?;

        Self::read_reply(response).await
    }

    async fn get(&self, url: &str) -> std::result::Result<HttpReply, TransportError> {
        let response = self
            .client
            .get(url)
            .header(API_KEY_HEADER, self.api_key.expose_secret())
            .send()
            .await
            .map_err(|e| TransportError::Request(e.to_string()))?;

        Self::read_reply(response).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reply_success_range() {
        assert!(HttpReply::new(200, "").is_success());
        assert!(HttpReply::new(204, "").is_success());
        assert!(!HttpReply::new(503, "").is_success());
        assert!(!HttpReply::new(302, "").is_success());
    }

    #[test]
    fn test_debug_redacts_key() {
        let transport =
            ReqwestTransport::new(SecretString::from("sk-live-123"), Duration::from_secs(5))
                .unwrap();
        let debug = format!("{:?}", transport);
        assert!(!debug.contains("sk-live-123"));
        assert!(debug.contains("[REDACTED]"));
    }

    #[test]
    fn test_timeout_converts_into_transport_error() {
        let err: TransportError = TimeoutElapsed {
            operation: "generateContent request".into(),
            timeout: Duration::from_secs(60),
        }
        .into();
        assert_eq!(
            err.to_string(),
            "generateContent request timed out after 60s"
        );
    }
}

// =============================================================================
// Scripted transport for tests
// =============================================================================

#[cfg(test)]
pub(crate) mod mock {
    use super::*;
    use std::collections::VecDeque;
    use std::sync::Mutex;
    use std::sync::atomic::{AtomicU32, Ordering};

    type Scripted = std::result::Result<HttpReply, TransportError>;

    /// Replays a fixed sequence of replies and counts calls
    pub struct ScriptedTransport {
        script: Mutex<VecDeque<Scripted>>,
        calls: AtomicU32,
        delay: Duration,
        last_request: Mutex<Option<(String, Value)>>,
    }

    impl ScriptedTransport {
        pub fn new(script: impl IntoIterator<Item = Scripted>) -> Self {
            Self {
                script: Mutex::new(script.into_iter().collect()),
                calls: AtomicU32::new(0),
                delay: Duration::ZERO,
                last_request: Mutex::new(None),
            }
        }

        pub fn replies(replies: impl IntoIterator<Item = HttpReply>) -> Self {
            Self::new(replies.into_iter().map(Ok))
        }

        /// Every call waits this long before answering
        pub fn with_delay(mut self, delay: Duration) -> Self {
            self.delay = delay;
            self
        }

        pub fn calls(&self) -> u32 {
            self.calls.load(Ordering::SeqCst)
        }

        pub fn last_request(&self) -> Option<(String, Value)> {
            self.last_request.lock().unwrap().clone()
        }

        async fn next(&self) -> Scripted {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if !self.delay.is_zero() {
                tokio::time::sleep(self.delay).await;
            }
            self.script
                .lock()
                .unwrap()
                .pop_front()
                .unwrap_or_else(|| Err(TransportError::Request("script exhausted".into())))
        }
    }

    #[async_trait]
    impl HttpTransport for ScriptedTransport {
        async fn post_json(&self, url: &str, body: &Value) -> Scripted {
            *self.last_request.lock().unwrap() = Some((url.to_string(), body.clone()));
            self.next().await
        }

        async fn get(&self, url: &str) -> Scripted {
            *self.last_request.lock().unwrap() = Some((url.to_string(), Value::Null));
            self.next().await
        }
    }

    /// A well-formed generateContent reply wrapping `text`
    pub fn gemini_reply(text: &str) -> HttpReply {
        let body = serde_json::json!({
            "candidates": [{ "content": { "parts": [{ "text": text }], "role": "model" } }]
        });
        HttpReply::new(200, body.to_string())
    }
}
