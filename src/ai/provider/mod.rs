//! Text Generation Providers
//!
//! Defines the `TextGenerator` trait the quiz pipeline calls through.
//! The only production implementation is the Gemini REST client; tests swap
//! in scripted generators or scripted HTTP transports.
//!
//! ## Modules
//!
//! - `transport`: HTTP seam (`HttpTransport`) with the reqwest implementation
//! - `gemini`: `generateContent` client with retry policy and response envelope

mod gemini;
mod transport;

pub use gemini::{GeminiClient, RetryPolicy};
pub use transport::{HttpReply, HttpTransport, ReqwestTransport, TransportError};

#[cfg(test)]
pub(crate) use transport::mock;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::ai::cancel::Cancellation;
use crate::config::LlmConfig;
use crate::types::{ModelError, QuizError, Result};

/// Shared generator type for use across pipeline runs
pub type SharedGenerator = Arc<dyn TextGenerator>;

// =============================================================================
// Model Listing
// =============================================================================

/// One entry of the provider's model catalogue
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ModelInfo {
    pub name: String,
    #[serde(default)]
    pub display_name: Option<String>,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub supported_generation_methods: Vec<String>,
}

impl ModelInfo {
    /// Whether the model can serve `generateContent`
    pub fn supports_generation(&self) -> bool {
        self.supported_generation_methods
            .iter()
            .any(|m| m == "generateContent")
    }
}

// =============================================================================
// Text Generator Trait
// =============================================================================

#[async_trait]
pub trait TextGenerator: Send + Sync {
    /// Generate raw text for `prompt`
    ///
    /// Implementations own their retry policy and must stop promptly once
    /// `cancel` fires, returning `ModelError::Cancelled`.
    async fn generate(
        &self,
        prompt: &str,
        cancel: &Cancellation,
    ) -> std::result::Result<String, ModelError>;

    /// Provider name for logging
    fn name(&self) -> &str;

    /// Model name currently in use
    fn model(&self) -> &str;

    /// Check the provider answers at all
    async fn health_check(&self) -> std::result::Result<(), ModelError>;
}

/// Create a shared generator from configuration
pub fn create_generator(config: &LlmConfig) -> Result<SharedGenerator> {
    match config.provider.as_str() {
        "gemini" => Ok(Arc::new(GeminiClient::new(config)?)),
        other => Err(QuizError::Config(format!(
            "Unknown provider: {}. Supported: gemini",
            other
        ))),
    }
}
