//! Configuration Types
//!
//! All configuration structures with sensible defaults.
//! Supports global (user config dir) and project (`./quizforge.toml`) files.

use secrecy::SecretString;
use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::constants::{model, network, quiz, retry, sampling};
use crate::types::{QuizError, Result};

/// Root configuration structure
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Configuration version
    pub version: String,

    /// Generative model settings
    pub llm: LlmConfig,

    /// Quiz shaping settings
    pub quiz: QuizConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            version: "1.0".to_string(),
            llm: LlmConfig::default(),
            quiz: QuizConfig::default(),
        }
    }
}

impl Config {
    /// Validate configuration values are within acceptable ranges.
    /// Returns `QuizError::Config` on validation failure.
    pub fn validate(&self) -> Result<()> {
        self.llm.validate()?;
        self.quiz.validate()
    }
}

// =============================================================================
// LLM Configuration
// =============================================================================

/// Settings for the generative endpoint
///
/// The API key is never serialized and is redacted in debug output.
#[derive(Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LlmConfig {
    /// Provider name (only "gemini" is supported)
    pub provider: String,

    /// Model name
    pub model: String,

    /// API base URL
    pub api_base: String,

    /// Request timeout in seconds
    pub timeout_secs: u64,

    /// Sampling temperature
    pub temperature: f32,

    /// Nucleus sampling cutoff
    pub top_p: f32,

    /// Top-k sampling cutoff
    pub top_k: u32,

    /// Maximum tokens to generate
    pub max_output_tokens: u32,

    /// Attempts per generation call
    pub max_retries: u32,

    /// Backoff unit in milliseconds
    pub backoff_unit_ms: u64,

    /// API credential, usually taken from GEMINI_API_KEY
    #[serde(default, skip_serializing)]
    pub api_key: Option<String>,
}

impl std::fmt::Debug for LlmConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LlmConfig")
            .field("provider", &self.provider)
            .field("model", &self.model)
            .field("api_base", &self.api_base)
            .field("timeout_secs", &self.timeout_secs)
            .field("temperature", &self.temperature)
            .field("top_p", &self.top_p)
            .field("top_k", &self.top_k)
            .field("max_output_tokens", &self.max_output_tokens)
            .field("max_retries", &self.max_retries)
            .field("backoff_unit_ms", &self.backoff_unit_ms)
            .field("api_key", &self.api_key.as_ref().map(|_| "[REDACTED]"))
            .finish()
    }
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            provider: "gemini".to_string(),
            model: model::DEFAULT_MODEL.to_string(),
            api_base: model::DEFAULT_API_BASE.to_string(),
            timeout_secs: network::DEFAULT_TIMEOUT_SECS,
            temperature: model::TEMPERATURE,
            top_p: model::TOP_P,
            top_k: model::TOP_K,
            max_output_tokens: model::MAX_OUTPUT_TOKENS,
            max_retries: retry::DEFAULT_MAX_RETRIES,
            backoff_unit_ms: retry::BACKOFF_UNIT_MS,
            api_key: None,
        }
    }
}

impl LlmConfig {
    /// The API credential, checked for presence.
    ///
    /// This is the only place the credential leaves configuration; a missing
    /// or blank key is a `QuizError::Config` raised before any request.
    pub fn credential(&self) -> Result<SecretString> {
        match self.api_key.as_deref().map(str::trim) {
            Some(key) if !key.is_empty() => Ok(SecretString::from(key.to_string())),
            _ => Err(QuizError::Config(format!(
                "{} is not set. Export it or add llm.api_key to the config file",
                model::API_KEY_ENV
            ))),
        }
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    pub fn backoff_unit(&self) -> Duration {
        Duration::from_millis(self.backoff_unit_ms)
    }

    fn validate(&self) -> Result<()> {
        if self.provider != "gemini" {
            return Err(QuizError::Config(format!(
                "Unknown provider: {}. Supported: gemini",
                self.provider
            )));
        }

        if !(0.0..=2.0).contains(&self.temperature) {
            return Err(QuizError::Config(format!(
                "LLM temperature must be between 0.0 and 2.0, got {}",
                self.temperature
            )));
        }

        if !(0.0..=1.0).contains(&self.top_p) {
            return Err(QuizError::Config(format!(
                "LLM top_p must be between 0.0 and 1.0, got {}",
                self.top_p
            )));
        }

        if self.timeout_secs == 0 {
            return Err(QuizError::Config(
                "LLM timeout_secs must be greater than 0".to_string(),
            ));
        }

        if self.max_retries == 0 {
            return Err(QuizError::Config(
                "LLM max_retries must be greater than 0".to_string(),
            ));
        }

        if self.max_output_tokens == 0 {
            return Err(QuizError::Config(
                "LLM max_output_tokens must be greater than 0".to_string(),
            ));
        }

        let url = url::Url::parse(&self.api_base).map_err(|e| {
            QuizError::Config(format!("Invalid api_base URL '{}': {}", self.api_base, e))
        })?;
        if !matches!(url.scheme(), "http" | "https") {
            return Err(QuizError::Config(format!(
                "api_base must use http or https scheme, got: {}",
                url.scheme()
            )));
        }

        Ok(())
    }
}

// =============================================================================
// Quiz Configuration
// =============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct QuizConfig {
    /// Questions generated when none are requested explicitly
    pub default_question_count: usize,

    /// Largest accepted question count
    pub max_question_count: usize,

    /// Maximum characters of source text sent to the model
    pub max_sample_chars: usize,
}

impl Default for QuizConfig {
    fn default() -> Self {
        Self {
            default_question_count: quiz::DEFAULT_QUESTION_COUNT,
            max_question_count: quiz::MAX_QUESTION_COUNT,
            max_sample_chars: sampling::MAX_SAMPLE_CHARS,
        }
    }
}

impl QuizConfig {
    fn validate(&self) -> Result<()> {
        if self.max_question_count == 0 {
            return Err(QuizError::Config(
                "quiz.max_question_count must be greater than 0".to_string(),
            ));
        }

        if !(1..=self.max_question_count).contains(&self.default_question_count) {
            return Err(QuizError::Config(format!(
                "quiz.default_question_count must be between 1 and {}, got {}",
                self.max_question_count, self.default_question_count
            )));
        }

        if self.max_sample_chars < sampling::MIN_SAMPLE_CHARS {
            return Err(QuizError::Config(format!(
                "quiz.max_sample_chars must be at least {}, got {}",
                sampling::MIN_SAMPLE_CHARS,
                self.max_sample_chars
            )));
        }

        Ok(())
    }
}

// =============================================================================
// Tests
// =============================================================================
