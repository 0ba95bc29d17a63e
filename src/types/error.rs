//! Unified Error Type System
//!
//! Centralized error types for the quiz pipeline.
//!
//! ## Error Categories
//!
//! - **Transient**: upstream overloaded (HTTP 503), retry with backoff
//! - **Network**: transport failure or timeout, retry with backoff
//! - **Upstream**: any other non-success status, fail immediately
//! - **Extraction**: well-formed reply with an unexpected payload shape
//! - **Cancelled**: caller gave up on the call
//!
//! Only `Config`, `InvalidInput` and `Pipeline` are fatal to a quiz run.
//! Everything else on the model path is recovered by the fallback generator.

use thiserror::Error;

// =============================================================================
// Error Categories
// =============================================================================

/// Categories used for retry decisions on the model path
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    /// Service overloaded - wait then retry same request
    Transient,
    /// Connectivity issues or timeouts - retry with backoff
    Network,
    /// Non-success status other than 503 - don't retry
    Upstream,
    /// Response shape problem - don't retry
    Extraction,
    /// Cancelled by the caller - stop immediately
    Cancelled,
}

impl std::fmt::Display for ErrorCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Transient => write!(f, "TRANSIENT"),
            Self::Network => write!(f, "NETWORK"),
            Self::Upstream => write!(f, "UPSTREAM"),
            Self::Extraction => write!(f, "EXTRACTION"),
            Self::Cancelled => write!(f, "CANCELLED"),
        }
    }
}

impl ErrorCategory {
    /// Check if this category is retryable on the same endpoint
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::Transient | Self::Network)
    }

    /// Classify a non-success HTTP status code
    pub fn from_http_status(status: u16) -> Self {
        match status {
            503 => Self::Transient,
            _ => Self::Upstream,
        }
    }
}

// =============================================================================
// Model Error
// =============================================================================

/// Failure of a generation call, after the retry policy has run its course
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ModelError {
    /// HTTP 503 on every attempt
    #[error("model overloaded (HTTP 503) after {attempts} attempt(s)")]
    Overloaded { attempts: u32 },

    /// Non-success status other than 503
    #[error("upstream error (HTTP {status}): {body}")]
    Upstream { status: u16, body: String },

    /// Success status but no text at candidates[0].content.parts[0].text
    #[error("could not extract text from response: {0}")]
    Extraction(String),

    /// Network failure on the final attempt
    #[error("transport failure after {attempts} attempt(s): {message}")]
    Transport { attempts: u32, message: String },

    /// Per-request timeout elapsed on the final attempt
    #[error("request timed out after {attempts} attempt(s) ({timeout_secs}s each)")]
    Timeout { attempts: u32, timeout_secs: u64 },

    #[error("generation cancelled")]
    Cancelled,
}

impl ModelError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::Overloaded { .. } => ErrorCategory::Transient,
            Self::Upstream { .. } => ErrorCategory::Upstream,
            Self::Extraction(_) => ErrorCategory::Extraction,
            Self::Transport { .. } | Self::Timeout { .. } => ErrorCategory::Network,
            Self::Cancelled => ErrorCategory::Cancelled,
        }
    }
}

// =============================================================================
// Validation Error
// =============================================================================

/// Every structural defect found in a quiz payload
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Validation failed with {} issue(s): {}", .issues.len(), .issues.join("; "))]
pub struct ValidationError {
    pub issues: Vec<String>,
}

impl ValidationError {
    pub fn new(issues: Vec<String>) -> Self {
        Self { issues }
    }
}

// =============================================================================
// Application Error
// =============================================================================

#[derive(Debug, Error)]
pub enum QuizError {
    // -------------------------------------------------------------------------
    // System Errors (auto From impl)
    // -------------------------------------------------------------------------
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    // -------------------------------------------------------------------------
    // Fatal Errors
    // -------------------------------------------------------------------------
    /// Missing credential or invalid configuration
    #[error("Config error: {0}")]
    Config(String),

    /// Caller supplied text or a question count the pipeline cannot serve
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// The fallback quiz itself failed validation
    #[error("Pipeline error: fallback quiz failed validation: {}", .issues.join("; "))]
    Pipeline { issues: Vec<String> },

    // -------------------------------------------------------------------------
    // Recoverable Errors
    // -------------------------------------------------------------------------
    #[error("Model error: {0}")]
    Model(#[from] ModelError),

    /// Model output contained no parseable JSON object
    #[error("Parse error: {0}")]
    Parse(String),

    #[error("{0}")]
    Validation(#[from] ValidationError),

    #[error("Extraction failed for {path}: {reason}")]
    Extract { path: String, reason: String },
}

pub type Result<T> = std::result::Result<T, QuizError>;

impl QuizError {
    /// Create a validation error from collected issues
    pub fn validation(issues: Vec<String>) -> Self {
        Self::Validation(ValidationError::new(issues))
    }

    /// Check if this error must be surfaced to the caller instead of
    /// triggering the fallback path
    pub fn is_fatal(&self) -> bool {
        matches!(
            self,
            Self::Config(_) | Self::InvalidInput(_) | Self::Pipeline { .. }
        )
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_category_display() {
        assert_eq!(ErrorCategory::Transient.to_string(), "TRANSIENT");
        assert_eq!(ErrorCategory::Upstream.to_string(), "UPSTREAM");
        assert_eq!(ErrorCategory::Extraction.to_string(), "EXTRACTION");
    }

    #[test]
    fn test_error_category_retryable() {
        assert!(ErrorCategory::Transient.is_retryable());
        assert!(ErrorCategory::Network.is_retryable());
        assert!(!ErrorCategory::Upstream.is_retryable());
        assert!(!ErrorCategory::Extraction.is_retryable());
        assert!(!ErrorCategory::Cancelled.is_retryable());
    }

    #[test]
    fn test_classify_http_status() {
        assert_eq!(ErrorCategory::from_http_status(503), ErrorCategory::Transient);
        assert_eq!(ErrorCategory::from_http_status(500), ErrorCategory::Upstream);
        assert_eq!(ErrorCategory::from_http_status(429), ErrorCategory::Upstream);
        assert_eq!(ErrorCategory::from_http_status(401), ErrorCategory::Upstream);
    }

    #[test]
    fn test_model_error_category() {
        let err = ModelError::Upstream {
            status: 500,
            body: "boom".into(),
        };
        assert_eq!(err.category(), ErrorCategory::Upstream);
        assert_eq!(err.to_string(), "upstream error (HTTP 500): boom");

        let err = ModelError::Overloaded { attempts: 3 };
        assert_eq!(err.category(), ErrorCategory::Transient);
    }

    #[test]
    fn test_model_error_retryability() {
        let retried = [
            ModelError::Overloaded { attempts: 1 },
            ModelError::Transport {
                attempts: 1,
                message: "connection reset".into(),
            },
            ModelError::Timeout {
                attempts: 1,
                timeout_secs: 60,
            },
        ];
        for err in retried {
            assert!(err.category().is_retryable(), "{err}");
        }

        let not_retried = [
            ModelError::Upstream {
                status: 429,
                body: String::new(),
            },
            ModelError::Extraction("no candidates".into()),
            ModelError::Cancelled,
        ];
        for err in not_retried {
            assert!(!err.category().is_retryable(), "{err}");
        }
    }

    #[test]
    fn test_fatal_classification() {
        assert!(QuizError::Config("missing key".into()).is_fatal());
        assert!(QuizError::InvalidInput("empty".into()).is_fatal());
        assert!(QuizError::Pipeline { issues: vec![] }.is_fatal());
        assert!(!QuizError::Parse("no json".into()).is_fatal());
        assert!(!QuizError::validation(vec!["x".into()]).is_fatal());
        assert!(!QuizError::Model(ModelError::Cancelled).is_fatal());
    }

    #[test]
    fn test_validation_error_lists_every_issue() {
        let err = QuizError::validation(vec!["first".into(), "second".into()]);
        assert_eq!(
            err.to_string(),
            "Validation failed with 2 issue(s): first; second"
        );
    }

    #[test]
    fn test_pipeline_error_display() {
        let err = QuizError::Pipeline {
            issues: vec!["Question 1 is empty".into()],
        };
        assert_eq!(
            err.to_string(),
            "Pipeline error: fallback quiz failed validation: Question 1 is empty"
        );
    }
}
