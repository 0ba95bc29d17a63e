//! quizforge - Document Text to Multiple-Choice Quiz
//!
//! Turns extracted document text into a validated quiz. A generative model
//! writes the questions when it can; a deterministic, content-aware template
//! set takes over whenever any step of the model path fails, so a run always
//! ends with a structurally valid quiz or a single fatal error.
//!
//! ## Quick Start
//!
//! ```ignore
//! use quizforge::{ConfigLoader, QuizPipeline};
//!
//! let config = ConfigLoader::load()?;
//! let pipeline = QuizPipeline::from_config(&config)?;
//! let quiz = pipeline.generate_quiz(&text, 5).await?;
//! ```
//!
//! ## Modules
//!
//! - [`ai`]: Gemini client with retry/backoff, prompt builder, reply validation
//! - [`quiz`]: analyzer, sampler, fallback templates, validator, pipeline
//! - [`extract`]: text extractor interface and plain-text implementation
//! - [`config`]: layered configuration

pub mod ai;
pub mod cli;
pub mod config;
pub mod constants;
pub mod extract;
pub mod quiz;
pub mod types;

// =============================================================================
// Core Re-exports
// =============================================================================

pub use config::{Config, ConfigLoader, LlmConfig, QuizConfig};

pub use types::error::{ErrorCategory, ModelError, QuizError, Result, ValidationError};
pub use types::{ContentAnalysis, ContentType, GenerationMethod, Quiz, QuizMetadata, QuizQuestion};

// =============================================================================
// Pipeline Re-exports
// =============================================================================

pub use quiz::{FallbackReason, PipelineRun, PipelineStage, QuizPipeline, ValidationReport};

pub use ai::{
    Cancellation, GeminiClient, ResponseParser, SharedGenerator, TextGenerator, create_generator,
};

pub use extract::{PlainTextExtractor, TextExtractor};
