//! Quiz Generation Pipeline
//!
//! Text in, validated quiz out:
//!
//! - `analyzer`: content type and text metrics
//! - `sampler`: head/middle/tail sample for oversized text
//! - `fallback`: template questions when the model path fails
//! - `validator`: final structural gate
//! - `orchestrator`: `QuizPipeline`, which sequences all of the above

pub mod analyzer;
pub mod fallback;
pub mod orchestrator;
pub mod sampler;
pub mod validator;

pub use analyzer::{analyze, classify};
pub use fallback::FALLBACK_POOL_SIZE;
pub use orchestrator::{FallbackReason, PipelineRun, PipelineStage, QuizPipeline};
pub use sampler::sample;
pub use validator::{ValidationReport, validate};
