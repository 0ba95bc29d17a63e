pub mod content;
pub mod error;
pub mod quiz;

pub use content::{ContentAnalysis, ContentType};
pub use error::{ErrorCategory, ModelError, QuizError, Result, ValidationError};
pub use quiz::{GenerationMethod, Quiz, QuizMetadata, QuizQuestion};
