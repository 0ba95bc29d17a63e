//! AI Integration Layer
//!
//! Everything that talks to, or about, the generative model: the provider
//! client, prompt construction, reply validation, timeouts and cancellation.

pub mod cancel;
pub mod prompt;
pub mod provider;
pub mod timeout;
pub mod validation;

pub use cancel::Cancellation;
pub use prompt::{PromptBuilder, PromptSection, build_quiz_prompt, quiz_prompt};
pub use provider::{
    GeminiClient, HttpReply, HttpTransport, ModelInfo, ReqwestTransport, RetryPolicy,
    SharedGenerator, TextGenerator, TransportError, create_generator,
};
pub use timeout::{TimeoutElapsed, with_timeout};
pub use validation::{ParsedQuiz, ResponseParser, ValidationIssue, extract_json_object};
