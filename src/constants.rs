//! Global Constants
//!
//! Centralized constants for configuration and tuning.
//! All magic numbers should be defined here with documentation.

/// Generative endpoint constants
pub mod model {
    /// Default API base for the Gemini REST API
    pub const DEFAULT_API_BASE: &str = "https://generativelanguage.googleapis.com/v1beta";

    /// Default model name
    pub const DEFAULT_MODEL: &str = "gemini-1.5-flash";

    /// Environment variable holding the API credential
    pub const API_KEY_ENV: &str = "GEMINI_API_KEY";

    /// Sampling temperature
    pub const TEMPERATURE: f32 = 0.7;

    /// Nucleus sampling cutoff
    pub const TOP_P: f32 = 0.8;

    /// Top-k sampling cutoff
    pub const TOP_K: u32 = 40;

    /// Maximum tokens the model may generate
    pub const MAX_OUTPUT_TOKENS: u32 = 2048;
}

/// Retry policy constants
pub mod retry {
    /// Default number of attempts per generation call
    pub const DEFAULT_MAX_RETRIES: u32 = 3;

    /// Backoff unit (milliseconds). Overload waits `2 * attempt` units,
    /// transport failures wait `attempt` units.
    pub const BACKOFF_UNIT_MS: u64 = 1000;

    /// Multiplier applied to the backoff unit after an HTTP 503
    pub const OVERLOAD_BACKOFF_FACTOR: u32 = 2;
}

/// HTTP/Network constants
pub mod network {
    /// Default request timeout (seconds)
    pub const DEFAULT_TIMEOUT_SECS: u64 = 60;

    /// Maximum characters of an error body kept in error messages
    pub const MAX_ERROR_BODY_CHARS: usize = 500;
}

/// Quiz shape constants
pub mod quiz {
    /// Options every question must carry
    pub const OPTIONS_PER_QUESTION: usize = 4;

    /// Questions generated when the caller does not ask for a count
    pub const DEFAULT_QUESTION_COUNT: usize = 5;

    /// Upper bound on requested questions
    pub const MAX_QUESTION_COUNT: usize = 20;
}

/// Text sampling constants
pub mod sampling {
    /// Maximum characters of source text sent to the model
    pub const MAX_SAMPLE_CHARS: usize = 4000;

    /// Smallest sample size accepted by configuration validation
    pub const MIN_SAMPLE_CHARS: usize = 300;

    /// Marker inserted between sampled windows
    pub const ELISION_MARKER: &str = "\n\n[... content continues ...]\n\n";
}

/// Content analysis constants
pub mod analysis {
    /// Average reading speed used for the reading time estimate
    pub const WORDS_PER_MINUTE: usize = 200;
}

/// Text extraction constants
pub mod extraction {
    /// Largest input file accepted (10MB)
    pub const MAX_FILE_SIZE: u64 = 10 * 1024 * 1024;

    /// Extracted text shorter than this is treated as unusable
    pub const MIN_TEXT_CHARS: usize = 100;

    /// Characters shown in log previews
    pub const PREVIEW_CHARS: usize = 200;
}
