//! Configuration Management
//!
//! Unified configuration system with hierarchical resolution:
//! 1. Built-in defaults
//! 2. Global config (`<config dir>/quizforge/config.toml`)
//! 3. Project config (`./quizforge.toml`)
//! 4. Environment variables (`QUIZFORGE_*`, `GEMINI_API_KEY`)
//! 5. CLI arguments (highest priority)

mod loader;
mod types;

pub use loader::{ConfigFormat, ConfigLoader, PROJECT_CONFIG_FILE};
pub use types::*;
