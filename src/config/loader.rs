//! Configuration Loader (Figment-based)
//!
//! Loads and merges configuration from multiple sources using Figment:
//! 1. Built-in defaults (Serialized)
//! 2. Global config (`<config dir>/quizforge/config.toml`)
//! 3. Project config (`./quizforge.toml`, or an explicit `--config` file)
//! 4. Environment variables (`QUIZFORGE_<SECTION>__<KEY>`)
//! 5. `GEMINI_API_KEY` for the credential

use directories::ProjectDirs;
use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use std::fs;
use std::path::{Path, PathBuf};

use tracing::{debug, info};

use super::types::Config;
use crate::constants::model::API_KEY_ENV;
use crate::types::{QuizError, Result};

/// Project-level config file name
pub const PROJECT_CONFIG_FILE: &str = "quizforge.toml";

/// Prefix for environment overrides
const ENV_PREFIX: &str = "QUIZFORGE_";

/// Output formats for `config show`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigFormat {
    Toml,
    Json,
}

/// Configuration loader
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load configuration with full resolution chain:
    /// defaults → global → project → env vars
    pub fn load() -> Result<Config> {
        Self::load_with(None)
    }

    /// Like `load`, but an explicit file replaces `./quizforge.toml`
    pub fn load_with(explicit: Option<&Path>) -> Result<Config> {
        if let Some(path) = explicit
            && !path.exists()
        {
            return Err(QuizError::Config(format!(
                "Config file not found: {}",
                path.display()
            )));
        }

        Self::extract(Self::figment(explicit))
    }

    /// Build the layered figment without extracting it
    pub fn figment(explicit: Option<&Path>) -> Figment {
        let mut figment = Figment::new().merge(Serialized::defaults(Config::default()));

        if let Some(global_path) = Self::global_config_path()
            && global_path.exists()
        {
            debug!("Loading global config from: {}", global_path.display());
            figment = figment.merge(Toml::file(&global_path));
        }

        let project_path = explicit
            .map(Path::to_path_buf)
            .unwrap_or_else(Self::project_config_path);
        if project_path.exists() {
            debug!("Loading project config from: {}", project_path.display());
            figment = figment.merge(Toml::file(&project_path));
        }

        // QUIZFORGE_LLM__MODEL -> llm.model
        figment = figment.merge(Env::prefixed(ENV_PREFIX).split("__").lowercase(true));

        figment.merge(
            Env::raw()
                .only(&[API_KEY_ENV])
                .map(|_| "llm.api_key".into()),
        )
    }

    /// Extract and validate a figment
    pub fn extract(figment: Figment) -> Result<Config> {
        let config: Config = figment
            .extract()
            .map_err(|e| QuizError::Config(format!("Configuration error: {}", e)))?;

        config.validate()?;

        Ok(config)
    }

    // =========================================================================
    // Path Management
    // =========================================================================

    /// Global config directory (e.g. ~/.config/quizforge/)
    pub fn global_dir() -> Option<PathBuf> {
        ProjectDirs::from("", "", "quizforge").map(|dirs| dirs.config_dir().to_path_buf())
    }

    pub fn global_config_path() -> Option<PathBuf> {
        Self::global_dir().map(|dir| dir.join("config.toml"))
    }

    pub fn project_config_path() -> PathBuf {
        PathBuf::from(PROJECT_CONFIG_FILE)
    }

    // =========================================================================
    // Config Commands
    // =========================================================================

    /// Render the effective configuration; the credential is never included
    pub fn render(config: &Config, format: ConfigFormat) -> Result<String> {
        match format {
            ConfigFormat::Json => Ok(serde_json::to_string_pretty(config)?),
            ConfigFormat::Toml => {
                toml::to_string_pretty(config).map_err(|e| QuizError::Config(e.to_string()))
            }
        }
    }

    /// Write the default project config to `./quizforge.toml`
    pub fn init_project(force: bool) -> Result<(PathBuf, bool)> {
        let path = Self::project_config_path();
        let written = Self::write_template(&path, force)?;
        Ok((path, written))
    }

    /// Write the default global config
    pub fn init_global(force: bool) -> Result<(PathBuf, bool)> {
        let path = Self::global_config_path().ok_or_else(|| {
            QuizError::Config("Cannot determine global config directory".to_string())
        })?;
        let written = Self::write_template(&path, force)?;
        Ok((path, written))
    }

    /// Write the config template; returns false when an existing file was kept
    pub fn write_template(path: &Path, force: bool) -> Result<bool> {
        if path.exists() && !force {
            info!("Config exists: {}", path.display());
            return Ok(false);
        }

        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
        {
            fs::create_dir_all(parent)?;
        }

        fs::write(path, Self::default_config_template())?;
        info!("Created config: {}", path.display());
        Ok(true)
    }

    /// Default config file content (TOML)
    fn default_config_template() -> String {
        format!(
            r#"# quizforge configuration
# Values here override built-in defaults; QUIZFORGE_<SECTION>__<KEY>
# environment variables override this file.
# The API key is read from {key_env}; do not commit it here.

version = "1.0"

[llm]
provider = "gemini"
model = "gemini-1.5-flash"
api_base = "https://generativelanguage.googleapis.com/v1beta"
timeout_secs = 60
temperature = 0.7
top_p = 0.8
top_k = 40
max_output_tokens = 2048
max_retries = 3
backoff_unit_ms = 1000

[quiz]
default_question_count = 5
max_question_count = 20
max_sample_chars = 4000
"#,
            key_env = API_KEY_ENV
        )
    }
}
