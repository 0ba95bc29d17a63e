//! Shared command plumbing

use std::path::{Path, PathBuf};

use tokio::runtime::Runtime;

use crate::cli::ui::Output;
use crate::config::{Config, ConfigLoader};
use crate::types::Result;

/// Global flags every command sees
#[derive(Debug, Clone, Default)]
pub struct GlobalArgs {
    /// Explicit config file replacing `./quizforge.toml`
    pub config: Option<PathBuf>,
    pub quiet: bool,
}

/// Resolved configuration plus console output for one command
pub struct CommandContext {
    pub config: Config,
    pub output: Output,
}

impl CommandContext {
    pub fn load(args: &GlobalArgs) -> Result<Self> {
        Ok(Self {
            config: ConfigLoader::load_with(args.config.as_deref())?,
            output: Output::new(args.quiet),
        })
    }
}

/// Runtime for the async parts of a command
pub fn runtime() -> Result<Runtime> {
    Ok(Runtime::new()?)
}

pub fn display_path(path: &Path) -> String {
    path.canonicalize()
        .unwrap_or_else(|_| path.to_path_buf())
        .display()
        .to_string()
}
