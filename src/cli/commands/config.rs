//! Config Command
//!
//! Usage:
//!   quizforge config show [--format json]
//!   quizforge config path
//!   quizforge config init [--global] [--force]

use clap::ValueEnum;

use crate::cli::ui::Output;
use crate::cli::util::{CommandContext, GlobalArgs, display_path};
use crate::config::{ConfigFormat, ConfigLoader};
use crate::constants::model::API_KEY_ENV;
use crate::types::Result;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum ShowFormat {
    #[default]
    Toml,
    Json,
}

impl From<ShowFormat> for ConfigFormat {
    fn from(format: ShowFormat) -> Self {
        match format {
            ShowFormat::Toml => ConfigFormat::Toml,
            ShowFormat::Json => ConfigFormat::Json,
        }
    }
}

/// Print the merged effective configuration
pub fn show(format: ShowFormat, args: &GlobalArgs) -> Result<()> {
    let ctx = CommandContext::load(args)?;
    println!("{}", ConfigLoader::render(&ctx.config, format.into())?);

    let key_state = if ctx.config.llm.credential().is_ok() {
        "set"
    } else {
        "missing"
    };
    ctx.output.info(&format!("{} is {}", API_KEY_ENV, key_state));
    Ok(())
}

/// Show where configuration is read from
pub fn path(args: &GlobalArgs) -> Result<()> {
    let output = Output::new(false);
    output.section("Configuration Sources");

    match ConfigLoader::global_config_path() {
        Some(global) => output.field("Global", describe(&global)),
        None => output.field("Global", "unavailable"),
    }

    let project = args
        .config
        .clone()
        .unwrap_or_else(ConfigLoader::project_config_path);
    output.field("Project", describe(&project));
    output.field("Environment", "QUIZFORGE_<SECTION>__<KEY>");
    output.field("Credential", API_KEY_ENV);
    Ok(())
}

fn describe(path: &std::path::Path) -> String {
    if path.exists() {
        display_path(path)
    } else {
        format!("{} (not found)", path.display())
    }
}

/// Write a default config file
pub fn init(global: bool, force: bool, args: &GlobalArgs) -> Result<()> {
    let output = Output::new(args.quiet);
    let (path, written) = if global {
        ConfigLoader::init_global(force)?
    } else {
        ConfigLoader::init_project(force)?
    };

    if written {
        output.success(&format!("Wrote {}", display_path(&path)));
    } else {
        output.warning(&format!(
            "{} already exists; use --force to overwrite",
            path.display()
        ));
    }
    Ok(())
}
