use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use quizforge::cli::GlobalArgs;
use quizforge::cli::ui::Output;
use quizforge::cli::commands::{analyze, config, generate, models, ping};

#[derive(Parser)]
#[command(name = "quizforge")]
#[command(
    version,
    about = "Turn document text into a validated multiple-choice quiz"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    #[arg(long, short, global = true, help = "Config file (replaces ./quizforge.toml)")]
    config: Option<PathBuf>,

    #[arg(long, global = true)]
    verbose: bool,

    #[arg(long, short, global = true)]
    quiet: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate a quiz from a text file
    Generate {
        #[arg(help = "Plain-text file to quiz on")]
        file: PathBuf,
        #[arg(short = 'n', long = "count", help = "Number of questions")]
        count: Option<usize>,
        #[arg(short = 'f', long, value_enum, default_value_t = generate::QuizFormat::Json)]
        format: generate::QuizFormat,
        #[arg(long, help = "Use template questions only, no model call")]
        offline: bool,
    },

    /// Show content metrics and detected subject area
    Analyze {
        file: PathBuf,
        #[arg(short = 'f', long, value_enum, default_value_t = analyze::AnalysisFormat::Text)]
        format: analyze::AnalysisFormat,
    },

    /// List models available to the configured API key
    Models,

    /// Check the configured model answers
    Ping,

    /// Manage configuration
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand)]
enum ConfigAction {
    /// Show current configuration (merged from all sources)
    Show {
        #[arg(short = 'f', long, value_enum, default_value_t = config::ShowFormat::Toml)]
        format: config::ShowFormat,
    },
    /// Show configuration file paths
    Path,
    /// Write a default configuration file
    Init {
        #[arg(long, short, help = "Initialize global config")]
        global: bool,
        #[arg(long, help = "Overwrite existing config")]
        force: bool,
    },
}

fn main() -> ExitCode {
    match run_cli() {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            Output::default().error(&format!("{:#}", e));
            ExitCode::FAILURE
        }
    }
}

fn run_cli() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose {
        "debug"
    } else if cli.quiet {
        "error"
    } else {
        "info"
    };

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| filter.into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let args = GlobalArgs {
        config: cli.config,
        quiet: cli.quiet,
    };

    match cli.command {
        Commands::Generate {
            file,
            count,
            format,
            offline,
        } => {
            generate::run(
                generate::GenerateOptions {
                    file,
                    count,
                    format,
                    offline,
                },
                &args,
            )?;
        }
        Commands::Analyze { file, format } => {
            analyze::run(&file, format)?;
        }
        Commands::Models => {
            models::run(&args)?;
        }
        Commands::Ping => {
            ping::run(&args)?;
        }
        Commands::Config { action } => match action {
            ConfigAction::Show { format } => {
                config::show(format, &args)?;
            }
            ConfigAction::Path => {
                config::path(&args)?;
            }
            ConfigAction::Init { global, force } => {
                config::init(global, force, &args)?;
            }
        },
    }

    Ok(())
}
