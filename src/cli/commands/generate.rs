//! Generate Command
//!
//! Extract text from a file, run the quiz pipeline and print the quiz.
//!
//! Usage:
//!   quizforge generate notes.txt [-n 8] [--format yaml] [--offline]

use std::path::PathBuf;

use clap::ValueEnum;
use tracing::warn;

use crate::ai::Cancellation;
use crate::cli::util::{CommandContext, GlobalArgs, runtime};
use crate::extract::{PlainTextExtractor, TextExtractor};
use crate::quiz::{PipelineRun, QuizPipeline};
use crate::types::{Quiz, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum QuizFormat {
    #[default]
    Json,
    Yaml,
}

#[derive(Debug, Clone)]
pub struct GenerateOptions {
    pub file: PathBuf,
    /// Falls back to `quiz.default_question_count`
    pub count: Option<usize>,
    pub format: QuizFormat,
    /// Skip the model entirely and use the template questions
    pub offline: bool,
}

pub fn run(options: GenerateOptions, args: &GlobalArgs) -> Result<()> {
    let ctx = CommandContext::load(args)?;
    let text = PlainTextExtractor::new().extract(&options.file)?;
    let count = options
        .count
        .unwrap_or(ctx.config.quiz.default_question_count);

    let pipeline = if options.offline {
        QuizPipeline::offline(ctx.config.quiz.clone())
    } else {
        QuizPipeline::from_config(&ctx.config)?
    };

    let cancel = Cancellation::new();
    let rt = runtime()?;
    let run = rt.block_on(async {
        let on_interrupt = cancel.clone();
        tokio::spawn(async move {
            if tokio::signal::ctrl_c().await.is_ok() {
                warn!("Interrupted, finishing with fallback questions");
                on_interrupt.cancel();
            }
        });
        pipeline.run(&text, count, &cancel).await
    })?;

    println!("{}", render(&run.quiz, options.format)?);
    summarize(&ctx, &run, options.offline);
    Ok(())
}

pub fn render(quiz: &Quiz, format: QuizFormat) -> Result<String> {
    match format {
        QuizFormat::Json => Ok(serde_json::to_string_pretty(quiz)?),
        QuizFormat::Yaml => Ok(serde_yaml::to_string(quiz)?),
    }
}

fn summarize(ctx: &CommandContext, run: &PipelineRun, offline: bool) {
    let metadata = &run.quiz.metadata;
    ctx.output.success(&format!(
        "Generated {} question(s) for {} content ({})",
        metadata.question_count, metadata.content_type, metadata.generation_method
    ));

    if let Some(reason) = &run.fallback
        && !offline
    {
        ctx.output
            .warning(&format!("Used template questions because {}", reason));
    }

    if metadata.requested_count > metadata.question_count {
        ctx.output.warning(&format!(
            "Requested {} question(s), only {} available",
            metadata.requested_count, metadata.question_count
        ));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{ContentAnalysis, ContentType, GenerationMethod, QuizQuestion};

    fn quiz() -> Quiz {
        let analysis = ContentAnalysis {
            word_count: 120,
            char_count: 700,
            paragraph_count: 3,
            content_type: ContentType::History,
            reading_time_minutes: 1,
        };
        Quiz::new(
            vec![QuizQuestion::new(
                "When did the war end?",
                ["1945", "1918", "1939", "1950"],
                0,
            )],
            &analysis,
            GenerationMethod::Ai,
            1,
        )
    }

    #[test]
    fn test_render_json() {
        let json = render(&quiz(), QuizFormat::Json).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["questions"][0]["correct"], 0);
        assert_eq!(value["metadata"]["generationMethod"], "AI");
        assert_eq!(value["metadata"]["contentType"], "History");
    }

    #[test]
    fn test_render_yaml() {
        let yaml = render(&quiz(), QuizFormat::Yaml).unwrap();
        assert!(yaml.contains("question: When did the war end?"));
        assert!(yaml.contains("generationMethod: AI"));
    }
}
