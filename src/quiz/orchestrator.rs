//! Quiz Pipeline
//!
//! Sequences analysis, sampling, prompting, the model call, parsing and
//! validation, and falls back to template questions when any step of the
//! AI branch fails.
//!
//! ```text
//! Init -> Sampling -> Prompting -> ModelCall -> Parsing -> Validating -> Done
//!                                     |            |           |
//!                                     +------------+-----------+--> Fallback -> Validating -> Done
//! ```
//!
//! Only three outcomes reach the caller as errors: invalid input, missing
//! configuration, and a fallback quiz that fails validation.

use serde::Serialize;
use std::fmt;
use tracing::{debug, info, instrument, warn};

use super::{analyzer, fallback, sampler, validator};
use crate::ai::cancel::Cancellation;
use crate::ai::prompt::build_quiz_prompt;
use crate::ai::provider::{SharedGenerator, create_generator};
use crate::ai::validation::ResponseParser;
use crate::config::{Config, QuizConfig};
use crate::types::{ContentAnalysis, GenerationMethod, Quiz, QuizError, Result};

/// Pipeline states, used for logging and fallback attribution
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PipelineStage {
    Init,
    Sampling,
    Prompting,
    ModelCall,
    Parsing,
    Validating,
    Fallback,
    Done,
}

impl fmt::Display for PipelineStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Init => "init",
            Self::Sampling => "sampling",
            Self::Prompting => "prompting",
            Self::ModelCall => "model_call",
            Self::Parsing => "parsing",
            Self::Validating => "validating",
            Self::Fallback => "fallback",
            Self::Done => "done",
        };
        f.write_str(name)
    }
}

/// Why the AI branch was abandoned
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FallbackReason {
    pub stage: PipelineStage,
    pub error: String,
}

impl FallbackReason {
    fn new(stage: PipelineStage, error: impl fmt::Display) -> Self {
        Self {
            stage,
            error: error.to_string(),
        }
    }
}

impl fmt::Display for FallbackReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} failed: {}", self.stage, self.error)
    }
}

/// A validated quiz and, when the fallback produced it, the reason why
#[derive(Debug, Clone)]
pub struct PipelineRun {
    pub quiz: Quiz,
    pub fallback: Option<FallbackReason>,
}

pub struct QuizPipeline {
    /// `None` runs fully offline on the fallback branch
    generator: Option<SharedGenerator>,
    parser: ResponseParser,
    settings: QuizConfig,
}

impl QuizPipeline {
    pub fn new(generator: SharedGenerator, settings: QuizConfig) -> Self {
        Self {
            generator: Some(generator),
            parser: ResponseParser::new(),
            settings,
        }
    }

    /// Pipeline that never calls a model
    pub fn offline(settings: QuizConfig) -> Self {
        Self {
            generator: None,
            parser: ResponseParser::new(),
            settings,
        }
    }

    /// Build the production pipeline; fails with `QuizError::Config` when the
    /// credential is missing
    pub fn from_config(config: &Config) -> Result<Self> {
        let generator = create_generator(&config.llm)?;
        Ok(Self::new(generator, config.quiz.clone()))
    }

    /// Generate a quiz, returning only the quiz
    pub async fn generate_quiz(&self, text: &str, question_count: usize) -> Result<Quiz> {
        self.run(text, question_count, &Cancellation::new())
            .await
            .map(|run| run.quiz)
    }

    /// Generate a quiz, reporting which branch produced it
    #[instrument(skip_all, fields(question_count = question_count, chars = text.len()))]
    pub async fn run(
        &self,
        text: &str,
        question_count: usize,
        cancel: &Cancellation,
    ) -> Result<PipelineRun> {
        self.check_input(text, question_count)?;

        let analysis = analyzer::analyze(text);
        info!(
            stage = %PipelineStage::Init,
            content_type = %analysis.content_type,
            words = analysis.word_count,
            "Analyzed content"
        );

        let reason = match self
            .generate_with_model(text, &analysis, question_count, cancel)
            .await
        {
            Ok(quiz) => {
                info!(
                    stage = %PipelineStage::Done,
                    questions = quiz.questions.len(),
                    method = %GenerationMethod::Ai,
                    "Quiz generated"
                );
                return Ok(PipelineRun {
                    quiz,
                    fallback: None,
                });
            }
            Err(reason) => reason,
        };

        warn!(
            stage = %PipelineStage::Fallback,
            failed_stage = %reason.stage,
            error = %reason.error,
            "AI generation failed, using fallback questions"
        );

        let quiz = fallback::generate(&analysis, question_count);
        let report = validator::validate(&quiz);
        if !report.is_valid {
            return Err(QuizError::Pipeline {
                issues: report.issues,
            });
        }

        info!(
            stage = %PipelineStage::Done,
            questions = quiz.questions.len(),
            method = %GenerationMethod::Fallback,
            "Quiz generated"
        );
        Ok(PipelineRun {
            quiz,
            fallback: Some(reason),
        })
    }

    fn check_input(&self, text: &str, question_count: usize) -> Result<()> {
        if text.trim().is_empty() {
            return Err(QuizError::InvalidInput("text is empty".to_string()));
        }

        let max = self.settings.max_question_count;
        if !(1..=max).contains(&question_count) {
            return Err(QuizError::InvalidInput(format!(
                "question count must be between 1 and {}, got {}",
                max, question_count
            )));
        }

        Ok(())
    }

    /// The AI branch; any error becomes a `FallbackReason`
    async fn generate_with_model(
        &self,
        text: &str,
        analysis: &ContentAnalysis,
        question_count: usize,
        cancel: &Cancellation,
    ) -> std::result::Result<Quiz, FallbackReason> {
        let Some(generator) = &self.generator else {
            return Err(FallbackReason::new(
                PipelineStage::ModelCall,
                "offline mode, no model configured",
            ));
        };

        let sample = sampler::sample(text, self.settings.max_sample_chars);
        debug!(
            stage = %PipelineStage::Sampling,
            sample_chars = sample.chars().count(),
            "Sampled text"
        );

        let prompt = build_quiz_prompt(&sample, question_count, analysis.content_type);
        debug!(stage = %PipelineStage::Prompting, prompt_chars = prompt.len(), "Built prompt");

        debug!(
            stage = %PipelineStage::ModelCall,
            provider = generator.name(),
            model = generator.model(),
            "Calling model"
        );
        let raw = generator
            .generate(&prompt, cancel)
            .await
            .map_err(|e| FallbackReason::new(PipelineStage::ModelCall, e))?;

        debug!(stage = %PipelineStage::Parsing, reply_chars = raw.len(), "Parsing reply");
        let parsed = self
            .parser
            .parse(&raw, question_count)
            .map_err(|e| FallbackReason::new(PipelineStage::Parsing, e))?;

        let quiz = Quiz::new(
            parsed.questions,
            analysis,
            GenerationMethod::Ai,
            question_count,
        );

        let report = validator::validate(&quiz);
        debug!(stage = %PipelineStage::Validating, valid = report.is_valid, "Validated quiz");
        if !report.is_valid {
            return Err(FallbackReason::new(
                PipelineStage::Validating,
                report.issues.join("; "),
            ));
        }

        Ok(quiz)
    }
}
