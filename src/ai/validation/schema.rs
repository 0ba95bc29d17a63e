//! Quiz Schema Validation
//!
//! Checks a parsed model reply against the quiz shape:
//! - Top-level `questions` is a non-empty array
//! - Each question has non-empty `question` text
//! - Each question has exactly 4 non-empty `options`
//! - Each question has an integer `correct` in `0..4`
//!
//! Every defect is collected; nothing short-circuits. A question contributes
//! at most one issue per field, so a question missing all three fields yields
//! three issues.

use serde_json::Value;
use std::fmt;

use crate::constants::quiz::OPTIONS_PER_QUESTION;
use crate::types::QuizQuestion;

/// Severity levels for schema issues
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IssueSeverity {
    /// The payload is unusable
    Error,
    /// Usable, but not what was asked for
    Warning,
}

impl fmt::Display for IssueSeverity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IssueSeverity::Error => write!(f, "ERROR"),
            IssueSeverity::Warning => write!(f, "WARN"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationIssue {
    pub severity: IssueSeverity,
    pub message: String,
    pub location: Option<String>,
}

impl ValidationIssue {
    pub fn error(message: impl Into<String>) -> Self {
        Self {
            severity: IssueSeverity::Error,
            message: message.into(),
            location: None,
        }
    }

    pub fn warning(message: impl Into<String>) -> Self {
        Self {
            severity: IssueSeverity::Warning,
            message: message.into(),
            location: None,
        }
    }

    pub fn at(mut self, location: impl Into<String>) -> Self {
        self.location = Some(location.into());
        self
    }
}

impl fmt::Display for ValidationIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.location {
            Some(location) => write!(f, "[{}] {} ({})", self.severity, self.message, location),
            None => write!(f, "[{}] {}", self.severity, self.message),
        }
    }
}

/// Outcome of checking a payload
#[derive(Debug, Clone, PartialEq)]
pub enum SchemaCheck {
    Valid {
        questions: Vec<QuizQuestion>,
        warnings: Vec<ValidationIssue>,
    },
    Invalid(Vec<ValidationIssue>),
}

impl SchemaCheck {
    pub fn is_valid(&self) -> bool {
        matches!(self, Self::Valid { .. })
    }
}

/// Schema checker for quiz payloads
#[derive(Debug, Clone, Copy)]
pub struct QuizSchema {
    /// Number of questions the prompt asked for
    expected_count: usize,
}

impl QuizSchema {
    pub fn new(expected_count: usize) -> Self {
        Self { expected_count }
    }

    pub fn check(&self, value: &Value) -> SchemaCheck {
        let Some(object) = value.as_object() else {
            return SchemaCheck::Invalid(vec![ValidationIssue::error(
                "Response is not a JSON object",
            )]);
        };

        let entries = match object.get("questions") {
            None => {
                return SchemaCheck::Invalid(vec![
                    ValidationIssue::error("Missing 'questions' array").at("questions"),
                ]);
            }
            Some(Value::Array(entries)) if entries.is_empty() => {
                return SchemaCheck::Invalid(vec![
                    ValidationIssue::error("'questions' array is empty").at("questions"),
                ]);
            }
            Some(Value::Array(entries)) => entries,
            Some(_) => {
                return SchemaCheck::Invalid(vec![
                    ValidationIssue::error("'questions' must be an array").at("questions"),
                ]);
            }
        };

        let mut errors = Vec::new();
        let mut questions = Vec::with_capacity(entries.len());

        for (i, entry) in entries.iter().enumerate() {
            if let Some(question) = self.check_question(i, entry, &mut errors) {
                questions.push(question);
            }
        }

        if !errors.is_empty() {
            return SchemaCheck::Invalid(errors);
        }

        let mut warnings = Vec::new();
        if questions.len() != self.expected_count {
            warnings.push(
                ValidationIssue::warning(format!(
                    "Expected {} questions, got {}",
                    self.expected_count,
                    questions.len()
                ))
                .at("questions"),
            );
        }

        SchemaCheck::Valid {
            questions,
            warnings,
        }
    }

    /// Check one entry; returns the question only when every field is valid
    fn check_question(
        &self,
        index: usize,
        entry: &Value,
        errors: &mut Vec<ValidationIssue>,
    ) -> Option<QuizQuestion> {
        let n = index + 1;
        let location = |field: &str| format!("questions[{}].{}", index, field);

        let Some(object) = entry.as_object() else {
            errors.push(
                ValidationIssue::error(format!("Question {} is not an object", n))
                    .at(format!("questions[{}]", index)),
            );
            return None;
        };

        let before = errors.len();

        let text = match object.get("question") {
            None => {
                errors.push(
                    ValidationIssue::error(format!("Question {} is missing 'question'", n))
                        .at(location("question")),
                );
                None
            }
            Some(Value::String(text)) if !text.trim().is_empty() => Some(text.clone()),
            Some(_) => {
                errors.push(
                    ValidationIssue::error(format!("Question {} is empty", n))
                        .at(location("question")),
                );
                None
            }
        };

        let options = match object.get("options") {
            None => {
                errors.push(
                    ValidationIssue::error(format!("Question {} is missing 'options'", n))
                        .at(location("options")),
                );
                None
            }
            Some(Value::Array(items)) => {
                let valid: Vec<String> = items
                    .iter()
                    .filter_map(Value::as_str)
                    .filter(|s| !s.trim().is_empty())
                    .map(str::to_string)
                    .collect();

                if items.len() == OPTIONS_PER_QUESTION && valid.len() == OPTIONS_PER_QUESTION {
                    Some(valid)
                } else {
                    errors.push(
                        ValidationIssue::error(format!(
                            "Question {} doesn't have {} valid options (found {} of {})",
                            n,
                            OPTIONS_PER_QUESTION,
                            valid.len(),
                            items.len()
                        ))
                        .at(location("options")),
                    );
                    None
                }
            }
            Some(_) => {
                errors.push(
                    ValidationIssue::error(format!("Question {} 'options' is not an array", n))
                        .at(location("options")),
                );
                None
            }
        };

        let correct = match object.get("correct") {
            None => {
                errors.push(
                    ValidationIssue::error(format!("Question {} is missing 'correct'", n))
                        .at(location("correct")),
                );
                None
            }
            Some(value) => match value
                .as_u64()
                .and_then(|index| usize::try_from(index).ok())
                .filter(|index| *index < OPTIONS_PER_QUESTION)
            {
                Some(index) => Some(index),
                None => {
                    errors.push(
                        ValidationIssue::error(format!(
                            "Question {} has invalid correct index {} (expected 0-{})",
                            n,
                            value,
                            OPTIONS_PER_QUESTION - 1
                        ))
                        .at(location("correct")),
                    );
                    None
                }
            },
        };

        if errors.len() > before {
            return None;
        }

        Some(QuizQuestion {
            question: text?,
            options: options?,
            correct: correct?,
        })
    }
}
