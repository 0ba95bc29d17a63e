//! Model Response Validation
//!
//! Turns untrusted model text into quiz questions:
//! 1. Extract the first JSON object (code fences and prose tolerated)
//! 2. Check it against the quiz schema, collecting every defect
//!
//! A reply that cannot be parsed is a `QuizError::Parse`; one that parses but
//! breaks the schema is a `QuizError::Validation` listing all issues.

mod json_extract;
mod schema;

pub use json_extract::{JsonExtractor, extract_json_object};
pub use schema::{IssueSeverity, QuizSchema, SchemaCheck, ValidationIssue};

use tracing::{debug, warn};

use crate::types::{QuizError, QuizQuestion, Result};

/// Questions accepted from a model reply, plus non-fatal observations
#[derive(Debug, Clone, PartialEq)]
pub struct ParsedQuiz {
    pub questions: Vec<QuizQuestion>,
    pub warnings: Vec<ValidationIssue>,
}

/// Parser for quiz replies
#[derive(Debug, Default)]
pub struct ResponseParser {
    extractor: JsonExtractor,
}

impl ResponseParser {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a raw reply to a prompt that asked for `expected_count` questions
    pub fn parse(&self, raw: &str, expected_count: usize) -> Result<ParsedQuiz> {
        let value = self.extractor.extract(raw)?;

        match QuizSchema::new(expected_count).check(&value) {
            SchemaCheck::Valid {
                questions,
                warnings,
            } => {
                for warning in &warnings {
                    warn!("{}", warning);
                }
                debug!(questions = questions.len(), "Model reply passed schema check");
                Ok(ParsedQuiz {
                    questions,
                    warnings,
                })
            }
            SchemaCheck::Invalid(issues) => {
                warn!(issues = issues.len(), "Model reply failed schema check");
                Err(QuizError::validation(
                    issues.into_iter().map(|issue| issue.message).collect(),
                ))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_fenced_reply() {
        let raw = r#"```json
{
  "questions": [
    {"question": "Which layer routes packets?", "options": ["Network", "Session", "Physical", "Application"], "correct": 0}
  ]
}
```"#;
        let parsed = ResponseParser::new().parse(raw, 1).unwrap();
        assert_eq!(parsed.questions.len(), 1);
        assert_eq!(parsed.questions[0].correct_option(), Some("Network"));
        assert!(parsed.warnings.is_empty());
    }

    #[test]
    fn test_parse_error_for_prose() {
        let err = ResponseParser::new()
            .parse("Sorry, I can't do that.", 3)
            .unwrap_err();
        assert!(matches!(err, QuizError::Parse(_)));
    }

    #[test]
    fn test_validation_error_lists_every_issue() {
        let raw = r#"{"questions": [
            {"question": "Q1?", "options": ["a", "b", "c"], "correct": 0},
            {"options": ["a", "b", "c", "d"], "correct": 7}
        ]}"#;
        let err = ResponseParser::new().parse(raw, 2).unwrap_err();

        match err {
            QuizError::Validation(e) => {
                assert_eq!(
                    e.issues,
                    vec![
                        "Question 1 doesn't have 4 valid options (found 3 of 3)".to_string(),
                        "Question 2 is missing 'question'".to_string(),
                        "Question 2 has invalid correct index 7 (expected 0-3)".to_string(),
                    ]
                );
            }
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn test_count_mismatch_is_accepted() {
        let raw = r#"{"questions": [{"question": "Q?", "options": ["a", "b", "c", "d"], "correct": 2}]}"#;
        let parsed = ResponseParser::new().parse(raw, 4).unwrap();
        assert_eq!(parsed.questions.len(), 1);
        assert_eq!(parsed.warnings.len(), 1);
    }
}
