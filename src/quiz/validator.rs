//! Quiz Validator
//!
//! Final structural gate for any quiz, AI-produced or fallback, before it
//! leaves the pipeline. Collects every issue rather than stopping at the
//! first one.

use serde::Serialize;

use crate::constants::quiz::OPTIONS_PER_QUESTION;
use crate::types::Quiz;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidationReport {
    pub is_valid: bool,
    pub issues: Vec<String>,
}

impl ValidationReport {
    fn from_issues(issues: Vec<String>) -> Self {
        Self {
            is_valid: issues.is_empty(),
            issues,
        }
    }
}

/// Check question text, options, correct index and question count
pub fn validate(quiz: &Quiz) -> ValidationReport {
    let mut issues = Vec::new();

    if quiz.questions.is_empty() {
        issues.push("No questions found".to_string());
    }

    for (i, q) in quiz.questions.iter().enumerate() {
        let n = i + 1;

        if q.question.trim().is_empty() {
            issues.push(format!("Question {} is empty", n));
        }

        if q.options.iter().any(|option| option.trim().is_empty()) {
            issues.push(format!("Question {} has empty options", n));
        } else if q.options.len() != OPTIONS_PER_QUESTION {
            issues.push(format!(
                "Question {} doesn't have {} valid options",
                n, OPTIONS_PER_QUESTION
            ));
        }

        if q.correct >= OPTIONS_PER_QUESTION {
            issues.push(format!(
                "Question {} has invalid correct index {} (expected 0-{})",
                n,
                q.correct,
                OPTIONS_PER_QUESTION - 1
            ));
        }
    }

    if quiz.metadata.question_count != quiz.questions.len() {
        issues.push(format!(
            "Question count mismatch: metadata says {}, quiz has {}",
            quiz.metadata.question_count,
            quiz.questions.len()
        ));
    }

    ValidationReport::from_issues(issues)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{ContentAnalysis, ContentType, GenerationMethod, QuizQuestion};

    fn analysis() -> ContentAnalysis {
        ContentAnalysis {
            word_count: 10,
            char_count: 50,
            paragraph_count: 1,
            content_type: ContentType::General,
            reading_time_minutes: 1,
        }
    }

    fn good(n: usize) -> QuizQuestion {
        QuizQuestion::new(format!("Question {}?", n), ["a", "b", "c", "d"], n % 4)
    }

    fn quiz(questions: Vec<QuizQuestion>) -> Quiz {
        let count = questions.len();
        Quiz::new(questions, &analysis(), GenerationMethod::Ai, count)
    }

    #[test]
    fn test_valid_quiz() {
        let report = validate(&quiz((1..=5).map(good).collect()));
        assert!(report.is_valid);
        assert!(report.issues.is_empty());
    }

    #[test]
    fn test_two_short_questions_give_two_issues() {
        let mut questions: Vec<QuizQuestion> = (1..=5).map(good).collect();
        questions[1].options.pop();
        questions[3].options.pop();
        questions[1].correct = 0;
        questions[3].correct = 0;

        let report = validate(&quiz(questions));
        assert!(!report.is_valid);
        assert_eq!(
            report.issues,
            vec![
                "Question 2 doesn't have 4 valid options".to_string(),
                "Question 4 doesn't have 4 valid options".to_string(),
            ]
        );
    }

    #[test]
    fn test_short_questions_keep_last_correct_index() {
        let mut questions: Vec<QuizQuestion> = (1..=5)
            .map(|n| QuizQuestion::new(format!("Question {}?", n), ["a", "b", "c", "d"], 3))
            .collect();
        questions[1].options.pop();
        questions[3].options.pop();

        let report = validate(&quiz(questions));
        assert_eq!(
            report.issues,
            vec![
                "Question 2 doesn't have 4 valid options".to_string(),
                "Question 4 doesn't have 4 valid options".to_string(),
            ]
        );
    }

    #[test]
    fn test_empty_quiz() {
        let report = validate(&quiz(vec![]));
        assert_eq!(report.issues, vec!["No questions found".to_string()]);
    }

    #[test]
    fn test_empty_text_and_blank_option() {
        let questions = vec![QuizQuestion::new("  ", ["a", "", "c", "d"], 0)];
        let report = validate(&quiz(questions));
        assert_eq!(
            report.issues,
            vec![
                "Question 1 is empty".to_string(),
                "Question 1 has empty options".to_string(),
            ]
        );
    }

    #[test]
    fn test_correct_index_out_of_range() {
        let questions = vec![QuizQuestion::new("Q?", ["a", "b", "c", "d"], 4)];
        let report = validate(&quiz(questions));
        assert_eq!(
            report.issues,
            vec!["Question 1 has invalid correct index 4 (expected 0-3)".to_string()]
        );
    }

    #[test]
    fn test_metadata_count_mismatch() {
        let mut q = quiz(vec![good(1)]);
        q.metadata.question_count = 3;
        let report = validate(&q);
        assert_eq!(
            report.issues,
            vec!["Question count mismatch: metadata says 3, quiz has 1".to_string()]
        );
    }
}
