//! Quiz Types
//!
//! The pipeline output contract:
//!
//! ```json
//! {
//!   "questions": [{ "question": "...", "options": ["a", "b", "c", "d"], "correct": 0 }],
//!   "metadata": {
//!     "contentType": "Science", "wordCount": 812,
//!     "generatedAt": "2026-01-01T00:00:00Z", "generationMethod": "AI",
//!     "questionCount": 5, "requestedCount": 5
//!   }
//! }
//! ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use super::content::{ContentAnalysis, ContentType};

/// Single multiple-choice question; `correct` indexes into `options`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuizQuestion {
    pub question: String,
    pub options: Vec<String>,
    pub correct: usize,
}

impl QuizQuestion {
    pub fn new<S: Into<String>>(
        question: impl Into<String>,
        options: impl IntoIterator<Item = S>,
        correct: usize,
    ) -> Self {
        Self {
            question: question.into(),
            options: options.into_iter().map(Into::into).collect(),
            correct,
        }
    }

    /// Text of the designated correct option, if the index is in range
    pub fn correct_option(&self) -> Option<&str> {
        self.options.get(self.correct).map(String::as_str)
    }
}

/// Which branch of the pipeline produced the quiz
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GenerationMethod {
    #[serde(rename = "AI")]
    Ai,
    Fallback,
}

impl fmt::Display for GenerationMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Ai => write!(f, "AI"),
            Self::Fallback => write!(f, "Fallback"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuizMetadata {
    pub content_type: ContentType,
    pub word_count: usize,
    pub generated_at: DateTime<Utc>,
    pub generation_method: GenerationMethod,
    /// Always equal to `questions.len()`
    pub question_count: usize,
    /// What the caller asked for; differs from `question_count` when the
    /// fallback pool is smaller than the request
    pub requested_count: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Quiz {
    pub questions: Vec<QuizQuestion>,
    pub metadata: QuizMetadata,
}

impl Quiz {
    /// Assemble a quiz, deriving the metadata from the analysis
    pub fn new(
        questions: Vec<QuizQuestion>,
        analysis: &ContentAnalysis,
        method: GenerationMethod,
        requested_count: usize,
    ) -> Self {
        let question_count = questions.len();
        Self {
            questions,
            metadata: QuizMetadata {
                content_type: analysis.content_type,
                word_count: analysis.word_count,
                generated_at: Utc::now(),
                generation_method: method,
                question_count,
                requested_count,
            },
        }
    }

    pub fn is_fallback(&self) -> bool {
        self.metadata.generation_method == GenerationMethod::Fallback
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn analysis() -> ContentAnalysis {
        ContentAnalysis {
            word_count: 42,
            char_count: 250,
            paragraph_count: 2,
            content_type: ContentType::History,
            reading_time_minutes: 1,
        }
    }

    #[test]
    fn test_quiz_new_sets_question_count() {
        let questions = vec![
            QuizQuestion::new("Q1?", ["a", "b", "c", "d"], 0),
            QuizQuestion::new("Q2?", ["a", "b", "c", "d"], 3),
        ];
        let quiz = Quiz::new(questions, &analysis(), GenerationMethod::Ai, 5);

        assert_eq!(quiz.metadata.question_count, 2);
        assert_eq!(quiz.metadata.requested_count, 5);
        assert_eq!(quiz.metadata.word_count, 42);
        assert_eq!(quiz.metadata.content_type, ContentType::History);
        assert!(!quiz.is_fallback());
    }

    #[test]
    fn test_quiz_serializes_output_contract() {
        let quiz = Quiz::new(
            vec![QuizQuestion::new("Q?", ["a", "b", "c", "d"], 2)],
            &analysis(),
            GenerationMethod::Fallback,
            1,
        );
        let value = serde_json::to_value(&quiz).unwrap();

        assert_eq!(value["questions"][0]["correct"], 2);
        assert_eq!(value["questions"][0]["options"].as_array().unwrap().len(), 4);
        assert_eq!(value["metadata"]["generationMethod"], "Fallback");
        assert_eq!(value["metadata"]["contentType"], "History");
        assert_eq!(value["metadata"]["questionCount"], 1);
        assert!(value["metadata"]["generatedAt"].is_string());
    }

    #[test]
    fn test_generation_method_wire_names() {
        assert_eq!(serde_json::to_string(&GenerationMethod::Ai).unwrap(), "\"AI\"");
        assert_eq!(GenerationMethod::Ai.to_string(), "AI");
        assert_eq!(GenerationMethod::Fallback.to_string(), "Fallback");
    }

    #[test]
    fn test_correct_option() {
        let q = QuizQuestion::new("Q?", ["a", "b", "c", "d"], 1);
        assert_eq!(q.correct_option(), Some("b"));
        let q = QuizQuestion::new("Q?", ["a", "b", "c", "d"], 7);
        assert_eq!(q.correct_option(), None);
    }
}
