//! Content Analyzer
//!
//! Classifies text into a subject area and computes simple metrics.
//! Pure and deterministic; no I/O.
//!
//! ## Classification
//!
//! Categories are checked in a fixed priority order and the first one with
//! any case-insensitive substring hit wins. A text about "computer science
//! research" is therefore Computer Science, never Academic Research.

use regex::Regex;
use std::sync::LazyLock;

use crate::constants::analysis::WORDS_PER_MINUTE;
use crate::types::{ContentAnalysis, ContentType};

/// Blank line (possibly holding whitespace) between paragraphs
static PARAGRAPH_BREAK: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\n\s*\n").expect("paragraph break pattern is valid"));

/// Priority-ordered keyword table; earlier rows win ties
const KEYWORD_TABLE: &[(ContentType, &[&str])] = &[
    (
        ContentType::ComputerScience,
        &["algorithm", "programming", "code", "computer"],
    ),
    (
        ContentType::AcademicResearch,
        &["research", "study", "methodology", "hypothesis"],
    ),
    (
        ContentType::Business,
        &["business", "management", "company", "market"],
    ),
    (
        ContentType::Science,
        &[
            "science",
            "experiment",
            "theory",
            "biology",
            "chemistry",
            "physics",
        ],
    ),
    (
        ContentType::History,
        &["history", "historical", "century", "war"],
    ),
    (
        ContentType::Mathematics,
        &["math", "equation", "formula", "calculate"],
    ),
    (
        ContentType::Education,
        &["education", "learning", "student", "teach"],
    ),
];

/// Analyze text: counts, reading time and content type
pub fn analyze(text: &str) -> ContentAnalysis {
    let word_count = text.split_whitespace().count();

    ContentAnalysis {
        word_count,
        char_count: text.chars().count(),
        paragraph_count: count_paragraphs(text),
        content_type: classify(text),
        reading_time_minutes: word_count.div_ceil(WORDS_PER_MINUTE),
    }
}

/// First category in priority order with a keyword hit, else `General`
pub fn classify(text: &str) -> ContentType {
    let lower = text.to_lowercase();

    KEYWORD_TABLE
        .iter()
        .find(|(_, keywords)| keywords.iter().any(|kw| lower.contains(kw)))
        .map(|(content_type, _)| *content_type)
        .unwrap_or_default()
}

fn count_paragraphs(text: &str) -> usize {
    PARAGRAPH_BREAK
        .split(text)
        .filter(|p| !p.trim().is_empty())
        .count()
}
