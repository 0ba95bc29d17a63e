//! Text Extraction
//!
//! The pipeline only consumes plain text. How that text is produced is the
//! extractor's concern; the CLI ships a plain-text file extractor.

use std::fs;
use std::io::ErrorKind;
use std::path::Path;
use std::sync::LazyLock;

use regex::Regex;
use tracing::debug;

use crate::constants::extraction::{MAX_FILE_SIZE, MIN_TEXT_CHARS, PREVIEW_CHARS};
use crate::types::{QuizError, Result};

static INLINE_WHITESPACE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[ \t\u{a0}]+").expect("inline whitespace pattern is valid"));

static BLANK_LINE_RUNS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\n{3,}").expect("blank line pattern is valid"));

/// Source of plain text for the quiz pipeline
pub trait TextExtractor: Send + Sync {
    fn extract(&self, path: &Path) -> Result<String>;
}

/// Reads UTF-8 text files and normalizes their whitespace
#[derive(Debug, Clone)]
pub struct PlainTextExtractor {
    max_file_size: u64,
    min_chars: usize,
}

impl Default for PlainTextExtractor {
    fn default() -> Self {
        Self {
            max_file_size: MAX_FILE_SIZE,
            min_chars: MIN_TEXT_CHARS,
        }
    }
}

impl PlainTextExtractor {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_max_file_size(mut self, bytes: u64) -> Self {
        self.max_file_size = bytes;
        self
    }

    fn fail(path: &Path, reason: impl Into<String>) -> QuizError {
        QuizError::Extract {
            path: path.display().to_string(),
            reason: reason.into(),
        }
    }
}

impl TextExtractor for PlainTextExtractor {
    fn extract(&self, path: &Path) -> Result<String> {
        let metadata = fs::metadata(path).map_err(|e| Self::fail(path, e.to_string()))?;
        if !metadata.is_file() {
            return Err(Self::fail(path, "not a regular file"));
        }
        if metadata.len() > self.max_file_size {
            return Err(Self::fail(
                path,
                format!(
                    "file is {} bytes, limit is {} bytes",
                    metadata.len(),
                    self.max_file_size
                ),
            ));
        }

        let raw = fs::read_to_string(path).map_err(|e| match e.kind() {
            ErrorKind::InvalidData => Self::fail(path, "file is not valid UTF-8 text"),
            _ => Self::fail(path, e.to_string()),
        })?;

        let text = normalize_whitespace(&raw);
        let chars = text.chars().count();
        if chars < self.min_chars {
            return Err(Self::fail(
                path,
                format!(
                    "text too short; document may be image-based ({} chars, need {})",
                    chars, self.min_chars
                ),
            ));
        }

        debug!(
            path = %path.display(),
            chars,
            preview = %text_preview(&text, PREVIEW_CHARS),
            "Extracted text"
        );

        Ok(text)
    }
}

/// Collapse runs of spaces and tabs, keep single blank lines as paragraph breaks
pub fn normalize_whitespace(text: &str) -> String {
    let joined = text
        .lines()
        .map(|line| INLINE_WHITESPACE.replace_all(line.trim(), " "))
        .collect::<Vec<_>>()
        .join("\n");

    BLANK_LINE_RUNS
        .replace_all(&joined, "\n\n")
        .trim()
        .to_string()
}

/// First `max_chars` characters, with `...` when anything was cut
pub fn text_preview(text: &str, max_chars: usize) -> String {
    match text.char_indices().nth(max_chars) {
        Some((cut, _)) => format!("{}...", &text[..cut]),
        None => text.to_string(),
    }
}
