//! JSON Extraction
//!
//! Pulls the first JSON object out of free-form model output.
//!
//! Handles the usual wrapping seen in model replies:
//! - Markdown code fences (```json ... ```)
//! - Byte-order mark
//! - Prose before or after the object
//!
//! No repair is attempted. Anything that does not parse after extraction is
//! a `QuizError::Parse`.

use serde_json::Value;
use tracing::debug;

use crate::types::{QuizError, Result};

/// Characters of the raw reply quoted in parse errors
const PREVIEW_CHARS: usize = 200;

/// Extract and parse the first JSON object in a model reply
pub fn extract_json_object(raw: &str) -> Result<Value> {
    JsonExtractor::new().extract(raw)
}

#[derive(Debug, Default)]
pub struct JsonExtractor;

impl JsonExtractor {
    pub fn new() -> Self {
        Self
    }

    pub fn extract(&self, raw: &str) -> Result<Value> {
        let cleaned = self.preprocess(raw);

        let object = self.first_balanced_object(&cleaned).ok_or_else(|| {
            if cleaned.contains('{') {
                QuizError::Parse(format!(
                    "unterminated JSON object in model output: {}",
                    preview(&cleaned)
                ))
            } else {
                QuizError::Parse(format!(
                    "no JSON object in model output: {}",
                    preview(&cleaned)
                ))
            }
        })?;

        if object.len() != cleaned.len() {
            debug!(
                object_len = object.len(),
                total_len = cleaned.len(),
                "Extracted JSON object from surrounding text"
            );
        }

        serde_json::from_str::<Value>(object)
            .map_err(|e| QuizError::Parse(format!("invalid JSON in model output: {}", e)))
    }

    fn preprocess(&self, raw: &str) -> String {
        let s = raw.trim().trim_start_matches('\u{feff}');
        self.strip_code_fences(s).trim().to_string()
    }

    /// Strip a leading ```lang line and a trailing ``` fence
    fn strip_code_fences<'a>(&self, s: &'a str) -> &'a str {
        let mut result = s;

        if result.starts_with("```") {
            result = match result.find('\n') {
                Some(first_newline) => &result[first_newline + 1..],
                None => result.trim_start_matches('`'),
            };
        }

        if let Some(stripped) = result.trim_end().strip_suffix("```") {
            result = stripped;
        }

        result
    }

    /// First `{...}` span with balanced braces, ignoring braces in strings
    fn first_balanced_object<'a>(&self, s: &'a str) -> Option<&'a str> {
        let start = s.find('{')?;

        let mut depth = 0usize;
        let mut in_string = false;
        let mut escape = false;

        for (i, ch) in s[start..].char_indices() {
            if escape {
                escape = false;
                continue;
            }

            match ch {
                '\\' if in_string => escape = true,
                '"' => in_string = !in_string,
                '{' if !in_string => depth += 1,
                '}' if !in_string => {
                    depth -= 1;
                    if depth == 0 {
                        return Some(&s[start..start + i + 1]);
                    }
                }
                _ => {}
            }
        }

        None
    }
}

fn preview(s: &str) -> String {
    let head: String = s.chars().take(PREVIEW_CHARS).collect();
    if head.len() < s.len() {
        format!("{}...", head)
    } else {
        head
    }
}
