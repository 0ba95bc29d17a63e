//! Prompt Builder System
//!
//! Standardized prompt construction for model calls.
//!
//! ## Design Principles
//!
//! 1. **Role Definition**: Clear role for the model
//! 2. **Structured Objectives**: Numbered goals
//! 3. **Context Sections**: Key-value facts in insertion order
//! 4. **Rules**: Hard output constraints, stated explicitly
//! 5. **Output Schema**: JSON example in a code block
//!
//! Rendering is deterministic: the same builder calls always produce the
//! same string.

use crate::constants::quiz::OPTIONS_PER_QUESTION;
use crate::types::ContentType;

/// Prompt section types
#[derive(Debug, Clone)]
pub enum PromptSection {
    /// Role definition with expertise area
    Role { expertise: String, task: String },
    /// Numbered objectives
    Objectives(Vec<String>),
    /// Context key-value pairs, rendered in insertion order
    Context(Vec<(String, String)>),
    /// Raw text section with optional header
    Text {
        header: Option<String>,
        content: String,
    },
    /// Code block with language
    Code { language: String, content: String },
    /// Hard constraints the output must satisfy
    Rules(Vec<String>),
}

/// Prompt builder for consistent prompt construction
#[derive(Debug, Clone, Default)]
pub struct PromptBuilder {
    sections: Vec<PromptSection>,
}

impl PromptBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a role definition section
    pub fn role(mut self, expertise: &str, task: &str) -> Self {
        self.sections.push(PromptSection::Role {
            expertise: expertise.to_string(),
            task: task.to_string(),
        });
        self
    }

    /// Add objectives section
    pub fn objectives<S: Into<String>>(mut self, objectives: impl IntoIterator<Item = S>) -> Self {
        self.sections.push(PromptSection::Objectives(
            objectives.into_iter().map(Into::into).collect(),
        ));
        self
    }

    /// Add a context item, appending to the first context section
    pub fn context_item(mut self, key: &str, value: &str) -> Self {
        let existing = self.sections.iter_mut().find_map(|section| match section {
            PromptSection::Context(items) => Some(items),
            _ => None,
        });

        match existing {
            Some(items) => items.push((key.to_string(), value.to_string())),
            None => self.sections.push(PromptSection::Context(vec![(
                key.to_string(),
                value.to_string(),
            )])),
        }
        self
    }

    /// Add text section
    pub fn text(mut self, content: &str) -> Self {
        self.sections.push(PromptSection::Text {
            header: None,
            content: content.to_string(),
        });
        self
    }

    /// Add text section with header
    pub fn section(mut self, header: &str, content: &str) -> Self {
        self.sections.push(PromptSection::Text {
            header: Some(header.to_string()),
            content: content.to_string(),
        });
        self
    }

    /// Add code block
    pub fn code(mut self, language: &str, content: &str) -> Self {
        self.sections.push(PromptSection::Code {
            language: language.to_string(),
            content: content.to_string(),
        });
        self
    }

    /// Add rules section
    pub fn rules<S: Into<String>>(mut self, rules: impl IntoIterator<Item = S>) -> Self {
        self.sections.push(PromptSection::Rules(
            rules.into_iter().map(Into::into).collect(),
        ));
        self
    }

    /// Build the final prompt string
    pub fn build(self) -> String {
        let mut prompt = String::new();

        for section in self.sections {
            match section {
                PromptSection::Role { expertise, task } => {
                    prompt.push_str("<ROLE>\n");
                    prompt.push_str(&format!(
                        "You are an expert {} specializing in {}.\n",
                        expertise, task
                    ));
                    prompt.push_str("</ROLE>\n\n");
                }
                PromptSection::Objectives(objectives) => {
                    prompt.push_str("<OBJECTIVES>\n");
                    for (i, obj) in objectives.iter().enumerate() {
                        prompt.push_str(&format!("{}. {}\n", i + 1, obj));
                    }
                    prompt.push_str("</OBJECTIVES>\n\n");
                }
                PromptSection::Context(items) => {
                    prompt.push_str("# Context\n\n");
                    for (key, value) in items {
                        prompt.push_str(&format!("**{}**: {}\n", key, value));
                    }
                    prompt.push('\n');
                }
                PromptSection::Text { header, content } => {
                    if let Some(h) = header {
                        prompt.push_str(&format!("# {}\n\n", h));
                    }
                    prompt.push_str(&content);
                    prompt.push_str("\n\n");
                }
                PromptSection::Code { language, content } => {
                    prompt.push_str(&format!("```{}\n", language));
                    prompt.push_str(&content);
                    prompt.push_str("\n```\n\n");
                }
                PromptSection::Rules(rules) => {
                    prompt.push_str("<RULES>\n");
                    for rule in rules {
                        prompt.push_str(&format!("- {}\n", rule));
                    }
                    prompt.push_str("</RULES>\n\n");
                }
            }
        }

        prompt.trim_end().to_string()
    }
}

// =============================================================================
// Quiz Prompt
// =============================================================================

/// Example reply shown to the model
const QUIZ_SCHEMA_EXAMPLE: &str = r#"{
  "questions": [
    {
      "question": "What is [specific concept from the content]?",
      "options": ["Correct answer from content", "Plausible wrong answer", "Another wrong answer", "Third wrong answer"],
      "correct": 0
    }
  ]
}"#;

/// Render the quiz-generation prompt for a text sample
pub fn build_quiz_prompt(sample: &str, question_count: usize, content_type: ContentType) -> String {
    quiz_prompt(sample, question_count, content_type).build()
}

/// Quiz-generation prompt as a builder, for callers that append sections
pub fn quiz_prompt(sample: &str, question_count: usize, content_type: ContentType) -> PromptBuilder {
    PromptBuilder::new()
        .role(
            "quiz author",
            "multiple-choice assessments of educational material",
        )
        .objectives([
            format!(
                "Create exactly {} multiple-choice questions that test understanding of the content below",
                question_count
            ),
            "Focus on key concepts, facts, and principles actually mentioned in the content"
                .to_string(),
            "Include a mix of factual recall and conceptual understanding questions".to_string(),
        ])
        .context_item("Subject area", content_type.label())
        .context_item("Questions requested", &question_count.to_string())
        .section("Content to analyze", &format!("\"\"\"\n{}\n\"\"\"", sample))
        .rules([
            format!("Create exactly {} questions", question_count),
            format!(
                "Each question must have exactly {} answer options",
                OPTIONS_PER_QUESTION
            ),
            format!(
                "Exactly one option per question is correct; give its 0-based index (0-{}) in \"correct\"",
                OPTIONS_PER_QUESTION - 1
            ),
            "Do NOT reference the document itself, filenames, or meta-information".to_string(),
            "Questions must be answerable by someone who read and understood the content"
                .to_string(),
            "Return ONLY a single valid JSON object in exactly this format, with no additional text"
                .to_string(),
        ])
        .code("json", QUIZ_SCHEMA_EXAMPLE)
}
