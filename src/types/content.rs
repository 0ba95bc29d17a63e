//! Content Analysis Types
//!
//! Coarse subject classification and simple text metrics, computed once per
//! pipeline run and never mutated afterwards.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Subject classification inferred from keyword matching
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum ContentType {
    #[default]
    General,
    #[serde(rename = "Computer Science")]
    ComputerScience,
    #[serde(rename = "Academic Research")]
    AcademicResearch,
    Business,
    Science,
    History,
    Mathematics,
    Education,
}

impl ContentType {
    /// Human-readable label, also used as the serialized form
    pub fn label(&self) -> &'static str {
        match self {
            Self::General => "General",
            Self::ComputerScience => "Computer Science",
            Self::AcademicResearch => "Academic Research",
            Self::Business => "Business",
            Self::Science => "Science",
            Self::History => "History",
            Self::Mathematics => "Mathematics",
            Self::Education => "Education",
        }
    }
}

impl fmt::Display for ContentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl std::str::FromStr for ContentType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().replace(['-', '_'], " ").as_str() {
            "general" => Ok(Self::General),
            "computer science" => Ok(Self::ComputerScience),
            "academic research" => Ok(Self::AcademicResearch),
            "business" => Ok(Self::Business),
            "science" => Ok(Self::Science),
            "history" => Ok(Self::History),
            "mathematics" => Ok(Self::Mathematics),
            "education" => Ok(Self::Education),
            _ => Err(format!("Unknown content type: {}", s)),
        }
    }
}

/// Metrics and classification for one piece of source text
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContentAnalysis {
    pub word_count: usize,
    pub char_count: usize,
    pub paragraph_count: usize,
    pub content_type: ContentType,
    /// `ceil(word_count / 200)`
    pub reading_time_minutes: usize,
}
