//! Fallback Quiz Generator
//!
//! Deterministic, network-free questions tailored only by content type.
//! The pool holds five templates; requests beyond that are capped and the
//! shortfall is visible through `metadata.requested_count`.

use tracing::warn;

use crate::types::{ContentAnalysis, ContentType, GenerationMethod, Quiz, QuizQuestion};

/// Number of templates in the fallback pool
pub const FALLBACK_POOL_SIZE: usize = 5;

/// Build a fallback quiz of `min(requested, FALLBACK_POOL_SIZE)` questions
pub fn generate(analysis: &ContentAnalysis, requested: usize) -> Quiz {
    if requested > FALLBACK_POOL_SIZE {
        warn!(
            requested,
            available = FALLBACK_POOL_SIZE,
            "Fallback pool is smaller than the request, capping question count"
        );
    }

    let questions = template_pool(analysis.content_type)
        .into_iter()
        .take(requested)
        .collect();

    Quiz::new(questions, analysis, GenerationMethod::Fallback, requested)
}

/// Templates in fixed order; the first one names the content type
fn template_pool(content_type: ContentType) -> [QuizQuestion; FALLBACK_POOL_SIZE] {
    let label = content_type.label();

    [
        QuizQuestion::new(
            format!(
                "What type of content does this {} material primarily focus on?",
                label.to_lowercase()
            ),
            [
                format!("{} concepts and principles", label),
                "Personal opinions and stories".to_string(),
                "Entertainment content".to_string(),
                "Advertising material".to_string(),
            ],
            0,
        ),
        QuizQuestion::new(
            "Based on the content structure, what learning approach does this material use?",
            [
                "Systematic presentation of concepts with examples",
                "Random collection of facts",
                "Pure memorization drills",
                "Creative writing exercises",
            ],
            0,
        ),
        QuizQuestion::new(
            "What is the primary educational value of this content?",
            [
                "Building foundational knowledge and understanding",
                "Entertainment purposes only",
                "Providing personal opinions",
                "Marketing products or services",
            ],
            0,
        ),
        QuizQuestion::new(
            "How is the information in this content typically organized?",
            [
                "Logically structured with clear explanations",
                "Randomly arranged without order",
                "Purely chronological events",
                "Personal diary entries",
            ],
            0,
        ),
        QuizQuestion::new(
            "What type of assessment would best evaluate understanding of this material?",
            [
                "Questions testing both facts and concepts",
                "Pure memorization tests",
                "Creative writing assignments",
                "Personal opinion surveys",
            ],
            0,
        ),
    ]
}
