//! Analyze Command
//!
//! Print content metrics and the detected subject area for a file.

use std::path::Path;

use clap::ValueEnum;
use console::style;

use crate::extract::{PlainTextExtractor, TextExtractor};
use crate::quiz::analyze;
use crate::types::{ContentAnalysis, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum AnalysisFormat {
    #[default]
    Text,
    Json,
}

pub fn run(file: &Path, format: AnalysisFormat) -> Result<()> {
    let text = PlainTextExtractor::new().extract(file)?;
    let analysis = analyze(&text);

    match format {
        AnalysisFormat::Json => println!("{}", serde_json::to_string_pretty(&analysis)?),
        AnalysisFormat::Text => print_text(file, &analysis),
    }

    Ok(())
}

fn print_text(file: &Path, analysis: &ContentAnalysis) {
    println!("{}", style(format!("Content Analysis: {}", file.display())).bold());
    println!("{}", "─".repeat(40));
    println!("  Content type:  {}", analysis.content_type);
    println!("  Words:         {}", analysis.word_count);
    println!("  Characters:    {}", analysis.char_count);
    println!("  Paragraphs:    {}", analysis.paragraph_count);
    println!("  Reading time:  {} min", analysis.reading_time_minutes);
}
