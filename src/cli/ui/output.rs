//! Console status lines
//!
//! Everything here goes to stderr; stdout is reserved for quiz and report
//! payloads so they can be piped.

use console::style;

#[derive(Debug, Clone, Copy, Default)]
pub struct Output {
    quiet: bool,
}

impl Output {
    pub fn new(quiet: bool) -> Self {
        Self { quiet }
    }

    pub fn success(&self, message: &str) {
        if !self.quiet {
            eprintln!("{} {}", style("✓").green(), message);
        }
    }

    pub fn error(&self, message: &str) {
        eprintln!("{} {}", style("✗").red(), message);
    }

    pub fn warning(&self, message: &str) {
        eprintln!("{} {}", style("⚠").yellow(), message);
    }

    pub fn info(&self, message: &str) {
        if !self.quiet {
            eprintln!("{} {}", style("ℹ").blue(), message);
        }
    }

    pub fn section(&self, message: &str) {
        if !self.quiet {
            eprintln!("\n{}", style(message).bold());
            eprintln!("{}", "─".repeat(40));
        }
    }

    /// Aligned `label: value` line
    pub fn field(&self, label: &str, value: impl std::fmt::Display) {
        if !self.quiet {
            eprintln!("  {:<16} {}", style(format!("{}:", label)).dim(), value);
        }
    }
}
