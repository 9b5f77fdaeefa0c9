//! Terminal styling helpers for CLI output

use indicatif::ProgressStyle;
use owo_colors::OwoColorize;

/// Convenience styling methods for printable values
pub trait Stylize {
    /// De-emphasized secondary text
    fn muted(&self) -> String;
    /// Highlighted value (branch names, links)
    fn accent(&self) -> String;
    /// Successful outcome
    fn success(&self) -> String;
    /// Warning or soft failure
    fn warn(&self) -> String;
    /// Section or action emphasis
    fn emphasis(&self) -> String;
}

impl<T: std::fmt::Display> Stylize for T {
    fn muted(&self) -> String {
        format!("{}", self.dimmed())
    }

    fn accent(&self) -> String {
        format!("{}", self.cyan())
    }

    fn success(&self) -> String {
        format!("{}", self.green())
    }

    fn warn(&self) -> String {
        format!("{}", self.yellow())
    }

    fn emphasis(&self) -> String {
        format!("{}", self.bold())
    }
}

/// Green check mark for completed steps
pub fn check() -> String {
    "✓".green().to_string()
}

/// Shared spinner style for long-running steps
pub fn spinner_style() -> ProgressStyle {
    ProgressStyle::with_template("{spinner} {msg}").expect("valid template")
}
