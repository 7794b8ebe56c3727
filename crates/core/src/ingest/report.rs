//! Run summary and human-readable progress output.

use std::fmt;
use std::io::Write;

use serde::{Deserialize, Serialize};

/// Outcome of an ingestion run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct IngestSummary {
    /// Sets in the store after the run.
    pub total_sets: u64,
    /// Distinct themes in the store after the run.
    pub total_themes: u64,
    /// Sum of the match counts the API reported for successful themes.
    ///
    /// Can exceed `total_sets` when later pages were skipped.
    pub expected_sets: u64,
    /// Themes attempted in this run.
    pub themes_processed: usize,
    /// Records upserted.
    pub records_written: u64,
    /// Records that could not be decoded or stored.
    pub records_rejected: u64,
    /// Additional pages dropped after a failed fetch.
    pub pages_skipped: u64,
    /// Themes whose first page could not be fetched.
    pub failed_themes: Vec<String>,
}

impl IngestSummary {
    pub fn has_failures(&self) -> bool {
        !self.failed_themes.is_empty()
    }
}

impl fmt::Display for IngestSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "SUMMARY:")?;
        writeln!(f, "  Total sets in database: {}", self.total_sets)?;
        writeln!(f, "  Total themes: {}", self.total_themes)?;
        writeln!(f, "  Expected sets: {}", self.expected_sets)?;
        writeln!(f, "  Records written: {}", self.records_written)?;
        if self.records_rejected > 0 {
            writeln!(f, "  Records rejected: {}", self.records_rejected)?;
        }
        if self.pages_skipped > 0 {
            writeln!(f, "  Pages skipped: {}", self.pages_skipped)?;
        }

        if self.has_failures() {
            writeln!(f)?;
            writeln!(f, "Failed themes ({}):", self.failed_themes.len())?;
            for theme in &self.failed_themes {
                writeln!(f, "  - {}", theme)?;
            }
        }

        Ok(())
    }
}

/// Progress notifications emitted by the ingestion loop.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IngestEvent {
    /// Login succeeded; requests carry a user hash.
    Authenticated,
    /// No user hash; requests are anonymous.
    Anonymous,
    ThemeStarted {
        index: usize,
        total: usize,
        theme: String,
    },
    ThemeCompleted {
        theme: String,
        matches: u64,
    },
    ThemeFailed {
        theme: String,
        reason: String,
    },
    PageSkipped {
        theme: String,
        page: u32,
        reason: String,
    },
    Finished(IngestSummary),
}

/// Receiver of ingestion progress.
pub trait ProgressReporter: Send + Sync {
    fn report(&self, event: &IngestEvent);
}

/// Reporter that prints progress lines and the summary to stdout.
#[derive(Debug, Clone, Copy, Default)]
pub struct ConsoleReporter;

impl ProgressReporter for ConsoleReporter {
    fn report(&self, event: &IngestEvent) {
        let mut out = std::io::stdout().lock();
        // Progress output is best-effort; a closed stdout must not stop the run.
        let _ = match event {
            IngestEvent::Authenticated => writeln!(out, "Logged in to Brickset"),
            IngestEvent::Anonymous => {
                writeln!(out, "Not logged in, continuing without a user hash")
            }
            IngestEvent::ThemeStarted {
                index,
                total,
                theme,
            } => write!(out, "[{}/{}] Processing: {}...", index, total, theme)
                .and_then(|_| out.flush()),
            IngestEvent::ThemeCompleted { matches, .. } => writeln!(out, " {} sets", matches),
            IngestEvent::ThemeFailed { reason, .. } => writeln!(out, " Failed ({})", reason),
            IngestEvent::PageSkipped { page, .. } => {
                write!(out, " [page {} skipped]", page).and_then(|_| out.flush())
            }
            IngestEvent::Finished(summary) => {
                writeln!(out, "{}", "-".repeat(70)).and_then(|_| write!(out, "{}", summary))
            }
        };
    }
}

/// Reporter that discards all events.
#[derive(Debug, Clone, Copy, Default)]
pub struct SilentReporter;

impl ProgressReporter for SilentReporter {
    fn report(&self, _event: &IngestEvent) {}
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_summary_display_without_failures() {
        let summary = IngestSummary {
            total_sets: 2,
            total_themes: 1,
            expected_sets: 2,
            themes_processed: 1,
            records_written: 2,
            ..Default::default()
        };

        let text = summary.to_string();
        assert!(text.contains("Total sets in database: 2"));
        assert!(text.contains("Total themes: 1"));
        assert!(text.contains("Expected sets: 2"));
        assert!(!text.contains("Failed themes"));
        assert!(!text.contains("Pages skipped"));
    }

    #[test]
    fn test_summary_display_lists_failed_themes() {
        let summary = IngestSummary {
            total_sets: 500,
            total_themes: 1,
            expected_sets: 1200,
            themes_processed: 3,
            records_written: 500,
            records_rejected: 0,
            pages_skipped: 1,
            failed_themes: vec!["Space".to_string(), "Town".to_string()],
        };

        let text = summary.to_string();
        assert!(text.contains("Pages skipped: 1"));
        assert!(text.contains("Failed themes (2):"));
        assert!(text.contains("  - Space\n"));
        assert!(text.contains("  - Town\n"));
        assert!(summary.has_failures());
    }
}
