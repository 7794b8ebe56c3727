//! The ingestion loop.
//!
//! Runs strictly sequentially: one theme at a time, one page at a time.
//! Failures are contained at the smallest useful scope:
//! - a record that cannot be decoded or stored is counted and skipped
//! - a later page that cannot be fetched is dropped
//! - a first page that cannot be fetched fails the theme
//!
//! Nothing inside the loop aborts the run; it always reaches the summary.

use std::sync::Arc;

use thiserror::Error;
use tracing::{debug, info, warn};

use crate::brickset::{CatalogApi, CatalogApiError, SetsPage, SetsQuery};
use crate::catalog::{SetRecord, SetStore, StoreError};
use crate::config::IngestConfig;

use super::pacer::{Pacer, TokioPacer};
use super::report::{IngestEvent, IngestSummary, ProgressReporter, SilentReporter};

/// Why a theme failed.
#[derive(Debug, Error)]
pub enum ThemeError {
    #[error("fetch failed: {0}")]
    Fetch(#[from] CatalogApiError),

    #[error("API returned status '{status}'{}", message_suffix(.message))]
    Status {
        status: String,
        message: Option<String>,
    },
}

fn message_suffix(message: &Option<String>) -> String {
    message
        .as_ref()
        .map(|m| format!(": {}", m))
        .unwrap_or_default()
}

/// Per-theme counters.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ThemeOutcome {
    /// Total matches reported by the first page.
    pub matches: u64,
    /// Pages requested, including the first.
    pub pages_fetched: u32,
    pub pages_skipped: u32,
    pub records_written: u64,
    pub records_rejected: u64,
}

/// Number of pages needed beyond the first to cover `matches` results.
pub fn additional_pages(matches: u64, page_size: u32) -> u64 {
    let page_size = u64::from(page_size.max(1));
    if matches <= page_size {
        0
    } else {
        matches.div_ceil(page_size) - 1
    }
}

/// Last page number needed to cover `matches` results, or `None` when it
/// does not fit a page number.
pub fn last_page(matches: u64, page_size: u32) -> Option<u32> {
    u32::try_from(additional_pages(matches, page_size) + 1).ok()
}

/// Drives themes through fetch and upsert.
pub struct IngestRunner<A: CatalogApi> {
    config: IngestConfig,
    api: A,
    store: Arc<dyn SetStore>,
    pacer: Arc<dyn Pacer>,
    reporter: Arc<dyn ProgressReporter>,
}

impl<A: CatalogApi> IngestRunner<A> {
    /// Create a runner that sleeps between requests and reports nothing.
    pub fn new(config: IngestConfig, api: A, store: Arc<dyn SetStore>) -> Self {
        Self {
            config,
            api,
            store,
            pacer: Arc::new(TokioPacer),
            reporter: Arc::new(SilentReporter),
        }
    }

    /// Replace the pacing strategy.
    pub fn with_pacer(mut self, pacer: Arc<dyn Pacer>) -> Self {
        self.pacer = pacer;
        self
    }

    /// Replace the progress reporter.
    pub fn with_reporter(mut self, reporter: Arc<dyn ProgressReporter>) -> Self {
        self.reporter = reporter;
        self
    }

    /// Run the whole job over `themes`.
    ///
    /// Only a failure to read the final store statistics is returned as an
    /// error; everything before that is absorbed into the summary.
    pub async fn run(&self, themes: &[String]) -> Result<IngestSummary, StoreError> {
        let themes = match self.config.max_themes {
            Some(max) => &themes[..themes.len().min(max)],
            None => themes,
        };

        match self.api.authenticate().await {
            Some(_) => {
                info!("Authenticated with Brickset");
                self.reporter.report(&IngestEvent::Authenticated);
            }
            None => {
                info!("Proceeding without Brickset user hash");
                self.reporter.report(&IngestEvent::Anonymous);
            }
        }

        info!("Ingesting {} themes", themes.len());

        let mut summary = IngestSummary {
            themes_processed: themes.len(),
            ..Default::default()
        };

        for (i, theme) in themes.iter().enumerate() {
            self.reporter.report(&IngestEvent::ThemeStarted {
                index: i + 1,
                total: themes.len(),
                theme: theme.clone(),
            });

            match self.ingest_theme(theme).await {
                Ok(outcome) => {
                    info!(
                        "Theme '{}': {} matches, {} written, {} rejected, {} pages skipped",
                        theme,
                        outcome.matches,
                        outcome.records_written,
                        outcome.records_rejected,
                        outcome.pages_skipped
                    );
                    summary.expected_sets += outcome.matches;
                    summary.records_written += outcome.records_written;
                    summary.records_rejected += outcome.records_rejected;
                    summary.pages_skipped += u64::from(outcome.pages_skipped);
                    self.reporter.report(&IngestEvent::ThemeCompleted {
                        theme: theme.clone(),
                        matches: outcome.matches,
                    });
                }
                Err(e) => {
                    warn!("Theme '{}' failed: {}", theme, e);
                    summary.failed_themes.push(theme.clone());
                    self.reporter.report(&IngestEvent::ThemeFailed {
                        theme: theme.clone(),
                        reason: e.to_string(),
                    });
                }
            }

            self.pacer.pause(self.config.theme_delay()).await;
        }

        self.finish(summary).await
    }

    async fn finish(&self, mut summary: IngestSummary) -> Result<IngestSummary, StoreError> {
        self.api.clear_session().await;

        let stats = self.store.stats();

        if let Err(e) = self.store.finalize() {
            warn!("Failed to finalize set store: {}", e);
        }

        let stats = stats?;
        summary.total_sets = stats.total_sets;
        summary.total_themes = stats.total_themes;

        info!(
            "Ingestion finished: {} sets stored across {} themes ({} expected), {} themes failed",
            summary.total_sets,
            summary.total_themes,
            summary.expected_sets,
            summary.failed_themes.len()
        );
        self.reporter.report(&IngestEvent::Finished(summary.clone()));

        Ok(summary)
    }

    /// Fetch and store every page of one theme.
    pub async fn ingest_theme(&self, theme: &str) -> Result<ThemeOutcome, ThemeError> {
        let page_size = self.config.page_size;
        let mut outcome = ThemeOutcome::default();

        let first = self.fetch_page(theme, 1).await?;
        outcome.pages_fetched = 1;
        outcome.matches = first.matches;
        self.store_page(theme, &first, &mut outcome);

        let extra = additional_pages(first.matches, page_size);
        if extra > 0 {
            debug!(
                "Theme '{}' has {} matches, fetching {} more pages",
                theme, first.matches, extra
            );
        }

        let Some(last) = last_page(first.matches, page_size) else {
            warn!(
                "Theme '{}' reports {} matches, more pages than can be requested",
                theme, first.matches
            );
            return Ok(outcome);
        };

        for page_number in 2..=last {
            self.pacer.pause(self.config.page_delay()).await;
            outcome.pages_fetched += 1;

            match self.fetch_page(theme, page_number).await {
                Ok(page) => self.store_page(theme, &page, &mut outcome),
                Err(e) => {
                    warn!("Skipping page {} of theme '{}': {}", page_number, theme, e);
                    outcome.pages_skipped += 1;
                    self.reporter.report(&IngestEvent::PageSkipped {
                        theme: theme.to_string(),
                        page: page_number,
                        reason: e.to_string(),
                    });
                }
            }
        }

        Ok(outcome)
    }

    async fn fetch_page(&self, theme: &str, page_number: u32) -> Result<SetsPage, ThemeError> {
        let query = SetsQuery::theme_page(theme, self.config.page_size, page_number);
        let page = self.api.list_sets(&query).await?;

        if !page.is_success() {
            return Err(ThemeError::Status {
                status: page.status,
                message: page.message,
            });
        }

        Ok(page)
    }

    fn store_page(&self, theme: &str, page: &SetsPage, outcome: &mut ThemeOutcome) {
        for value in &page.sets {
            let record = match SetRecord::from_api(value) {
                Ok(record) => record,
                Err(e) => {
                    warn!("Rejected set in theme '{}': {}", theme, e);
                    outcome.records_rejected += 1;
                    continue;
                }
            };

            match self.store.upsert(&record) {
                Ok(()) => outcome.records_written += 1,
                Err(e) => {
                    warn!("Error storing set {}: {}", record.set_number, e);
                    outcome.records_rejected += 1;
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_additional_pages() {
        assert_eq!(additional_pages(0, 500), 0);
        assert_eq!(additional_pages(2, 500), 0);
        assert_eq!(additional_pages(500, 500), 0);
        assert_eq!(additional_pages(501, 500), 1);
        assert_eq!(additional_pages(1000, 500), 1);
        assert_eq!(additional_pages(1200, 500), 2);
        assert_eq!(additional_pages(1501, 500), 3);
    }

    #[test]
    fn test_last_page() {
        assert_eq!(last_page(0, 500), Some(1));
        assert_eq!(last_page(1200, 500), Some(3));
        assert_eq!(last_page(u64::from(u32::MAX) * 500, 500), Some(u32::MAX));
        assert_eq!(last_page(u64::from(u32::MAX) * 500 + 1, 500), None);
        assert_eq!(last_page(u64::MAX, 1), None);
    }

    #[test]
    fn test_additional_pages_zero_page_size() {
        assert_eq!(additional_pages(3, 0), 2);
    }

    #[test]
    fn test_theme_error_display() {
        let err = ThemeError::Status {
            status: "error".to_string(),
            message: Some("Invalid API key".to_string()),
        };
        assert_eq!(err.to_string(), "API returned status 'error': Invalid API key");

        let err = ThemeError::Status {
            status: String::new(),
            message: None,
        };
        assert_eq!(err.to_string(), "API returned status ''");
    }
}
