//! Theme-by-theme ingestion of Brickset sets into the local catalog.

mod pacer;
mod report;
mod runner;
pub mod themes;

pub use pacer::{Pacer, TokioPacer};
pub use report::{ConsoleReporter, IngestEvent, IngestSummary, ProgressReporter, SilentReporter};
pub use runner::{additional_pages, last_page, IngestRunner, ThemeError, ThemeOutcome};
pub use themes::{load_themes, parse_theme_line, parse_themes, ThemeSourceError};
