//! Theme list parsing.
//!
//! Theme files are hand-curated exports with one theme per line, annotated
//! with the set count Brickset showed at the time:
//!
//! ```text
//! 1. Animal Crossing (27 sets)
//! Castle (412 sets)
//! ```
//!
//! Only the name is kept; the count is informational.

use std::path::Path;

use once_cell::sync::Lazy;
use regex_lite::Regex;
use thiserror::Error;

static NUMBERED_LINE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^\d+\.\s+(.+?)\s+\(\d+\s+sets?\)").expect("valid theme regex")
});

static PLAIN_LINE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(.+?)\s+\(\d+\s+sets?\)").expect("valid theme regex"));

/// Errors reading a theme list.
#[derive(Debug, Error)]
pub enum ThemeSourceError {
    #[error("Failed to read theme file {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

/// Extract the theme name from one line, if the line names a theme.
pub fn parse_theme_line(line: &str) -> Option<String> {
    let caps = NUMBERED_LINE
        .captures(line)
        .or_else(|| PLAIN_LINE.captures(line))?;
    let name = caps.get(1)?.as_str().trim();

    if name.is_empty() {
        None
    } else {
        Some(name.to_string())
    }
}

/// Extract theme names from the contents of a theme file, in order.
pub fn parse_themes(contents: &str) -> Vec<String> {
    contents.lines().filter_map(parse_theme_line).collect()
}

/// Read and parse a theme file.
pub fn load_themes(path: &Path) -> Result<Vec<String>, ThemeSourceError> {
    let contents = std::fs::read_to_string(path).map_err(|source| ThemeSourceError::Io {
        path: path.display().to_string(),
        source,
    })?;
    Ok(parse_themes(&contents))
}
