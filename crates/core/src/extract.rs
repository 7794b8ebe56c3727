//! Extraction of the leading JSON object from Brickset response bodies.
//!
//! The Brickset SOAP endpoint answers with a JSON document immediately
//! followed by the XML envelope it was supposed to be wrapped in, with no
//! delimiter between the two. The extractor locates the end of the first
//! object with a single forward scan and parses only that prefix.

use serde::Deserialize;
use serde_json::Value;
use thiserror::Error;

/// Errors produced while extracting the JSON prefix.
#[derive(Debug, Error)]
pub enum ExtractError {
    /// No balanced top-level object was found.
    #[error("no balanced JSON object at start of response")]
    Unbalanced,

    /// A balanced prefix was found but is not valid JSON.
    #[error("invalid JSON prefix: {0}")]
    Parse(#[from] serde_json::Error),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ScanState {
    Outside,
    InString,
    Escape,
}

/// Locate the leading JSON object of `raw`.
///
/// Returns the slice from offset 0 up to and including the brace that closes
/// the first top-level object, or `None` when braces never balance.
pub fn json_prefix(raw: &str) -> Option<&str> {
    let mut state = ScanState::Outside;
    let mut depth: usize = 0;

    for (offset, ch) in raw.char_indices() {
        state = match (state, ch) {
            (ScanState::Escape, _) => ScanState::InString,
            (ScanState::InString, '\\') => ScanState::Escape,
            (ScanState::InString, '"') => ScanState::Outside,
            (ScanState::InString, _) => ScanState::InString,
            (ScanState::Outside, '"') => ScanState::InString,
            (ScanState::Outside, '{') => {
                depth += 1;
                ScanState::Outside
            }
            (ScanState::Outside, '}') => {
                // A closing brace before any opening one can never balance.
                if depth == 0 {
                    return None;
                }
                depth -= 1;
                if depth == 0 {
                    return Some(&raw[..offset + ch.len_utf8()]);
                }
                ScanState::Outside
            }
            (ScanState::Outside, _) => ScanState::Outside,
        };
    }

    None
}

/// Extract and parse the leading JSON object of a response body.
///
/// Trailing content after the object is ignored. There is no best-effort
/// result: an unbalanced prefix or a prefix that fails to parse is an error.
pub fn extract_json(raw: &str) -> Result<Value, ExtractError> {
    let prefix = json_prefix(raw).ok_or(ExtractError::Unbalanced)?;

    // No nesting limit; serde_stacker grows the stack for deep input.
    let mut de = serde_json::Deserializer::from_str(prefix);
    de.disable_recursion_limit();
    let value = Value::deserialize(serde_stacker::Deserializer::new(&mut de))?;
    de.end()?;

    Ok(value)
}
