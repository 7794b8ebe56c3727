//! Testing utilities and mock implementations.
//!
//! This module provides mock implementations of the catalog API and the
//! ingestion loop's pacing and reporting seams, allowing the whole loop to
//! be exercised without network access or real sleeps.
//!
//! # Example
//!
//! ```rust,ignore
//! use brickvault_core::testing::{fixtures, MockCatalogApi, RecordingPacer};
//!
//! let api = MockCatalogApi::new();
//! let pacer = RecordingPacer::new();
//!
//! // Configure mock responses
//! api.set_page("Castle", 1, fixtures::page(1, vec![
//!     fixtures::api_set(1, "6080-1", "Castle"),
//! ])).await;
//!
//! // Use in IngestRunner...
//! ```

mod failing_store;
mod mock_catalog_api;
mod recorders;

pub use failing_store::FailingSetStore;
pub use mock_catalog_api::{MockCatalogApi, MockReply};
pub use recorders::{RecordingPacer, RecordingReporter};

/// Test fixtures and helper functions.
pub mod fixtures {
    use serde_json::{json, Value};

    use crate::brickset::SetsPage;
    use crate::catalog::SetRecord;

    /// Create a `getSets` entry as Brickset sends it.
    ///
    /// `number` may carry its variant ("6080-1"); a bare number gets
    /// variant 1 from the decoder.
    pub fn api_set(set_id: i64, number: &str, theme: &str) -> Value {
        json!({
            "setID": set_id,
            "number": number,
            "numberVariant": 1,
            "name": format!("Set {}", number),
            "theme": theme,
            "subtheme": "Classic",
            "year": 1984,
            "pieces": 250,
            "barcode": { "UPC": format!("0{}", set_id) },
            "itemNumber": { "NA": number },
            "image": {
                "imageURL": format!("https://images.brickset.com/sets/images/{}.jpg", number),
                "thumbnailURL": format!("https://images.brickset.com/sets/small/{}.jpg", number),
            },
        })
    }

    /// Create a successful page with the given total match count.
    pub fn page(matches: u64, sets: Vec<Value>) -> SetsPage {
        SetsPage {
            status: "success".to_string(),
            matches,
            sets,
            message: None,
        }
    }

    /// Create `count` sets numbered from `first_id`.
    pub fn api_sets(first_id: i64, count: usize, theme: &str) -> Vec<Value> {
        (0..count as i64)
            .map(|i| {
                let id = first_id + i;
                api_set(id, &format!("{}-1", 10_000 + id), theme)
            })
            .collect()
    }

    /// Create an error page as Brickset sends for a bad key.
    pub fn error_page(message: &str) -> SetsPage {
        SetsPage {
            status: "error".to_string(),
            matches: 0,
            sets: Vec::new(),
            message: Some(message.to_string()),
        }
    }

    /// Create a stored record with reasonable defaults.
    pub fn set_record(set_id: i64, set_number: &str, theme: &str) -> SetRecord {
        SetRecord {
            set_id,
            set_number: set_number.to_string(),
            name: format!("Set {}", set_number),
            theme: theme.to_string(),
            subtheme: None,
            year: Some(1984),
            piece_count: 250,
            used_price: None,
            new_price: None,
            upc: String::new(),
            item_number_region: set_number.to_string(),
            image_url: String::new(),
            thumbnail_url: String::new(),
        }
    }
}
