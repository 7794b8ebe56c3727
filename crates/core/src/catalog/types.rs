//! Types for the local set catalog.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A single catalog set as persisted in the `sets` table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SetRecord {
    /// Brickset set ID (primary key).
    pub set_id: i64,
    /// Set number including variant suffix (e.g. "71037-1"). Unique.
    pub set_number: String,
    /// Set name.
    pub name: String,
    /// Theme name.
    pub theme: String,
    /// Subtheme name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subtheme: Option<String>,
    /// Release year.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub year: Option<i32>,
    /// Piece count (0 when unknown).
    #[serde(default)]
    pub piece_count: i64,
    /// Used market price. Populated by a later enrichment stage.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub used_price: Option<f64>,
    /// New market price. Populated by a later enrichment stage.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub new_price: Option<f64>,
    /// UPC barcode, empty if unknown.
    #[serde(default)]
    pub upc: String,
    /// North American item number, empty if unknown.
    #[serde(default)]
    pub item_number_region: String,
    /// Full-size image URL, empty if unknown.
    #[serde(default)]
    pub image_url: String,
    /// Thumbnail URL, empty if unknown.
    #[serde(default)]
    pub thumbnail_url: String,
}

/// Live statistics over the stored sets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoreStats {
    /// Number of stored sets.
    pub total_sets: u64,
    /// Number of distinct theme values.
    pub total_themes: u64,
}

/// Errors for store operations.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Database error: {0}")]
    Database(String),

    #[error("Internal error: {0}")]
    Internal(String),
}
