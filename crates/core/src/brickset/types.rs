//! Types for Brickset API requests and responses.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::catalog::SetRecord;

/// Default page size for `getSets` (the API maximum).
pub const DEFAULT_PAGE_SIZE: u32 = 500;

/// Filters and paging for a `getSets` call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SetsQuery {
    pub theme: Option<String>,
    pub year: Option<i32>,
    pub query: Option<String>,
    pub page_size: u32,
    pub page_number: u32,
}

impl Default for SetsQuery {
    fn default() -> Self {
        Self {
            theme: None,
            year: None,
            query: None,
            page_size: DEFAULT_PAGE_SIZE,
            page_number: 1,
        }
    }
}

impl SetsQuery {
    /// Query for one page of a theme.
    pub fn theme_page(theme: &str, page_size: u32, page_number: u32) -> Self {
        Self {
            theme: Some(theme.to_string()),
            page_size,
            page_number,
            ..Default::default()
        }
    }

    /// The `params` JSON object sent to the API.
    ///
    /// Absent or empty filters are left out entirely: the API treats a
    /// present key as a constraint even when its value is empty.
    pub fn to_params(&self) -> Value {
        let params = SetsParams {
            theme: self.theme.as_deref().filter(|s| !s.is_empty()),
            year: self.year,
            query: self.query.as_deref().filter(|s| !s.is_empty()),
            page_size: self.page_size,
            page_number: self.page_number,
        };
        serde_json::to_value(params).unwrap_or(Value::Null)
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct SetsParams<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    theme: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    year: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    query: Option<&'a str>,
    page_size: u32,
    page_number: u32,
}

/// Decoded `getSets` reply.
///
/// Individual sets are kept as raw JSON so one malformed entry cannot make
/// the whole page undecodable.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SetsPage {
    /// "success" or "error".
    #[serde(default)]
    pub status: String,
    /// Total sets matching the filters across all pages.
    #[serde(default)]
    pub matches: u64,
    /// Sets on this page.
    #[serde(default)]
    pub sets: Vec<Value>,
    /// Error message when status is not "success".
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl SetsPage {
    pub fn is_success(&self) -> bool {
        self.status == "success"
    }
}

/// Decoded `login` reply.
#[derive(Debug, Deserialize)]
pub(crate) struct LoginReply {
    #[serde(default)]
    pub status: String,
    #[serde(default)]
    pub hash: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
}

/// Why an API set could not be turned into a record.
#[derive(Debug, thiserror::Error)]
pub enum SetDecodeError {
    #[error("malformed set: {0}")]
    Malformed(#[from] serde_json::Error),

    #[error("set has no {0}")]
    MissingField(&'static str),
}

// ============================================================================
// Brickset API Response Types (private)
// ============================================================================

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ApiSet {
    #[serde(rename = "setID")]
    set_id: Option<i64>,
    number: Option<String>,
    number_variant: Option<i64>,
    name: Option<String>,
    theme: Option<String>,
    subtheme: Option<String>,
    year: Option<i32>,
    pieces: Option<i64>,
    barcode: Option<ApiBarcode>,
    item_number: Option<ApiItemNumber>,
    image: Option<ApiImage>,
}

#[derive(Debug, Deserialize)]
struct ApiBarcode {
    #[serde(rename = "UPC")]
    upc: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ApiItemNumber {
    #[serde(rename = "NA")]
    na: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ApiImage {
    #[serde(rename = "imageURL")]
    image_url: Option<String>,
    #[serde(rename = "thumbnailURL")]
    thumbnail_url: Option<String>,
}

impl SetRecord {
    /// Build a record from one entry of a `getSets` reply.
    ///
    /// Prices are always left empty. Brickset sends the set number and its
    /// variant separately; a bare number gets the variant appended.
    pub fn from_api(value: &Value) -> Result<Self, SetDecodeError> {
        let api = ApiSet::deserialize(value)?;

        let set_id = api.set_id.ok_or(SetDecodeError::MissingField("setID"))?;
        let number = api
            .number
            .filter(|n| !n.is_empty())
            .ok_or(SetDecodeError::MissingField("number"))?;

        let set_number = match api.number_variant {
            Some(variant) if !number.contains('-') => format!("{}-{}", number, variant),
            _ => number,
        };

        let (image_url, thumbnail_url) = api
            .image
            .map(|i| {
                (
                    i.image_url.unwrap_or_default(),
                    i.thumbnail_url.unwrap_or_default(),
                )
            })
            .unwrap_or_default();

        Ok(Self {
            set_id,
            set_number,
            name: api.name.unwrap_or_default(),
            theme: api.theme.unwrap_or_default(),
            subtheme: api.subtheme,
            year: api.year,
            piece_count: api.pieces.unwrap_or(0),
            used_price: None,
            new_price: None,
            upc: api.barcode.and_then(|b| b.upc).unwrap_or_default(),
            item_number_region: api.item_number.and_then(|i| i.na).unwrap_or_default(),
            image_url,
            thumbnail_url,
        })
    }
}
