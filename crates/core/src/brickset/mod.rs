//! Brickset catalog API integration.
//!
//! Only the two operations the ingestion job needs are modeled: `login` to
//! obtain a user hash and `getSets` to list sets page by page.

mod client;
mod envelope;
mod types;

pub use client::BricksetClient;
pub use envelope::{envelope, soap_action, API_NAMESPACE};
pub use types::{SetDecodeError, SetsPage, SetsQuery, DEFAULT_PAGE_SIZE};

use async_trait::async_trait;
use thiserror::Error;

use crate::extract::ExtractError;

/// Errors that can occur when talking to the catalog API.
#[derive(Debug, Error)]
pub enum CatalogApiError {
    /// HTTP request failed.
    #[error("HTTP request failed: {0}")]
    HttpError(#[from] reqwest::Error),

    /// API returned a non-success HTTP status.
    #[error("API error: {status} - {message}")]
    ApiError { status: u16, message: String },

    /// No JSON payload could be extracted from the response body.
    #[error("Failed to extract response: {0}")]
    Extract(#[from] ExtractError),

    /// Failed to parse the extracted JSON.
    #[error("Failed to parse response: {0}")]
    ParseError(String),

    /// The API answered but refused the request.
    #[error("Request rejected: {0}")]
    Rejected(String),

    /// Client not configured (missing API key, etc.).
    #[error("Client not configured: {0}")]
    NotConfigured(String),
}

/// Trait for catalog API clients.
#[async_trait]
pub trait CatalogApi: Send + Sync {
    /// Obtain a user hash, logging in at most once per client.
    ///
    /// Returns `None` when no hash could be obtained; callers proceed
    /// without one since `getSets` also works anonymously.
    async fn authenticate(&self) -> Option<String>;

    /// Fetch one page of sets. No retries.
    async fn list_sets(&self, query: &SetsQuery) -> Result<SetsPage, CatalogApiError>;

    /// Drop the held user hash.
    async fn clear_session(&self);
}
