//! Mock catalog API for testing.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::brickset::{CatalogApi, CatalogApiError, SetsPage, SetsQuery};
use crate::extract::ExtractError;

/// Scripted reply for one (theme, page) request.
#[derive(Debug, Clone)]
pub enum MockReply {
    /// Decoded page (may carry a non-success status).
    Page(SetsPage),
    /// Non-success HTTP status.
    HttpStatus(u16),
    /// Body with no extractable JSON.
    Malformed,
}

/// Mock implementation of the CatalogApi trait.
///
/// Provides controllable behavior for testing:
/// - Scripted replies per theme and page number
/// - Configurable login result
/// - Recorded queries and login attempts for assertions
///
/// Requests for pages that were never scripted succeed with no sets, which
/// is what Brickset answers for an unknown theme.
///
/// # Example
///
/// ```rust,ignore
/// use brickvault_core::testing::{fixtures, MockCatalogApi};
///
/// let api = MockCatalogApi::new();
/// api.set_page("Castle", 1, fixtures::page(2, vec![
///     fixtures::api_set(1, "6080-1", "Castle"),
///     fixtures::api_set(2, "6081-1", "Castle"),
/// ])).await;
/// ```
#[derive(Debug, Clone, Default)]
pub struct MockCatalogApi {
    /// Replies by (theme, page number).
    replies: Arc<RwLock<HashMap<(String, u32), MockReply>>>,
    /// Hash handed out by a successful login; `None` makes login fail.
    login_hash: Arc<RwLock<Option<String>>>,
    /// Hash currently held.
    session: Arc<RwLock<Option<String>>>,
    /// Number of login attempts.
    login_attempts: Arc<RwLock<usize>>,
    /// Recorded queries along with the user hash they were sent with.
    queries: Arc<RwLock<Vec<(SetsQuery, Option<String>)>>>,
}

impl MockCatalogApi {
    /// Create a new mock API with no scripted replies and failing login.
    pub fn new() -> Self {
        Self::default()
    }

    // =========================================================================
    // Configuration
    // =========================================================================

    /// Make login succeed with the given hash.
    pub async fn set_login_hash(&self, hash: &str) {
        *self.login_hash.write().await = Some(hash.to_string());
    }

    /// Script the reply for a theme page.
    pub async fn set_reply(&self, theme: &str, page: u32, reply: MockReply) {
        self.replies
            .write()
            .await
            .insert((theme.to_string(), page), reply);
    }

    /// Script a decoded page for a theme.
    pub async fn set_page(&self, theme: &str, page: u32, sets_page: SetsPage) {
        self.set_reply(theme, page, MockReply::Page(sets_page)).await;
    }

    /// Make a theme page fail with an HTTP status.
    pub async fn fail_page(&self, theme: &str, page: u32, status: u16) {
        self.set_reply(theme, page, MockReply::HttpStatus(status))
            .await;
    }

    // =========================================================================
    // Recording
    // =========================================================================

    /// All `getSets` queries made, in order.
    pub async fn recorded_queries(&self) -> Vec<SetsQuery> {
        self.queries
            .read()
            .await
            .iter()
            .map(|(q, _)| q.clone())
            .collect()
    }

    /// User hashes sent with each `getSets` query, in order.
    pub async fn recorded_hashes(&self) -> Vec<Option<String>> {
        self.queries
            .read()
            .await
            .iter()
            .map(|(_, h)| h.clone())
            .collect()
    }

    /// Page numbers requested for a theme, in order.
    pub async fn pages_requested(&self, theme: &str) -> Vec<u32> {
        self.queries
            .read()
            .await
            .iter()
            .filter(|(q, _)| q.theme.as_deref() == Some(theme))
            .map(|(q, _)| q.page_number)
            .collect()
    }

    pub async fn login_attempts(&self) -> usize {
        *self.login_attempts.read().await
    }

    /// Hash currently held by the mock.
    pub async fn session(&self) -> Option<String> {
        self.session.read().await.clone()
    }
}

#[async_trait]
impl CatalogApi for MockCatalogApi {
    async fn authenticate(&self) -> Option<String> {
        if let Some(hash) = self.session.read().await.clone() {
            return Some(hash);
        }

        *self.login_attempts.write().await += 1;

        let hash = self.login_hash.read().await.clone();
        *self.session.write().await = hash.clone();
        hash
    }

    async fn list_sets(&self, query: &SetsQuery) -> Result<SetsPage, CatalogApiError> {
        let session = self.session.read().await.clone();
        self.queries.write().await.push((query.clone(), session));

        let key = (query.theme.clone().unwrap_or_default(), query.page_number);
        let reply = self.replies.read().await.get(&key).cloned();

        match reply {
            Some(MockReply::Page(page)) => Ok(page),
            Some(MockReply::HttpStatus(status)) => Err(CatalogApiError::ApiError {
                status,
                message: "mock failure".to_string(),
            }),
            Some(MockReply::Malformed) => Err(CatalogApiError::Extract(ExtractError::Unbalanced)),
            None => Ok(SetsPage {
                status: "success".to_string(),
                ..Default::default()
            }),
        }
    }

    async fn clear_session(&self) {
        self.session.write().await.take();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::fixtures;

    #[tokio::test]
    async fn test_login_is_memoized() {
        let api = MockCatalogApi::new();
        api.set_login_hash("hash-1").await;

        assert_eq!(api.authenticate().await.as_deref(), Some("hash-1"));
        assert_eq!(api.authenticate().await.as_deref(), Some("hash-1"));
        assert_eq!(api.login_attempts().await, 1);
    }

    #[tokio::test]
    async fn test_failed_login_returns_none() {
        let api = MockCatalogApi::new();
        assert_eq!(api.authenticate().await, None);
        assert_eq!(api.session().await, None);
    }

    #[tokio::test]
    async fn test_scripted_replies() {
        let api = MockCatalogApi::new();
        api.set_page(
            "Castle",
            1,
            fixtures::page(1, vec![fixtures::api_set(1, "6080-1", "Castle")]),
        )
        .await;
        api.fail_page("Castle", 2, 503).await;
        api.set_reply("Castle", 3, MockReply::Malformed).await;

        let page = api
            .list_sets(&SetsQuery::theme_page("Castle", 500, 1))
            .await
            .unwrap();
        assert_eq!(page.sets.len(), 1);

        let err = api
            .list_sets(&SetsQuery::theme_page("Castle", 500, 2))
            .await
            .unwrap_err();
        assert!(matches!(err, CatalogApiError::ApiError { status: 503, .. }));

        let err = api
            .list_sets(&SetsQuery::theme_page("Castle", 500, 3))
            .await
            .unwrap_err();
        assert!(matches!(err, CatalogApiError::Extract(_)));

        let page = api
            .list_sets(&SetsQuery::theme_page("Unknown", 500, 1))
            .await
            .unwrap();
        assert!(page.is_success());
        assert_eq!(page.matches, 0);

        assert_eq!(api.pages_requested("Castle").await, vec![1, 2, 3]);
    }
}
