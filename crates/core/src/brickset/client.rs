//! Brickset v3 SOAP API client.
//!
//! Brickset answers SOAP requests with a JSON document followed by the XML
//! envelope, so replies are decoded with [`extract_json`] rather than as XML.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::CONTENT_TYPE;
use reqwest::Client;
use serde::de::DeserializeOwned;
use tokio::sync::RwLock;
use tracing::{debug, warn};

use super::envelope::{envelope, soap_action};
use super::types::LoginReply;
use super::{CatalogApi, CatalogApiError, SetsPage, SetsQuery};
use crate::config::BricksetConfig;
use crate::extract::extract_json;

/// Brickset API client.
pub struct BricksetClient {
    client: Client,
    base_url: String,
    api_key: String,
    credentials: Option<(String, String)>,
    /// User hash from a successful login, reused for the client's lifetime.
    session: RwLock<Option<String>>,
}

impl BricksetClient {
    /// Create a new Brickset client.
    pub fn new(config: BricksetConfig) -> Result<Self, CatalogApiError> {
        if config.api_key.is_empty() {
            return Err(CatalogApiError::NotConfigured(
                "Brickset API key is required".to_string(),
            ));
        }

        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs as u64))
            .build()?;

        let credentials = match (config.username, config.password) {
            (Some(username), Some(password)) if !username.is_empty() => {
                Some((username, password))
            }
            _ => None,
        };

        Ok(Self {
            client,
            base_url: config.base_url,
            api_key: config.api_key,
            credentials,
            session: RwLock::new(None),
        })
    }

    /// Currently held user hash, if any.
    pub async fn user_hash(&self) -> Option<String> {
        self.session.read().await.clone()
    }

    /// POST a SOAP envelope and return the raw response body.
    async fn call(
        &self,
        operation: &str,
        fields: &[(&str, &str)],
    ) -> Result<String, CatalogApiError> {
        let response = self
            .client
            .post(&self.base_url)
            .header(CONTENT_TYPE, "text/xml; charset=utf-8")
            .header("SOAPAction", soap_action(operation))
            .body(envelope(operation, fields))
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(CatalogApiError::ApiError {
                status: status.as_u16(),
                message: body.chars().take(200).collect(),
            });
        }

        Ok(response.text().await?)
    }

    /// Call an operation and decode the leading JSON of its reply.
    async fn call_json<T: DeserializeOwned>(
        &self,
        operation: &str,
        fields: &[(&str, &str)],
    ) -> Result<T, CatalogApiError> {
        let body = self.call(operation, fields).await?;
        let value = extract_json(&body)?;
        serde_json::from_value(value).map_err(|e| {
            CatalogApiError::ParseError(format!("Failed to parse {} response: {}", operation, e))
        })
    }

    async fn login(&self, username: &str, password: &str) -> Result<String, CatalogApiError> {
        let reply: LoginReply = self
            .call_json(
                "login",
                &[
                    ("apiKey", self.api_key.as_str()),
                    ("username", username),
                    ("password", password),
                ],
            )
            .await?;

        match reply.hash {
            Some(hash) if reply.status == "success" && !hash.is_empty() => Ok(hash),
            _ => Err(CatalogApiError::Rejected(
                reply.message.unwrap_or(reply.status),
            )),
        }
    }
}

#[async_trait]
impl CatalogApi for BricksetClient {
    async fn authenticate(&self) -> Option<String> {
        if let Some(hash) = self.session.read().await.clone() {
            return Some(hash);
        }

        let Some((username, password)) = &self.credentials else {
            debug!("No Brickset credentials configured, skipping login");
            return None;
        };

        match self.login(username, password).await {
            Ok(hash) => {
                debug!("Brickset login successful");
                *self.session.write().await = Some(hash.clone());
                Some(hash)
            }
            Err(e) => {
                warn!("Brickset login failed, continuing without user hash: {}", e);
                None
            }
        }
    }

    async fn list_sets(&self, query: &SetsQuery) -> Result<SetsPage, CatalogApiError> {
        let user_hash = self.session.read().await.clone().unwrap_or_default();
        let params = query.to_params().to_string();

        debug!(
            "Brickset getSets: theme={:?}, page={}, page_size={}",
            query.theme, query.page_number, query.page_size
        );

        self.call_json(
            "getSets",
            &[
                ("apiKey", self.api_key.as_str()),
                ("userHash", user_hash.as_str()),
                ("params", params.as_str()),
            ],
        )
        .await
    }

    async fn clear_session(&self) {
        self.session.write().await.take();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(api_key: &str) -> BricksetConfig {
        BricksetConfig {
            api_key: api_key.to_string(),
            ..Default::default()
        }
    }

    #[test]
    fn test_new_requires_api_key() {
        let result = BricksetClient::new(config(""));
        assert!(matches!(result, Err(CatalogApiError::NotConfigured(_))));
    }

    #[tokio::test]
    async fn test_authenticate_without_credentials_returns_none() {
        let client = BricksetClient::new(config("key")).unwrap();
        assert_eq!(client.authenticate().await, None);
        assert_eq!(client.user_hash().await, None);
    }

    #[tokio::test]
    async fn test_username_without_password_is_anonymous() {
        let client = BricksetClient::new(BricksetConfig {
            api_key: "key".to_string(),
            username: Some("builder".to_string()),
            password: None,
            ..Default::default()
        })
        .unwrap();
        assert!(client.credentials.is_none());
        assert_eq!(client.authenticate().await, None);
    }

    #[tokio::test]
    async fn test_cached_session_is_reused_and_cleared() {
        let client = BricksetClient::new(config("key")).unwrap();
        *client.session.write().await = Some("cached-hash".to_string());

        assert_eq!(client.authenticate().await.as_deref(), Some("cached-hash"));

        client.clear_session().await;
        assert_eq!(client.user_hash().await, None);
    }
}
