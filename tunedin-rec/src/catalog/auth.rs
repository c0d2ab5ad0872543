//! Catalog access tokens
//!
//! Tokens are short-lived bearer tokens obtained from either the catalog's
//! accounts service (client-credentials grant) or a token-vending proxy that
//! holds the credentials on the caller's behalf. [`SessionContext`] caches
//! the current token per process and refreshes it shortly before expiry.

use super::{CatalogError, CatalogResult};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::Deserialize;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::RwLock;
use tunedin_common::time;

/// Tokens are treated as expired this long before the issuer says they are
pub const EXPIRY_MARGIN_SECS: u64 = 60;

/// Token as returned by the issuer
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct AccessToken {
    #[serde(rename = "access_token")]
    pub token: String,
    /// Lifetime in seconds from issue
    pub expires_in: u64,
}

/// Source of fresh access tokens
#[async_trait]
pub trait TokenProvider: Send + Sync {
    async fn fetch_token(&self) -> CatalogResult<AccessToken>;
}

/// Client credentials for the accounts service
#[derive(Clone)]
pub struct ClientCredentials {
    pub client_id: String,
    pub client_secret: String,
}

impl std::fmt::Debug for ClientCredentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ClientCredentials")
            .field("client_id", &self.client_id)
            .field("client_secret", &"<redacted>")
            .finish()
    }
}

/// Fetches tokens over HTTP
///
/// With credentials: `grant_type=client_credentials` form POST with basic
/// auth. Without: empty JSON POST to a proxy. Both answer
/// `{"access_token": "...", "expires_in": N}`.
#[derive(Debug)]
pub struct HttpTokenProvider {
    http_client: reqwest::Client,
    endpoint: String,
    credentials: Option<ClientCredentials>,
}

impl HttpTokenProvider {
    pub fn new(
        endpoint: impl Into<String>,
        credentials: Option<ClientCredentials>,
        timeout: Duration,
    ) -> CatalogResult<Self> {
        let http_client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| CatalogError::Transport(e.to_string()))?;

        Ok(Self {
            http_client,
            endpoint: endpoint.into(),
            credentials,
        })
    }
}

#[async_trait]
impl TokenProvider for HttpTokenProvider {
    async fn fetch_token(&self) -> CatalogResult<AccessToken> {
        let request = match &self.credentials {
            Some(creds) => self
                .http_client
                .post(&self.endpoint)
                .basic_auth(&creds.client_id, Some(&creds.client_secret))
                .form(&[("grant_type", "client_credentials")]),
            None => self
                .http_client
                .post(&self.endpoint)
                .json(&serde_json::json!({})),
        };

        let response = request
            .send()
            .await
            .map_err(|e| CatalogError::Auth(format!("token request failed: {}", e)))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(CatalogError::Auth(format!(
                "token endpoint returned {}: {}",
                status.as_u16(),
                body
            )));
        }

        let token: AccessToken = response
            .json()
            .await
            .map_err(|e| CatalogError::Auth(format!("malformed token response: {}", e)))?;

        if token.token.is_empty() {
            return Err(CatalogError::Auth("token endpoint returned an empty token".into()));
        }

        tracing::debug!(expires_in = token.expires_in, "Fetched catalog access token");
        Ok(token)
    }
}

#[derive(Debug, Clone)]
struct CachedToken {
    token: String,
    expires_at: DateTime<Utc>,
}

/// Process-wide token cache
///
/// Concurrent refreshes are allowed; the last writer wins.
#[derive(Clone)]
pub struct SessionContext {
    provider: Arc<dyn TokenProvider>,
    cached: Arc<RwLock<Option<CachedToken>>>,
}

impl SessionContext {
    pub fn new(provider: Arc<dyn TokenProvider>) -> Self {
        Self {
            provider,
            cached: Arc::new(RwLock::new(None)),
        }
    }

    /// Current token, refreshing it if missing or about to expire
    pub async fn access_token(&self) -> CatalogResult<String> {
        if let Some(cached) = self.cached.read().await.as_ref() {
            if time::now() < cached.expires_at {
                return Ok(cached.token.clone());
            }
        }

        let fresh = self.provider.fetch_token().await?;
        let expires_at =
            time::expiry_with_margin(time::now(), fresh.expires_in, EXPIRY_MARGIN_SECS);

        *self.cached.write().await = Some(CachedToken {
            token: fresh.token.clone(),
            expires_at,
        });

        Ok(fresh.token)
    }

    /// Drop the cached token so the next call fetches a new one
    pub async fn invalidate(&self) {
        tracing::debug!("Invalidating cached catalog token");
        *self.cached.write().await = None;
    }
}

impl std::fmt::Debug for SessionContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionContext").finish_non_exhaustive()
    }
}
