//! OAuth2 token lifecycle.
//!
//! [`TokenManager`] hands out a bearer token for the configured
//! credentials:
//! 1. Cached token still valid (more than 5 minutes left) → returned as-is
//! 2. Otherwise → password grant against `/auth/oauth/token`
//! 3. New token written to the [`TokenStore`] and returned
//!
//! A downstream 401 calls [`TokenManager::invalidate`] so the next call
//! performs a fresh grant.

mod exchange;

pub use exchange::{DEFAULT_EXPIRES_IN_SECS, OAUTH_CLIENT_ID, OAUTH_CLIENT_SECRET};

use crate::credentials::{CachedToken, Credentials, TokenStore};
use crate::error::Result;
use chrono::Utc;
use reqwest::Client;
use std::sync::Arc;
use tracing::{debug, info};


/// Acquires and caches OAuth access tokens.
pub struct TokenManager {
    http_client: Client,
    credentials: Credentials,
    store: Arc<dyn TokenStore>,
}

impl TokenManager {
    /// Creates a token manager.
    ///
    /// # Arguments
    /// * `http_client` - Client used for the token exchange
    /// * `credentials` - Base URL and API key/secret
    /// * `store` - Token cache; share it to share tokens between managers
    pub fn new(http_client: Client, credentials: Credentials, store: Arc<dyn TokenStore>) -> Self {
        Self {
            http_client,
            credentials,
            store,
        }
    }

    pub fn credentials(&self) -> &Credentials {
        &self.credentials
    }

    pub fn store(&self) -> &Arc<dyn TokenStore> {
        &self.store
    }

    /// Returns a valid access token, performing a password grant on a
    /// cache miss or when the cached token is inside the expiry buffer.
    ///
    /// # Errors
    /// * `Error::Authentication` - Grant failed or returned no token
    pub async fn get_access_token(&self) -> Result<String> {
        if let Some(token) = self.store.get() {
            if token.is_valid_at(Utc::now().timestamp_millis()) {
                return Ok(token.access_token);
            }
            debug!(
                expires_at_epoch_ms = token.expires_at_epoch_ms,
                "Cached token expired or about to expire"
            );
        }

        let issued = exchange::password_grant(&self.http_client, &self.credentials).await?;
        let token = CachedToken::issued_at(
            issued.access_token,
            issued.token_type,
            issued.expires_in,
            Utc::now().timestamp_millis(),
        );

        info!(
            api_base_url = %self.credentials.api_base_url,
            expires_in = token.expires_in_seconds,
            "Acquired access token"
        );

        let access_token = token.access_token.clone();
        self.store.set(token);
        Ok(access_token)
    }

    /// Discards the cached token.
    pub fn invalidate(&self) {
        debug!("Invalidating cached access token");
        self.store.invalidate();
    }
}
