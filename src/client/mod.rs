//! Authenticated HTTP client for the RMM REST API.
//!
//! Every call carries `Authorization: Bearer <token>` from the
//! [`TokenManager`]. A 401 response invalidates the cached token and the
//! identical request is re-issued exactly once with a fresh token; the
//! second result is returned whatever it is.

use crate::auth::TokenManager;
use crate::config::HttpConfig;
use crate::credentials::{Credentials, MemoryTokenStore, TokenStore};
use crate::error::{Error, Result};
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, AUTHORIZATION};
use reqwest::{Client, Method};
use serde_json::Value;
use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, warn};
use uuid::Uuid;


/// Query string parameters. Later inserts override earlier keys.
pub type Query = BTreeMap<String, String>;

/// HTTP client with token lifecycle and transparent retry on 401.
pub struct HttpClient {
    http_client: Client,
    tokens: TokenManager,
}

impl HttpClient {
    /// Creates a client with default HTTP settings and a private token cache.
    pub fn new(credentials: Credentials) -> Result<Self> {
        Self::with_config(
            credentials,
            &HttpConfig::default(),
            Arc::new(MemoryTokenStore::new()),
        )
    }

    /// Creates a client from HTTP settings and a (possibly shared) token store.
    pub fn with_config(
        credentials: Credentials,
        config: &HttpConfig,
        store: Arc<dyn TokenStore>,
    ) -> Result<Self> {
        let http_client = Client::builder()
            .user_agent(config.user_agent.as_str())
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;
        let tokens = TokenManager::new(http_client.clone(), credentials, store);
        Ok(Self::from_parts(http_client, tokens))
    }

    /// Assembles a client from an existing reqwest client and token manager.
    pub fn from_parts(http_client: Client, tokens: TokenManager) -> Self {
        Self {
            http_client,
            tokens,
        }
    }

    pub fn tokens(&self) -> &TokenManager {
        &self.tokens
    }

    pub fn credentials(&self) -> &Credentials {
        self.tokens.credentials()
    }

    /// Issues one authenticated request and returns the decoded body.
    ///
    /// # Arguments
    /// * `method` - HTTP method
    /// * `endpoint` - Path appended to the base URL (e.g. `/api/v2/account`)
    /// * `body` - JSON body; sets `Content-Type: application/json` when present
    /// * `query` - Query string parameters
    /// * `headers` - Extra headers; `Accept` and `Authorization` are always set by the client
    ///
    /// # Returns
    /// * `Ok(Value)` - Decoded JSON (`null` for an empty body, a string for non-JSON)
    /// * `Err(Error::HttpStatus)` - Non-2xx response (401 only after the single retry)
    /// * `Err(Error::Transport)` - Network failure
    /// * `Err(Error::Authentication)` - Token could not be obtained
    pub async fn request(
        &self,
        method: Method,
        endpoint: &str,
        body: Option<&Value>,
        query: Option<&Query>,
        headers: Option<&HeaderMap>,
    ) -> Result<Value> {
        let request_id = Uuid::now_v7();
        let token = self.tokens.get_access_token().await?;

        match self
            .send(&method, endpoint, body, query, headers, &token, request_id)
            .await
        {
            Err(e) if e.is_unauthorized() => {
                warn!(
                    request_id = %request_id,
                    method = %method,
                    endpoint = %endpoint,
                    "Access token rejected, refreshing and retrying once"
                );
                self.tokens.invalidate();
                let token = self.tokens.get_access_token().await?;
                self.send(&method, endpoint, body, query, headers, &token, request_id)
                    .await
            }
            other => other,
        }
    }

    pub async fn get(&self, endpoint: &str, query: Option<&Query>) -> Result<Value> {
        self.request(Method::GET, endpoint, None, query, None).await
    }

    pub async fn post(&self, endpoint: &str, body: Option<&Value>) -> Result<Value> {
        self.request(Method::POST, endpoint, body, None, None).await
    }

    pub async fn put(&self, endpoint: &str, body: Option<&Value>) -> Result<Value> {
        self.request(Method::PUT, endpoint, body, None, None).await
    }

    pub async fn delete(&self, endpoint: &str) -> Result<Value> {
        self.request(Method::DELETE, endpoint, None, None, None).await
    }

    #[allow(clippy::too_many_arguments)]
    async fn send(
        &self,
        method: &Method,
        endpoint: &str,
        body: Option<&Value>,
        query: Option<&Query>,
        headers: Option<&HeaderMap>,
        token: &str,
        request_id: Uuid,
    ) -> Result<Value> {
        let url = self.tokens.credentials().url_for(endpoint);

        let mut request_headers = headers.cloned().unwrap_or_default();
        request_headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
        let mut bearer = HeaderValue::from_str(&format!("Bearer {}", token)).map_err(|_| {
            Error::Authentication("access token is not a valid header value".to_string())
        })?;
        bearer.set_sensitive(true);
        request_headers.insert(AUTHORIZATION, bearer);

        let mut builder = self
            .http_client
            .request(method.clone(), &url)
            .headers(request_headers);
        if let Some(query) = query {
            builder = builder.query(query);
        }
        if let Some(body) = body {
            builder = builder.json(body);
        }

        let response = builder.send().await?;
        let status = response.status();
        let text = response.text().await?;

        debug!(
            request_id = %request_id,
            method = %method,
            endpoint = %endpoint,
            status = status.as_u16(),
            "API request completed"
        );

        if !status.is_success() {
            return Err(Error::HttpStatus {
                status: status.as_u16(),
                body: text,
            });
        }

        Ok(decode_body(&text))
    }
}

/// Decodes a response body: empty → `null`, JSON → value, anything else → string.
fn decode_body(text: &str) -> Value {
    if text.trim().is_empty() {
        return Value::Null;
    }
    serde_json::from_str(text).unwrap_or_else(|_| Value::String(text.to_string()))
}
