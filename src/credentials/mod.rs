//! API credentials and the cached OAuth token.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────┐
//! │       Credentials                        │
//! │  - API base URL                          │
//! │  - API key / secret (password grant)     │
//! └─────────────────────────────────────────┘
//!          ↓
//! ┌─────────────────────────────────────────┐
//! │       TokenManager (crate::auth)         │
//! │  - Password grant on cache miss          │
//! └─────────────────────────────────────────┘
//!          ↓                    ↑
//!        (set)            (get / invalidate)
//!          ↓                    ↑
//! ┌─────────────────────────────────────────┐
//! │       TokenStore                         │
//! │  - Whole-value replacement               │
//! │  - In-memory only, never persisted       │
//! └─────────────────────────────────────────┘
//! ```
//!
//! # Usage
//!
//! ```
//! use rmm::credentials::{CachedToken, Credentials, MemoryTokenStore, TokenStore};
//!
//! let credentials = Credentials::new("https://merlot-api.centrastage.net/", "key", "secret");
//! assert_eq!(credentials.api_base_url, "https://merlot-api.centrastage.net");
//!
//! let store = MemoryTokenStore::new();
//! store.set(CachedToken::issued_at("abc".to_string(), "bearer".to_string(), 3600, 0));
//! assert_eq!(store.get().unwrap().expires_at_epoch_ms, 3_600_000);
//! store.invalidate();
//! assert!(store.get().is_none());
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;

mod store;

pub use store::{MemoryTokenStore, TokenStore};

/// Safety margin before expiry inside which a cached token is refreshed.
pub const EXPIRY_BUFFER_MS: i64 = 300_000;

/// Credentials for the remote RMM API.
///
/// The access token obtained from these is held separately in a
/// [`TokenStore`]; this record is never mutated after construction.
#[derive(Clone, Serialize, Deserialize)]
pub struct Credentials {
    /// API base URL without trailing slash (e.g. `https://merlot-api.centrastage.net`)
    pub api_base_url: String,

    /// API key, sent as the password grant username
    pub api_key: String,

    /// API secret key, sent as the password grant password
    pub api_secret: String,
}

impl Credentials {
    /// Builds credentials, trimming any trailing slash from the base URL.
    pub fn new(
        api_base_url: impl Into<String>,
        api_key: impl Into<String>,
        api_secret: impl Into<String>,
    ) -> Self {
        let api_base_url = api_base_url.into().trim_end_matches('/').to_string();
        Self {
            api_base_url,
            api_key: api_key.into(),
            api_secret: api_secret.into(),
        }
    }

    /// Absolute URL for an API path such as `/api/v2/account`.
    pub fn url_for(&self, endpoint: &str) -> String {
        format!("{}{}", self.api_base_url, endpoint)
    }

    /// OAuth2 token endpoint for this platform.
    pub fn token_url(&self) -> String {
        self.url_for("/auth/oauth/token")
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("api_base_url", &self.api_base_url)
            .field("api_key", &self.api_key)
            .field("api_secret", &"<redacted>")
            .finish()
    }
}

/// An access token together with its absolute expiry.
#[derive(Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct CachedToken {
    /// OAuth access token (sent as `Authorization: Bearer <token>`)
    pub access_token: String,

    /// Token type reported by the server (normally `bearer`)
    pub token_type: String,

    /// Lifetime reported by the server, in seconds
    pub expires_in_seconds: i64,

    /// Absolute expiry, milliseconds since the Unix epoch
    pub expires_at_epoch_ms: i64,
}

impl CachedToken {
    /// Builds a token issued at `now_ms` that lives for `expires_in_seconds`.
    pub fn issued_at(
        access_token: String,
        token_type: String,
        expires_in_seconds: i64,
        now_ms: i64,
    ) -> Self {
        Self {
            access_token,
            token_type,
            expires_in_seconds,
            expires_at_epoch_ms: now_ms.saturating_add(expires_in_seconds.saturating_mul(1000)),
        }
    }

    /// True while `now_ms` is before the expiry minus [`EXPIRY_BUFFER_MS`].
    pub fn is_valid_at(&self, now_ms: i64) -> bool {
        now_ms < self.expires_at_epoch_ms - EXPIRY_BUFFER_MS
    }
}

impl fmt::Debug for CachedToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CachedToken")
            .field("access_token", &"<redacted>")
            .field("token_type", &self.token_type)
            .field("expires_in_seconds", &self.expires_in_seconds)
            .field("expires_at_epoch_ms", &self.expires_at_epoch_ms)
            .finish()
    }
}
