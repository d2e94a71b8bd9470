mod platform;

pub use platform::Platform;

use crate::credentials::Credentials;
use anyhow::{anyhow, Context, Result};
use serde::Deserialize;

/// Complete client configuration
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RmmConfig {
    #[serde(default)]
    pub api: ApiConfig,
    #[serde(default)]
    pub http: HttpConfig,
}

/// Remote API location and credentials
#[derive(Clone, Default, Deserialize)]
pub struct ApiConfig {
    /// Regional platform; expands to its API URL when `url` is not set
    #[serde(default)]
    pub platform: Option<Platform>,
    /// Explicit API base URL (takes precedence over `platform`)
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub key: Option<String>,
    #[serde(default)]
    pub secret: Option<String>,
}

impl std::fmt::Debug for ApiConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApiConfig")
            .field("platform", &self.platform)
            .field("url", &self.url)
            .field("key", &self.key)
            .field("secret", &self.secret.as_ref().map(|_| "<redacted>"))
            .finish()
    }
}

impl ApiConfig {
    /// Resolved API base URL.
    pub fn base_url(&self) -> Option<String> {
        self.url
            .clone()
            .or_else(|| self.platform.map(|p| p.api_url().to_string()))
    }
}

/// HTTP client settings
#[derive(Debug, Clone, Deserialize)]
pub struct HttpConfig {
    /// Per-request timeout (seconds)
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
}

fn default_timeout_secs() -> u64 {
    30
}

fn default_user_agent() -> String {
    format!("rmm-connector/{}", env!("CARGO_PKG_VERSION"))
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            timeout_secs: default_timeout_secs(),
            user_agent: default_user_agent(),
        }
    }
}

impl RmmConfig {
    /// Build from env vars, falling back to defaults.
    pub fn from_env() -> Self {
        let mut cfg = Self::default();
        cfg.apply_env();
        cfg
    }

    /// Overrides settings with any of the `RMM_*` env vars that are set.
    ///
    /// Unparseable values are ignored.
    pub fn apply_env(&mut self) {
        if let Ok(v) = std::env::var("RMM_PLATFORM") {
            if let Ok(p) = v.parse::<Platform>() {
                self.api.platform = Some(p);
            }
        }
        if let Ok(v) = std::env::var("RMM_API_URL") {
            self.api.url = Some(v);
        }
        if let Ok(v) = std::env::var("RMM_API_KEY") {
            self.api.key = Some(v);
        }
        if let Ok(v) = std::env::var("RMM_API_SECRET") {
            self.api.secret = Some(v);
        }
        if let Ok(v) = std::env::var("RMM_HTTP_TIMEOUT_SECS") {
            if let Ok(n) = v.parse::<u64>() {
                self.http.timeout_secs = n;
            }
        }
    }

    /// Credentials for the configured API.
    ///
    /// Fails naming the first missing setting.
    pub fn credentials(&self) -> Result<Credentials> {
        let base_url = self
            .api
            .base_url()
            .ok_or_else(|| anyhow!("API location not configured (set api.url, api.platform, RMM_API_URL or RMM_PLATFORM)"))?;
        let key = self
            .api
            .key
            .clone()
            .context("API key not configured (set api.key or RMM_API_KEY)")?;
        let secret = self
            .api
            .secret
            .clone()
            .context("API secret not configured (set api.secret or RMM_API_SECRET)")?;
        Ok(Credentials::new(base_url, key, secret))
    }
}

/// Load configuration from TOML file
pub fn load_config(path: &str) -> Result<RmmConfig> {
    let contents = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file {}", path))?;
    let config: RmmConfig =
        toml::from_str(&contents).with_context(|| format!("Failed to parse config file {}", path))?;
    Ok(config)
}
