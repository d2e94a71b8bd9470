//! Shared helpers for resource tests.

use crate::RmmApi;
use chrono::Utc;
use mockito::{Matcher, ServerGuard};
use rmm::config::HttpConfig;
use rmm::{CachedToken, Credentials, HttpClient, MemoryTokenStore, TokenStore};
use std::sync::Arc;

/// API client pointed at a mock server with a valid token already cached.
pub(crate) fn api_for(server: &ServerGuard) -> RmmApi {
    let token = CachedToken::issued_at(
        "test-token".to_string(),
        "bearer".to_string(),
        3600,
        Utc::now().timestamp_millis(),
    );
    let store: Arc<dyn TokenStore> = Arc::new(MemoryTokenStore::with_token(token));
    let client = HttpClient::with_config(
        Credentials::new(server.url(), "api-key", "api-secret"),
        &HttpConfig::default(),
        store,
    )
    .unwrap();
    RmmApi::new(client)
}

/// Matches the paging parameters of page `page`.
pub(crate) fn page(page: usize) -> Matcher {
    Matcher::AllOf(vec![
        Matcher::UrlEncoded("page".into(), page.to_string()),
        Matcher::UrlEncoded("max".into(), "100".into()),
    ])
}
