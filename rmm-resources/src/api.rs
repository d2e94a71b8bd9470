use anyhow::{Context, Result};
use rmm::pagination::Envelopes;
use rmm::{HttpClient, Method, MemoryTokenStore, Paginator, Query, RmmConfig};
use serde_json::Value;
use std::borrow::Cow;
use std::sync::Arc;

use crate::resources::{
    account::AccountApi, alert::AlertApi, audit::AuditApi, device::DeviceApi, filter::FilterApi,
    job::JobApi, site::SiteApi, system::SystemApi,
};

/// How many records a list operation returns.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Listing {
    /// Every page until the server runs out
    #[default]
    All,
    /// At most this many records
    Limit(usize),
}

impl Listing {
    /// `Limit(n)` when a limit is given, otherwise `All`.
    pub fn from_limit(limit: Option<usize>) -> Self {
        limit.map_or(Listing::All, Listing::Limit)
    }

    /// Truncates an already-fetched result set.
    pub fn truncate(self, mut records: Vec<Value>) -> Vec<Value> {
        if let Listing::Limit(limit) = self {
            records.truncate(limit);
        }
        records
    }
}

/// Entry point for all resource operations.
pub struct RmmApi {
    client: HttpClient,
}

impl RmmApi {
    pub fn new(client: HttpClient) -> Self {
        Self { client }
    }

    /// Builds the client from configuration with a private token cache.
    pub fn from_config(config: &RmmConfig) -> Result<Self> {
        let credentials = config.credentials()?;
        let client = HttpClient::with_config(
            credentials,
            &config.http,
            Arc::new(MemoryTokenStore::new()),
        )
        .context("Failed to build HTTP client")?;
        Ok(Self::new(client))
    }

    pub fn client(&self) -> &HttpClient {
        &self.client
    }

    pub fn account(&self) -> AccountApi<'_> {
        AccountApi::new(self)
    }

    pub fn devices(&self) -> DeviceApi<'_> {
        DeviceApi::new(self)
    }

    pub fn sites(&self) -> SiteApi<'_> {
        SiteApi::new(self)
    }

    pub fn alerts(&self) -> AlertApi<'_> {
        AlertApi::new(self)
    }

    pub fn jobs(&self) -> JobApi<'_> {
        JobApi::new(self)
    }

    pub fn audit(&self) -> AuditApi<'_> {
        AuditApi::new(self)
    }

    pub fn filters(&self) -> FilterApi<'_> {
        FilterApi::new(self)
    }

    pub fn system(&self) -> SystemApi<'_> {
        SystemApi::new(self)
    }

    /// Fetches a list endpoint honouring `listing`.
    pub(crate) async fn list(
        &self,
        endpoint: &str,
        query: Option<&Query>,
        envelopes: Envelopes,
        listing: Listing,
    ) -> rmm::Result<Vec<Value>> {
        let paginator = Paginator::new(&self.client).with_envelopes(envelopes);
        match listing {
            Listing::All => {
                paginator
                    .fetch_all(Method::GET, endpoint, None, query)
                    .await
            }
            Listing::Limit(limit) => {
                paginator
                    .fetch_limited(Method::GET, endpoint, None, query, limit)
                    .await
            }
        }
    }
}

/// Percent-encodes one path segment (uids, MAC addresses).
pub(crate) fn segment(value: &str) -> Cow<'_, str> {
    urlencoding::encode(value)
}
