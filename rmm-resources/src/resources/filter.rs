use crate::api::{Listing, RmmApi};
use rmm::pagination::Envelopes;
use serde_json::Value;

/// Server-side device filters, referenced by id in device searches.
pub struct FilterApi<'a> {
    api: &'a RmmApi,
}

impl<'a> FilterApi<'a> {
    pub(crate) fn new(api: &'a RmmApi) -> Self {
        Self { api }
    }

    pub async fn default_filters(&self, listing: Listing) -> rmm::Result<Vec<Value>> {
        self.list("/api/v2/filter/default-filters", listing).await
    }

    pub async fn custom_filters(&self, listing: Listing) -> rmm::Result<Vec<Value>> {
        self.list("/api/v2/filter/custom-filters", listing).await
    }

    async fn list(&self, endpoint: &str, listing: Listing) -> rmm::Result<Vec<Value>> {
        self.api
            .list(endpoint, None, Envelopes::default().with_key("filters"), listing)
            .await
    }
}
