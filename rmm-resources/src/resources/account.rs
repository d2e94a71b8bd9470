use crate::api::{Listing, RmmApi};
use crate::query::DeviceQuery;
use rmm::pagination::Envelopes;
use rmm::Query;
use serde_json::Value;
use tracing::debug;

/// Server-side device search parameters for the account device list.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DeviceSearch {
    pub hostname: Option<String>,
    pub device_type: Option<String>,
    pub operating_system: Option<String>,
    pub site_name: Option<String>,
    /// Id of a default or custom device filter
    pub filter_id: Option<i64>,
}

impl DeviceSearch {
    fn to_query(&self) -> Query {
        let mut query = Query::new();
        let params = [
            ("hostname", self.hostname.clone()),
            ("deviceType", self.device_type.clone()),
            ("operatingSystem", self.operating_system.clone()),
            ("siteName", self.site_name.clone()),
            ("filterId", self.filter_id.map(|id| id.to_string())),
        ];
        for (key, value) in params {
            if let Some(value) = value {
                query.insert(key.to_string(), value);
            }
        }
        query
    }
}

/// Account-level operations.
pub struct AccountApi<'a> {
    api: &'a RmmApi,
}

impl<'a> AccountApi<'a> {
    pub(crate) fn new(api: &'a RmmApi) -> Self {
        Self { api }
    }

    /// Account the credentials belong to.
    pub async fn get(&self) -> rmm::Result<Value> {
        self.api.client().get("/api/v2/account", None).await
    }

    pub async fn users(&self, listing: Listing) -> rmm::Result<Vec<Value>> {
        self.api
            .list("/api/v2/account/users", None, Envelopes::default(), listing)
            .await
    }

    /// Sites, optionally narrowed by (partial) site name.
    pub async fn sites(&self, site_name: Option<&str>, listing: Listing) -> rmm::Result<Vec<Value>> {
        let mut query = Query::new();
        if let Some(name) = site_name {
            query.insert("siteName".to_string(), name.to_string());
        }
        self.api
            .list("/api/v2/account/sites", Some(&query), Envelopes::default(), listing)
            .await
    }

    pub async fn devices(&self, search: &DeviceSearch, listing: Listing) -> rmm::Result<Vec<Value>> {
        self.api
            .list(
                "/api/v2/account/devices",
                Some(&search.to_query()),
                Envelopes::default(),
                listing,
            )
            .await
    }

    /// Fetches every matching device, then applies the client-side filter
    /// and field selection. The limit applies to the filtered result.
    pub async fn query_devices(
        &self,
        search: &DeviceSearch,
        query: &DeviceQuery,
        listing: Listing,
    ) -> rmm::Result<Vec<Value>> {
        let devices = self.devices(search, Listing::All).await?;
        let fetched = devices.len();
        let matched = listing.truncate(query.run(devices));
        debug!(
            fetched = fetched,
            returned = matched.len(),
            conditions = query.filters.conditions.len(),
            "Applied device filter"
        );
        Ok(matched)
    }

    pub async fn open_alerts(&self, muted: Option<bool>, listing: Listing) -> rmm::Result<Vec<Value>> {
        self.alerts("/api/v2/account/alerts/open", muted, listing).await
    }

    pub async fn resolved_alerts(
        &self,
        muted: Option<bool>,
        listing: Listing,
    ) -> rmm::Result<Vec<Value>> {
        self.alerts("/api/v2/account/alerts/resolved", muted, listing)
            .await
    }

    pub async fn variables(&self, listing: Listing) -> rmm::Result<Vec<Value>> {
        self.api
            .list("/api/v2/account/variables", None, Envelopes::default(), listing)
            .await
    }

    pub async fn components(&self, listing: Listing) -> rmm::Result<Vec<Value>> {
        self.api
            .list("/api/v2/account/components", None, Envelopes::default(), listing)
            .await
    }

    async fn alerts(
        &self,
        endpoint: &str,
        muted: Option<bool>,
        listing: Listing,
    ) -> rmm::Result<Vec<Value>> {
        let mut query = Query::new();
        if let Some(muted) = muted {
            query.insert("muted".to_string(), muted.to_string());
        }
        self.api
            .list(endpoint, Some(&query), Envelopes::default(), listing)
            .await
    }
}
