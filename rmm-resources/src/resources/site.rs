use crate::api::{segment, Listing, RmmApi};
use rmm::pagination::Envelopes;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

/// Writable site attributes for create and update.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SiteDetails {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub on_demand: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub splashtop_auto_install: Option<bool>,
}

impl SiteDetails {
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }
}

pub struct SiteApi<'a> {
    api: &'a RmmApi,
}

impl<'a> SiteApi<'a> {
    pub(crate) fn new(api: &'a RmmApi) -> Self {
        Self { api }
    }

    pub async fn get(&self, site_uid: &str) -> rmm::Result<Value> {
        let endpoint = format!("/api/v2/site/{}", segment(site_uid));
        self.api.client().get(&endpoint, None).await
    }

    pub async fn devices(&self, site_uid: &str, listing: Listing) -> rmm::Result<Vec<Value>> {
        let endpoint = format!("/api/v2/site/{}/devices", segment(site_uid));
        self.api
            .list(&endpoint, None, Envelopes::default(), listing)
            .await
    }

    pub async fn open_alerts(&self, site_uid: &str, listing: Listing) -> rmm::Result<Vec<Value>> {
        let endpoint = format!("/api/v2/site/{}/alerts/open", segment(site_uid));
        self.api
            .list(&endpoint, None, Envelopes::default(), listing)
            .await
    }

    pub async fn variables(&self, site_uid: &str, listing: Listing) -> rmm::Result<Vec<Value>> {
        let endpoint = format!("/api/v2/site/{}/variables", segment(site_uid));
        self.api
            .list(&endpoint, None, Envelopes::default(), listing)
            .await
    }

    /// Proxy and mail recipient settings of a site.
    pub async fn settings(&self, site_uid: &str) -> rmm::Result<Value> {
        let endpoint = format!("/api/v2/site/{}/settings", segment(site_uid));
        self.api.client().get(&endpoint, None).await
    }

    pub async fn create(&self, details: &SiteDetails) -> rmm::Result<Value> {
        let body = json!(details);
        self.api.client().put("/api/v2/site", Some(&body)).await
    }

    pub async fn update(&self, site_uid: &str, details: &SiteDetails) -> rmm::Result<Value> {
        let endpoint = format!("/api/v2/site/{}", segment(site_uid));
        let body = json!(details);
        self.api.client().post(&endpoint, Some(&body)).await
    }
}
