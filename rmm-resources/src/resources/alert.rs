use crate::api::{segment, RmmApi};
use serde_json::Value;

pub struct AlertApi<'a> {
    api: &'a RmmApi,
}

impl<'a> AlertApi<'a> {
    pub(crate) fn new(api: &'a RmmApi) -> Self {
        Self { api }
    }

    pub async fn get(&self, alert_uid: &str) -> rmm::Result<Value> {
        let endpoint = format!("/api/v2/alert/{}", segment(alert_uid));
        self.api.client().get(&endpoint, None).await
    }

    pub async fn resolve(&self, alert_uid: &str) -> rmm::Result<Value> {
        let endpoint = format!("/api/v2/alert/{}/resolve", segment(alert_uid));
        self.api.client().post(&endpoint, None).await
    }
}
