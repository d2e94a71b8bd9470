use crate::api::{segment, Listing, RmmApi};
use rmm::pagination::Envelopes;
use serde_json::Value;

pub struct JobApi<'a> {
    api: &'a RmmApi,
}

impl<'a> JobApi<'a> {
    pub(crate) fn new(api: &'a RmmApi) -> Self {
        Self { api }
    }

    pub async fn get(&self, job_uid: &str) -> rmm::Result<Value> {
        let endpoint = format!("/api/v2/job/{}", segment(job_uid));
        self.api.client().get(&endpoint, None).await
    }

    pub async fn components(&self, job_uid: &str, listing: Listing) -> rmm::Result<Vec<Value>> {
        let endpoint = format!("/api/v2/job/{}/components", segment(job_uid));
        self.api
            .list(&endpoint, None, Envelopes::default(), listing)
            .await
    }

    /// Per-device outcome of a job run.
    pub async fn results(&self, job_uid: &str, device_uid: &str) -> rmm::Result<Value> {
        self.device_output(job_uid, device_uid, "results").await
    }

    pub async fn stdout(&self, job_uid: &str, device_uid: &str) -> rmm::Result<Value> {
        self.device_output(job_uid, device_uid, "stdout").await
    }

    pub async fn stderr(&self, job_uid: &str, device_uid: &str) -> rmm::Result<Value> {
        self.device_output(job_uid, device_uid, "stderr").await
    }

    async fn device_output(&self, job_uid: &str, device_uid: &str, kind: &str) -> rmm::Result<Value> {
        let endpoint = format!(
            "/api/v2/job/{}/{}/{}",
            segment(job_uid),
            kind,
            segment(device_uid)
        );
        self.api.client().get(&endpoint, None).await
    }
}
