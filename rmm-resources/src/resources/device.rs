use crate::api::{segment, Listing, RmmApi};
use chrono::NaiveDate;
use rmm::pagination::Envelopes;
use serde::Serialize;
use serde_json::{json, Map, Value};

/// User-defined field values keyed `udf1`..`udf30`.
pub type UdfFields = Map<String, Value>;

/// A one-off job running a single component on one device.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct QuickJob {
    pub job_name: String,
    pub job_component: JobComponent,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct JobComponent {
    pub component_uid: String,
    pub variables: Vec<JobVariable>,
}

#[derive(Debug, Clone, Serialize)]
pub struct JobVariable {
    pub name: String,
    pub value: String,
}

impl QuickJob {
    pub fn new(job_name: impl Into<String>, component_uid: impl Into<String>) -> Self {
        Self {
            job_name: job_name.into(),
            job_component: JobComponent {
                component_uid: component_uid.into(),
                variables: Vec::new(),
            },
        }
    }

    pub fn with_variable(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.job_component.variables.push(JobVariable {
            name: name.into(),
            value: value.into(),
        });
        self
    }
}

/// Device operations.
pub struct DeviceApi<'a> {
    api: &'a RmmApi,
}

impl<'a> DeviceApi<'a> {
    pub(crate) fn new(api: &'a RmmApi) -> Self {
        Self { api }
    }

    pub async fn get(&self, device_uid: &str) -> rmm::Result<Value> {
        let endpoint = format!("/api/v2/device/{}", segment(device_uid));
        self.api.client().get(&endpoint, None).await
    }

    pub async fn get_by_id(&self, device_id: i64) -> rmm::Result<Value> {
        let endpoint = format!("/api/v2/device/id/{}", device_id);
        self.api.client().get(&endpoint, None).await
    }

    /// Devices with the given MAC address (a MAC may be shared).
    pub async fn get_by_mac(&self, mac_address: &str) -> rmm::Result<Value> {
        let endpoint = format!("/api/v2/device/macAddress/{}", segment(mac_address));
        self.api.client().get(&endpoint, None).await
    }

    pub async fn open_alerts(&self, device_uid: &str, listing: Listing) -> rmm::Result<Vec<Value>> {
        let endpoint = format!("/api/v2/device/{}/alerts/open", segment(device_uid));
        self.api
            .list(&endpoint, None, Envelopes::default(), listing)
            .await
    }

    pub async fn resolved_alerts(
        &self,
        device_uid: &str,
        listing: Listing,
    ) -> rmm::Result<Vec<Value>> {
        let endpoint = format!("/api/v2/device/{}/alerts/resolved", segment(device_uid));
        self.api
            .list(&endpoint, None, Envelopes::default(), listing)
            .await
    }

    pub async fn move_to_site(&self, device_uid: &str, site_uid: &str) -> rmm::Result<Value> {
        let endpoint = format!(
            "/api/v2/device/{}/site/{}",
            segment(device_uid),
            segment(site_uid)
        );
        self.api.client().put(&endpoint, None).await
    }

    pub async fn create_quick_job(&self, device_uid: &str, job: &QuickJob) -> rmm::Result<Value> {
        let endpoint = format!("/api/v2/device/{}/quickjob", segment(device_uid));
        let body = json!(job);
        self.api.client().put(&endpoint, Some(&body)).await
    }

    /// Sets user-defined fields; fields not present are left unchanged.
    pub async fn set_udf(&self, device_uid: &str, fields: &UdfFields) -> rmm::Result<Value> {
        let endpoint = format!("/api/v2/device/{}/udf", segment(device_uid));
        let body = Value::Object(fields.clone());
        self.api.client().post(&endpoint, Some(&body)).await
    }

    /// Sets the warranty expiry; `None` clears it.
    pub async fn set_warranty(
        &self,
        device_uid: &str,
        warranty_date: Option<NaiveDate>,
    ) -> rmm::Result<Value> {
        let endpoint = format!("/api/v2/device/{}/warranty", segment(device_uid));
        let body = json!({
            "warrantyDate": warranty_date.map(|d| d.format("%Y-%m-%d").to_string())
        });
        self.api.client().post(&endpoint, Some(&body)).await
    }
}
