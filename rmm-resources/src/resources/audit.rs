use crate::api::{segment, Listing, RmmApi};
use rmm::pagination::Envelopes;
use serde_json::Value;

/// Hardware and software inventory.
pub struct AuditApi<'a> {
    api: &'a RmmApi,
}

impl<'a> AuditApi<'a> {
    pub(crate) fn new(api: &'a RmmApi) -> Self {
        Self { api }
    }

    pub async fn device(&self, device_uid: &str) -> rmm::Result<Value> {
        let endpoint = format!("/api/v2/audit/device/{}", segment(device_uid));
        self.api.client().get(&endpoint, None).await
    }

    /// Installed software; the list arrives under `software`.
    pub async fn software(&self, device_uid: &str, listing: Listing) -> rmm::Result<Vec<Value>> {
        let endpoint = format!("/api/v2/audit/device/{}/software", segment(device_uid));
        self.api
            .list(&endpoint, None, Envelopes::default().with_key("software"), listing)
            .await
    }

    pub async fn esxi_host(&self, device_uid: &str) -> rmm::Result<Value> {
        let endpoint = format!("/api/v2/audit/esxihost/{}", segment(device_uid));
        self.api.client().get(&endpoint, None).await
    }

    pub async fn printer(&self, device_uid: &str) -> rmm::Result<Value> {
        let endpoint = format!("/api/v2/audit/printer/{}", segment(device_uid));
        self.api.client().get(&endpoint, None).await
    }

    pub async fn by_mac(&self, mac_address: &str) -> rmm::Result<Value> {
        let endpoint = format!(
            "/api/v2/audit/device/macAddress/{}",
            segment(mac_address)
        );
        self.api.client().get(&endpoint, None).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{api_for, page};
    use mockito::Server;
    use serde_json::json;

    #[tokio::test]
    async fn test_software_envelope() {
        let mut server = Server::new_async().await;
        let _mock = server
            .mock("GET", "/api/v2/audit/device/d1/software")
            .match_query(page(0))
            .with_status(200)
            .with_body(
                json!({
                    "pageDetails": {"count": 2, "totalCount": 2},
                    "software": [
                        {"name": "7-Zip", "version": "23.01"},
                        {"name": "Firefox", "version": "131.0"}
                    ]
                })
                .to_string(),
            )
            .create_async()
            .await;

        let api = api_for(&server);
        let software = api.audit().software("d1", Listing::All).await.unwrap();
        assert_eq!(software.len(), 2);
        assert_eq!(software[1]["name"], "Firefox");
    }

    #[tokio::test]
    async fn test_single_object_endpoints() {
        let mut server = Server::new_async().await;
        let _device = server
            .mock("GET", "/api/v2/audit/device/d1")
            .with_status(200)
            .with_body(r#"{"bios": {"manufacturer": "Dell Inc."}}"#)
            .create_async()
            .await;
        let _esxi = server
            .mock("GET", "/api/v2/audit/esxihost/d2")
            .with_status(200)
            .with_body(r#"{"systemInfo": {"hostname": "esx01"}}"#)
            .create_async()
            .await;
        let _printer = server
            .mock("GET", "/api/v2/audit/printer/d3")
            .with_status(200)
            .with_body(r#"{"printerMarkerSupplies": []}"#)
            .create_async()
            .await;

        let api = api_for(&server);
        let device = api.audit().device("d1").await.unwrap();
        assert_eq!(device["bios"]["manufacturer"], "Dell Inc.");
        let esxi = api.audit().esxi_host("d2").await.unwrap();
        assert_eq!(esxi["systemInfo"]["hostname"], "esx01");
        let printer = api.audit().printer("d3").await.unwrap();
        assert!(printer["printerMarkerSupplies"].is_array());
    }
}
