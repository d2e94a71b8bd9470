use crate::api::RmmApi;
use serde_json::Value;

/// Platform status and request-rate information.
pub struct SystemApi<'a> {
    api: &'a RmmApi,
}

impl<'a> SystemApi<'a> {
    pub(crate) fn new(api: &'a RmmApi) -> Self {
        Self { api }
    }

    pub async fn status(&self) -> rmm::Result<Value> {
        self.api.client().get("/api/v2/system/status", None).await
    }

    /// Current request count against the account's rate limit.
    pub async fn request_rate(&self) -> rmm::Result<Value> {
        self.api.client().get("/api/v2/system/request_rate", None).await
    }

    /// Server-side paging limits.
    pub async fn pagination(&self) -> rmm::Result<Value> {
        self.api.client().get("/api/v2/system/pagination", None).await
    }
}
