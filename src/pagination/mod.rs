//! Page aggregation for list endpoints.
//!
//! Pages are requested strictly in sequence with `page` (zero-based) and
//! `max` query parameters. Each page is normalized through [`Envelopes`]
//! and appended to the result. Termination:
//! - `pageDetails.totalCount` present → stop once that many records are collected
//! - otherwise → stop on the first page shorter than the page size
//! - an empty page always stops
//! - after [`MAX_PAGES`] pages the loop gives up with a warning and returns
//!   what it has
//!
//! Without `totalCount`, a final page of exactly `page_size` records costs
//! one extra request that comes back empty.

mod envelope;

pub use envelope::{
    array_items, total_count, EnvelopeRule, Envelopes, Extractor, DEFAULT_ENVELOPE_KEYS,
};

use crate::client::{HttpClient, Query};
use crate::error::Result;
use reqwest::Method;
use serde_json::Value;
use tracing::{debug, warn};


/// Records requested per page.
pub const PAGE_SIZE: usize = 100;

/// Safety ceiling on pages fetched by one aggregation.
pub const MAX_PAGES: usize = 1000;

/// One normalized page.
#[derive(Debug, Clone, PartialEq)]
pub struct PageResult {
    pub items: Vec<Value>,
    pub total_count: Option<u64>,
}

/// Fetches and flattens every page of a list endpoint.
pub struct Paginator<'a> {
    client: &'a HttpClient,
    envelopes: Envelopes,
    page_size: usize,
    max_pages: usize,
}

impl<'a> Paginator<'a> {
    pub fn new(client: &'a HttpClient) -> Self {
        Self {
            client,
            envelopes: Envelopes::default(),
            page_size: PAGE_SIZE,
            max_pages: MAX_PAGES,
        }
    }

    /// Replaces the envelope table for this call site.
    pub fn with_envelopes(mut self, envelopes: Envelopes) -> Self {
        self.envelopes = envelopes;
        self
    }

    pub fn with_page_size(mut self, page_size: usize) -> Self {
        self.page_size = page_size.max(1);
        self
    }

    pub fn with_max_pages(mut self, max_pages: usize) -> Self {
        self.max_pages = max_pages;
        self
    }

    /// Requests a single page and normalizes it.
    pub async fn fetch_page(
        &self,
        method: Method,
        endpoint: &str,
        body: Option<&Value>,
        base_query: Option<&Query>,
        page: usize,
    ) -> Result<PageResult> {
        let mut query = base_query.cloned().unwrap_or_default();
        query.insert("page".to_string(), page.to_string());
        query.insert("max".to_string(), self.page_size.to_string());

        let response = self
            .client
            .request(method, endpoint, body, Some(&query), None)
            .await?;

        Ok(PageResult {
            items: self.envelopes.extract(&response),
            total_count: total_count(&response),
        })
    }

    /// Fetches every page and returns all records in request order.
    ///
    /// Only errors raised by the HTTP client are returned; running out of
    /// pages, or hitting the page ceiling, is not an error.
    pub async fn fetch_all(
        &self,
        method: Method,
        endpoint: &str,
        body: Option<&Value>,
        base_query: Option<&Query>,
    ) -> Result<Vec<Value>> {
        self.collect(method, endpoint, body, base_query, None).await
    }

    /// Like [`fetch_all`](Self::fetch_all) but stops once `limit` records
    /// are collected, truncating to exactly `limit`.
    pub async fn fetch_limited(
        &self,
        method: Method,
        endpoint: &str,
        body: Option<&Value>,
        base_query: Option<&Query>,
        limit: usize,
    ) -> Result<Vec<Value>> {
        self.collect(method, endpoint, body, base_query, Some(limit))
            .await
    }

    async fn collect(
        &self,
        method: Method,
        endpoint: &str,
        body: Option<&Value>,
        base_query: Option<&Query>,
        limit: Option<usize>,
    ) -> Result<Vec<Value>> {
        let mut collected: Vec<Value> = Vec::new();
        let mut page = 0;

        loop {
            if limit.is_some_and(|limit| collected.len() >= limit) {
                break;
            }
            if page >= self.max_pages {
                warn!(
                    endpoint = %endpoint,
                    pages = page,
                    collected = collected.len(),
                    "Page ceiling reached, returning partial results"
                );
                break;
            }

            let result = self
                .fetch_page(method.clone(), endpoint, body, base_query, page)
                .await?;
            let page_len = result.items.len();
            collected.extend(result.items);

            let has_more = match result.total_count {
                Some(total) => (collected.len() as u64) < total,
                None => page_len >= self.page_size,
            };

            debug!(
                endpoint = %endpoint,
                page = page,
                page_len = page_len,
                total_count = ?result.total_count,
                collected = collected.len(),
                "Fetched page"
            );

            page += 1;
            if page_len == 0 || !has_more {
                break;
            }
        }

        if let Some(limit) = limit {
            collected.truncate(limit);
        }
        Ok(collected)
    }
}
