//! RMM resource operations - typed entry points over the client core.
//!
//! Each resource (account, device, site, alert, job, audit, filter, system)
//! is a thin set of calls that pick an endpoint, hand it to the
//! authenticated [`HttpClient`](rmm::HttpClient) or the
//! [`Paginator`](rmm::Paginator), and return decoded JSON.
//!
//! # Architecture
//!
//! ```text
//!      rmm-cli / workflow host
//!          ↓
//! ┌─────────────────────────────────────────┐
//! │       RmmApi                             │
//! │  - account() / devices() / sites() ...   │
//! │  - Listing::All | Listing::Limit(n)      │
//! └─────────────────────────────────────────┘
//!          ↓
//! ┌─────────────────────────────────────────┐
//! │       rmm core                           │
//! │  - Paginator (page/max, envelopes)       │
//! │  - HttpClient (Bearer, retry on 401)     │
//! │  - TokenManager (password grant)         │
//! └─────────────────────────────────────────┘
//!          ↓
//!       REST API
//! ```
//!
//! # Example
//!
//! ```no_run
//! use rmm::{CombineMode, FilterSet, RmmConfig};
//! use rmm_resources::{DeviceQuery, DeviceSearch, Listing, RmmApi};
//! use serde_json::json;
//!
//! # async fn example() -> anyhow::Result<()> {
//! let api = RmmApi::from_config(&RmmConfig::from_env())?;
//!
//! let account = api.account().get().await?;
//! println!("{}", account["name"]);
//!
//! let query = DeviceQuery::new(
//!     FilterSet::from_raw(
//!         &json!([{"field": "online", "operator": "equals", "booleanValue": true}]),
//!         CombineMode::And,
//!     ),
//!     vec!["hostname".to_string(), "deviceType.category".to_string()],
//! );
//! let online = api
//!     .account()
//!     .query_devices(&DeviceSearch::default(), &query, Listing::All)
//!     .await?;
//! println!("{} devices online", online.len());
//! # Ok(())
//! # }
//! ```

pub mod api;
pub mod cli;
pub mod query;
pub mod resources;

#[cfg(test)]
pub(crate) mod testing;

pub use api::{Listing, RmmApi};
pub use query::DeviceQuery;
pub use resources::account::DeviceSearch;
pub use resources::device::{QuickJob, UdfFields};
pub use resources::site::SiteDetails;
