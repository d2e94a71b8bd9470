//! Per-resource endpoint wrappers.
//!
//! All paths are relative to the API base URL and use the `/api/v2` surface.

pub mod account;
pub mod alert;
pub mod audit;
pub mod device;
pub mod filter;
pub mod job;
pub mod site;
pub mod system;
