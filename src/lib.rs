//! Client core for a remote RMM (remote monitoring and management) REST API.
//!
//! ```text
//! resource operation
//!        ↓
//! Paginator (list endpoints) ──→ HttpClient ──→ TokenManager ──→ TokenStore
//!                                     ↓               ↓
//!                                 REST API      /auth/oauth/token
//!
//! filter::apply / filter::select_fields  (in-memory, after fetch)
//! ```

// OAuth2 password grant and token caching
pub mod auth;

// Client configuration (TOML + env)
pub mod config;

// API credentials and the token store
pub mod credentials;

// Authenticated HTTP client
pub mod client;

// Error taxonomy
pub mod error;

// Client-side record filtering and projection
pub mod filter;

// Multi-page aggregation
pub mod pagination;

pub use auth::TokenManager;
pub use client::{HttpClient, Query};
pub use config::RmmConfig;
pub use credentials::{CachedToken, Credentials, MemoryTokenStore, TokenStore};
pub use error::{Error, Result};
pub use filter::{CombineMode, FilterCondition, FilterSet, Operator};
pub use pagination::{Envelopes, PageResult, Paginator};
pub use reqwest::Method;
