//! Token cache storage.
//!
//! Holds at most one [`CachedToken`]. Updates always replace the whole
//! value, so a reader never observes a half-written token.

use super::CachedToken;
use std::sync::RwLock;

/// Storage for the current access token.
///
/// Implementations must be safe to share between clients; two clients
/// built on the same store share one cached token.
pub trait TokenStore: Send + Sync {
    /// Returns the cached token, if any (expired or not).
    fn get(&self) -> Option<CachedToken>;

    /// Replaces the cached token.
    fn set(&self, token: CachedToken);

    /// Discards the cached token.
    fn invalidate(&self);
}

/// In-memory token store guarded by an `RwLock`.
///
/// State lives only as long as the store; nothing is written to disk.
#[derive(Default)]
pub struct MemoryTokenStore {
    token: RwLock<Option<CachedToken>>,
}

impl MemoryTokenStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a store pre-seeded with a token.
    pub fn with_token(token: CachedToken) -> Self {
        Self {
            token: RwLock::new(Some(token)),
        }
    }
}

impl TokenStore for MemoryTokenStore {
    fn get(&self) -> Option<CachedToken> {
        // A poisoned lock still holds a complete value (writes are whole-value)
        match self.token.read() {
            Ok(guard) => guard.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }

    fn set(&self, token: CachedToken) {
        match self.token.write() {
            Ok(mut guard) => *guard = Some(token),
            Err(poisoned) => *poisoned.into_inner() = Some(token),
        }
    }

    fn invalidate(&self) {
        match self.token.write() {
            Ok(mut guard) => *guard = None,
            Err(poisoned) => *poisoned.into_inner() = None,
        }
    }
}
