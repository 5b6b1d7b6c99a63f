//! Ephemeral key-value store used to hand state and credentials between requests.

mod memory;

use std::time::Duration;

use async_trait::async_trait;

use crate::error::Error;

pub use memory::MemoryStore;

/// Separator between the segments of a composite key.
pub const KEY_SEPARATOR: char = ':';

/// Whether `part` can be embedded in a composite key without colliding with another key.
pub fn is_valid_key_part(part: &str) -> bool {
    !part.is_empty() && !part.contains(KEY_SEPARATOR)
}

/// Trait for a keyed store with per-entry expiry.
///
/// Keys are plain strings and values are opaque text (this crate always writes JSON).
/// Expired entries must be indistinguishable from absent ones.
///
/// Implementations should:
/// - Treat each key atomically
/// - Drop or hide entries once their TTL elapses
#[async_trait]
pub trait Store: Send + Sync {
    /// Store a value under `key`, replacing any previous value, expiring after `ttl`.
    async fn put(&self, key: &str, value: String, ttl: Duration) -> Result<(), Error>;

    /// Retrieve the value under `key`.
    ///
    /// # Returns
    ///
    /// `Some(value)` if present and not expired, `None` otherwise.
    async fn get(&self, key: &str) -> Result<Option<String>, Error>;

    /// Delete the value under `key`. Deleting an absent key is not an error.
    async fn delete(&self, key: &str) -> Result<(), Error>;

    /// Remove and return the value under `key`.
    ///
    /// The default implementation is a `get` followed by a `delete`, which leaves a window
    /// where two callers can both observe the value. Backends that can do better (a single
    /// lock, Redis `GETDEL`) should override it.
    async fn take(&self, key: &str) -> Result<Option<String>, Error> {
        let value = self.get(key).await?;
        if value.is_some() {
            self.delete(key).await?;
        }
        Ok(value)
    }

    /// Delete the value under `key` only if it still equals `expected`.
    ///
    /// # Returns
    ///
    /// `true` if the entry was removed. The default implementation has the same window
    /// as the default [`Store::take`].
    async fn delete_if_eq(&self, key: &str, expected: &str) -> Result<bool, Error> {
        match self.get(key).await? {
            Some(value) if value == expected => {
                self.delete(key).await?;
                Ok(true)
            }
            _ => Ok(false),
        }
    }
}
