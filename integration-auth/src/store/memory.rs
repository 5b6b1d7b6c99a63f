use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tokio::sync::RwLock;

use super::Store;
use crate::error::{store_error, Error, ErrorKind, StoreErrorKind};

/// Store entry with expiration.
#[derive(Clone, Debug)]
struct Entry {
    value: String,
    expires_at: DateTime<Utc>,
}

impl Entry {
    fn is_expired(&self) -> bool {
        Utc::now() >= self.expires_at
    }
}

/// In-memory store backed by a shared map.
///
/// Expired entries are hidden from reads and swept out on every write; there is no
/// background task.
#[derive(Clone, Default)]
pub struct MemoryStore {
    entries: Arc<RwLock<HashMap<String, Entry>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl Store for MemoryStore {
    async fn put(&self, key: &str, value: String, ttl: Duration) -> Result<(), Error> {
        let ttl = chrono::Duration::from_std(ttl).map_err(|e| Error {
            source: Some(Box::new(e)),
            error_kind: ErrorKind::Store(StoreErrorKind::Unavailable),
        })?;
        let expires_at = Utc::now()
            .checked_add_signed(ttl)
            .ok_or_else(|| store_error(StoreErrorKind::Unavailable, "TTL out of range"))?;

        let mut entries = self.entries.write().await;
        entries.retain(|_, entry| !entry.is_expired());
        entries.insert(key.to_string(), Entry { value, expires_at });
        Ok(())
    }

    async fn get(&self, key: &str) -> Result<Option<String>, Error> {
        let entries = self.entries.read().await;

        match entries.get(key) {
            Some(entry) if entry.is_expired() => {
                drop(entries);
                let mut entries = self.entries.write().await;
                // Re-check under the write lock; a fresh put may have landed in between.
                if entries.get(key).is_some_and(Entry::is_expired) {
                    entries.remove(key);
                }
                Ok(None)
            }
            Some(entry) => Ok(Some(entry.value.clone())),
            None => Ok(None),
        }
    }

    async fn delete(&self, key: &str) -> Result<(), Error> {
        let mut entries = self.entries.write().await;
        entries.remove(key);
        Ok(())
    }

    async fn take(&self, key: &str) -> Result<Option<String>, Error> {
        let mut entries = self.entries.write().await;
        Ok(entries.remove(key).filter(|entry| !entry.is_expired()).map(|entry| entry.value))
    }

    async fn delete_if_eq(&self, key: &str, expected: &str) -> Result<bool, Error> {
        let mut entries = self.entries.write().await;
        match entries.get(key) {
            Some(entry) if !entry.is_expired() && entry.value == expected => {
                entries.remove(key);
                Ok(true)
            }
            _ => Ok(false),
        }
    }
}
