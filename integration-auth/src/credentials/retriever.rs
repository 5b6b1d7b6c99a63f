use std::sync::Arc;
use std::time::Duration;

use log::*;

use super::Credential;
use crate::error::{credential_error, CredentialErrorKind, Error};
use crate::store::{is_valid_key_part, Store};

/// Default lifetime of a credential waiting to be picked up (10 minutes).
pub const DEFAULT_CREDENTIAL_TTL: Duration = Duration::from_secs(600);

/// Store key for the pending credential of a user within an organization.
pub fn credential_key(user_id: &str, org_id: &str) -> String {
    format!("credential:{}:{}", org_id, user_id)
}

/// Writes credentials into the store and hands each one out exactly once.
#[derive(Clone)]
pub struct Retriever {
    store: Arc<dyn Store>,
    ttl: Duration,
}

impl Retriever {
    pub fn new(store: Arc<dyn Store>) -> Self {
        Self::with_ttl(store, DEFAULT_CREDENTIAL_TTL)
    }

    pub fn with_ttl(store: Arc<dyn Store>, ttl: Duration) -> Self {
        Self { store, ttl }
    }

    /// Store a credential for `(user_id, org_id)`, replacing any unclaimed one.
    pub async fn store(
        &self,
        user_id: &str,
        org_id: &str,
        credential: &Credential,
    ) -> Result<(), Error> {
        if !is_valid_key_part(user_id) || !is_valid_key_part(org_id) {
            return Err(credential_error(
                CredentialErrorKind::Invalid,
                "Invalid user or organization id.",
            ));
        }

        let value = serde_json::to_string(credential)?;
        self.store
            .put(&credential_key(user_id, org_id), value, self.ttl)
            .await
    }

    /// Take the pending credential for `(user_id, org_id)`.
    ///
    /// The entry is removed atomically with the read, so of two concurrent callers only
    /// one receives the credential. An absent, expired or already consumed credential
    /// yields `Credential(NotFound)`.
    pub async fn consume(&self, user_id: &str, org_id: &str) -> Result<Credential, Error> {
        if !is_valid_key_part(user_id) || !is_valid_key_part(org_id) {
            warn!("Refusing credential pickup for invalid user {:?} or org {:?}", user_id, org_id);
            return Err(credential_error(
                CredentialErrorKind::NotFound,
                "No credentials found.",
            ));
        }

        let value = self
            .store
            .take(&credential_key(user_id, org_id))
            .await?
            .ok_or_else(|| {
                debug!("No credential pending for user {} in org {}", user_id, org_id);
                credential_error(CredentialErrorKind::NotFound, "No credentials found.")
            })?;

        Credential::parse(&value)
    }
}
