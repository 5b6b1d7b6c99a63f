//! CSRF state management for OAuth flows.
//!
//! The encoded state that travels through the vendor redirect is only a carrier. Trust
//! comes from the copy kept in the [`Store`]: a callback is accepted only when the token
//! it carries matches the token stored for the embedded (organization, user) pair.

use std::sync::Arc;
use std::time::Duration;

use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine};
use log::*;
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::error::{state_error, Error, ErrorKind, StateErrorKind};
use crate::store::{is_valid_key_part, Store};

/// Default lifetime of a pending authorization (10 minutes).
pub const DEFAULT_STATE_TTL: Duration = Duration::from_secs(600);

/// Store key for the pending state of a user within an organization.
pub fn state_key(user_id: &str, org_id: &str) -> String {
    format!("state:{}:{}", org_id, user_id)
}

/// State data stored during OAuth flow.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StateRecord {
    /// Random anti-forgery token.
    pub state: String,
    pub user_id: String,
    pub org_id: String,
}

impl StateRecord {
    /// Create a record with a freshly generated token.
    pub fn new(user_id: &str, org_id: &str) -> Self {
        Self {
            state: generate_token(),
            user_id: user_id.to_string(),
            org_id: org_id.to_string(),
        }
    }

    /// Key this record is stored under.
    pub fn store_key(&self) -> String {
        state_key(&self.user_id, &self.org_id)
    }

    /// Encode the record as a URL-safe carrier for the `state` query parameter.
    pub fn encode(&self) -> Result<String, Error> {
        let json = serde_json::to_vec(self)?;
        Ok(URL_SAFE_NO_PAD.encode(json))
    }

    /// Decode a carrier produced by [`StateRecord::encode`].
    ///
    /// Trailing padding is tolerated so that carriers minted by padded encoders still decode.
    pub fn decode(encoded: &str) -> Result<Self, Error> {
        let bytes = URL_SAFE_NO_PAD
            .decode(encoded.trim_end_matches('='))
            .map_err(|e| Error {
                source: Some(Box::new(e)),
                error_kind: ErrorKind::State(StateErrorKind::Malformed),
            })?;

        serde_json::from_slice(&bytes).map_err(|e| Error {
            source: Some(Box::new(e)),
            error_kind: ErrorKind::State(StateErrorKind::Malformed),
        })
    }
}

/// Manager for OAuth state parameters with expiration.
///
/// Generates and validates CSRF state tokens to prevent cross-site request forgery attacks.
#[derive(Clone)]
pub struct StateManager {
    store: Arc<dyn Store>,
    ttl: Duration,
}

impl StateManager {
    /// Create a new state manager with default TTL of 10 minutes.
    pub fn new(store: Arc<dyn Store>) -> Self {
        Self::with_ttl(store, DEFAULT_STATE_TTL)
    }

    /// Create a new state manager with custom TTL.
    pub fn with_ttl(store: Arc<dyn Store>, ttl: Duration) -> Self {
        Self { store, ttl }
    }

    /// Generate a new state token for `(user_id, org_id)` and store it.
    ///
    /// A pending authorization for the same pair is replaced.
    ///
    /// # Returns
    ///
    /// The encoded carrier to send through the vendor redirect, and the stored record.
    pub async fn begin(&self, user_id: &str, org_id: &str) -> Result<(String, StateRecord), Error> {
        if !is_valid_key_part(user_id) || !is_valid_key_part(org_id) {
            warn!("Refusing OAuth state for invalid user {:?} or org {:?}", user_id, org_id);
            return Err(state_error(
                StateErrorKind::Malformed,
                "Invalid user or organization id.",
            ));
        }

        let record = StateRecord::new(user_id, org_id);
        let encoded = record.encode()?;

        self.store
            .put(&record.store_key(), serde_json::to_string(&record)?, self.ttl)
            .await?;

        debug!("Stored OAuth state for user {} in org {}", user_id, org_id);
        Ok((encoded, record))
    }

    /// Validate a state carrier against the stored copy.
    ///
    /// Does not consume the stored state; call [`StateManager::consume`] once the
    /// callback has been accepted.
    ///
    /// # Returns
    ///
    /// The decoded record if a matching state is pending, a `State` error otherwise.
    pub async fn validate(&self, encoded_state: &str) -> Result<StateRecord, Error> {
        let record = StateRecord::decode(encoded_state)?;
        if !is_valid_key_part(&record.user_id) || !is_valid_key_part(&record.org_id) {
            warn!("OAuth state carries an invalid user or org id");
            return Err(state_error(StateErrorKind::Malformed, "State does not match."));
        }

        let saved = self.store.get(&record.store_key()).await?.ok_or_else(|| {
            warn!(
                "No pending OAuth state for user {} in org {}",
                record.user_id, record.org_id
            );
            state_error(StateErrorKind::NotFound, "State does not match.")
        })?;

        let saved: StateRecord = serde_json::from_str(&saved)?;
        if saved.state != record.state {
            warn!(
                "OAuth state mismatch for user {} in org {}",
                record.user_id, record.org_id
            );
            return Err(state_error(StateErrorKind::Mismatch, "State does not match."));
        }

        Ok(record)
    }

    /// Delete the stored state so it cannot be used again.
    ///
    /// Only `record`'s own token is removed. A newer authorization started for the same
    /// pair since validation is left pending.
    pub async fn consume(&self, record: &StateRecord) -> Result<(), Error> {
        let removed = self
            .store
            .delete_if_eq(&record.store_key(), &serde_json::to_string(record)?)
            .await?;
        if !removed {
            debug!(
                "OAuth state for user {} in org {} was already replaced or consumed",
                record.user_id, record.org_id
            );
        }
        Ok(())
    }
}

/// Generate a cryptographically random state token (256 bits).
fn generate_token() -> String {
    let random_bytes: [u8; 32] = rand::thread_rng().gen();
    URL_SAFE_NO_PAD.encode(random_bytes)
}
