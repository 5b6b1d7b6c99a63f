//! Business operations for CRM integrations.
//!
//! Wires service configuration into the `integration-auth` handshake and turns vendor
//! records into vendor-agnostic [`IntegrationItem`]s.

pub use integration_auth::credentials::Credential;
pub use integration_auth::oauth::{CallbackParams, CallbackResponse};
pub use integration_auth::store::{MemoryStore, Store};

pub mod error;
pub mod hubspot;
pub mod integration_item;
pub mod item_fetcher;

pub mod gateway;

pub use integration_item::{IntegrationItem, ItemType};
