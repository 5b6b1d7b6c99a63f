//! OAuth 2.0 authorization code flow.
//!
//! Provides the state handling and callback processing for a vendor integration.

mod handshake;
mod provider;
mod state;

pub use handshake::{CallbackParams, CallbackResponse, Handshake, CLOSE_WINDOW_HTML};
pub use provider::ProviderConfig;
pub use state::{state_key, StateManager, StateRecord, DEFAULT_STATE_TTL};
