//! # integration-auth
//!
//! OAuth 2.0 handshake plumbing for third-party CRM integrations:
//! - Ephemeral key-value store seam with an in-memory backend
//! - Anti-forgery state tokens bound to a (user, organization) pair
//! - Authorization URL generation and callback handling (code exchange)
//! - Read-once credential handoff
//! - HTTP client building
//!
//! ## Architecture
//!
//! This crate owns the correctness-sensitive part of an integration. The `domain`
//! crate wires configuration into it and builds vendor API clients on top of the
//! credentials it hands out.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use integration_auth::{
//!     oauth::{CallbackParams, Handshake, ProviderConfig},
//!     store::MemoryStore,
//! };
//! ```

pub mod credentials;
pub mod error;
pub mod http;
pub mod oauth;
pub mod store;

// Re-export commonly used types
pub use error::{Error, ErrorKind};
