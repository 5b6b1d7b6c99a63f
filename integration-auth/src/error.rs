//! Error types for the `integration-auth` crate.
//!
//! Follows the same pattern as domain::error with a root Error struct and error kind enums.

use std::error::Error as StdError;
use std::fmt;

/// Top-level error type for integration-auth crate.
/// Holds error kind and optional source for error chaining.
#[derive(Debug)]
pub struct Error {
    pub source: Option<Box<dyn StdError + Send + Sync>>,
    pub error_kind: ErrorKind,
}

/// Major categories of errors in integration-auth.
#[derive(Debug, PartialEq)]
pub enum ErrorKind {
    /// The vendor refused the authorization or the code exchange failed.
    OAuth(OAuthErrorKind),
    /// Forged, expired, replayed or malformed state.
    State(StateErrorKind),
    Credential(CredentialErrorKind),
    Store(StoreErrorKind),
    Http(HttpErrorKind),
}

/// Errors reported by, or while talking to, the vendor's OAuth endpoints.
#[derive(Debug, PartialEq)]
pub enum OAuthErrorKind {
    AuthorizationDenied,
    MissingCode,
    TokenExchangeFailed,
    InvalidResponse,
}

/// Errors from validating a round-tripped state parameter.
#[derive(Debug, PartialEq)]
pub enum StateErrorKind {
    Missing,
    Malformed,
    NotFound,
    Mismatch,
}

/// Errors from the credential handoff.
#[derive(Debug, PartialEq)]
pub enum CredentialErrorKind {
    NotFound,
    Invalid,
}

/// Errors from the ephemeral key-value store.
#[derive(Debug, PartialEq)]
pub enum StoreErrorKind {
    Serialization,
    Unavailable,
}

/// Errors from HTTP client operations.
#[derive(Debug, PartialEq)]
pub enum HttpErrorKind {
    BuilderFailed,
    RequestFailed,
    Network,
}

impl Error {
    /// Human readable detail attached to this error, if any.
    pub fn detail(&self) -> Option<String> {
        self.source.as_ref().map(|source| source.to_string())
    }

    pub fn is_state_mismatch(&self) -> bool {
        matches!(self.error_kind, ErrorKind::State(_))
    }

    pub fn is_no_credential(&self) -> bool {
        self.error_kind == ErrorKind::Credential(CredentialErrorKind::NotFound)
    }

    pub fn is_upstream_auth(&self) -> bool {
        matches!(self.error_kind, ErrorKind::OAuth(_))
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match &self.error_kind {
            ErrorKind::OAuth(kind) => write!(f, "OAuth error: {:?}", kind),
            ErrorKind::State(kind) => write!(f, "State error: {:?}", kind),
            ErrorKind::Credential(kind) => write!(f, "Credential error: {:?}", kind),
            ErrorKind::Store(kind) => write!(f, "Store error: {:?}", kind),
            ErrorKind::Http(kind) => write!(f, "HTTP error: {:?}", kind),
        }
    }
}

impl StdError for Error {
    fn source(&self) -> Option<&(dyn StdError + 'static)> {
        self.source
            .as_ref()
            .map(|e| e.as_ref() as &(dyn StdError + 'static))
    }
}

impl From<reqwest::Error> for Error {
    fn from(err: reqwest::Error) -> Self {
        let error_kind = if err.is_builder() {
            ErrorKind::Http(HttpErrorKind::BuilderFailed)
        } else if err.is_request() {
            ErrorKind::Http(HttpErrorKind::RequestFailed)
        } else {
            ErrorKind::Http(HttpErrorKind::Network)
        };

        Error {
            source: Some(Box::new(err)),
            error_kind,
        }
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error {
            source: Some(Box::new(err)),
            error_kind: ErrorKind::Store(StoreErrorKind::Serialization),
        }
    }
}

/// Helper function to create OAuth errors.
pub fn oauth_error(kind: OAuthErrorKind, message: &str) -> Error {
    Error {
        source: Some(message.to_string().into()),
        error_kind: ErrorKind::OAuth(kind),
    }
}

/// Helper function to create state errors.
pub fn state_error(kind: StateErrorKind, message: &str) -> Error {
    Error {
        source: Some(message.to_string().into()),
        error_kind: ErrorKind::State(kind),
    }
}

/// Helper function to create credential errors.
pub fn credential_error(kind: CredentialErrorKind, message: &str) -> Error {
    Error {
        source: Some(message.to_string().into()),
        error_kind: ErrorKind::Credential(kind),
    }
}

/// Helper function to create store errors.
pub fn store_error(kind: StoreErrorKind, message: &str) -> Error {
    Error {
        source: Some(message.to_string().into()),
        error_kind: ErrorKind::Store(kind),
    }
}
