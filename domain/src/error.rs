//! Error types for the `domain` layer.
use integration_auth::error::{
    CredentialErrorKind, Error as IntegrationAuthError, ErrorKind as IntegrationAuthErrorKind,
};
use std::error::Error as StdError;
use std::fmt;

/// Top-level domain error type.
/// Errors in the Domain layer are modeled as a tree structure
/// with `domain::error::Error` as the root type holding a tree of `error_kind`
/// enums that represent the kinds of errors that can occur in the domain layer or
/// in lower layers. The `source` field holds the original error. `web` depends on
/// `domain` only, and uses the kinds to pick HTTP status codes.
#[derive(Debug)]
pub struct Error {
    pub source: Option<Box<dyn StdError + Send + Sync>>,
    pub error_kind: DomainErrorKind,
}

/// Enum representing the major categories of errors that can occur in the `domain` layer.
#[derive(Debug, PartialEq)]
pub enum DomainErrorKind {
    Internal(InternalErrorKind),
    External(ExternalErrorKind),
    Integration(IntegrationErrorKind),
}

/// Enum representing the various kinds of internal errors that can occur in the `domain` layer.
#[derive(Debug, PartialEq)]
pub enum InternalErrorKind {
    Config,
    Store,
    Other(String),
}

/// Enum representing the various kinds of external errors that can occur in the `domain` layer.
#[derive(Debug, PartialEq)]
pub enum ExternalErrorKind {
    Network,
    Other(String),
}

/// Failures of the integration handshake that are the caller's (or the vendor's) doing.
#[derive(Debug, PartialEq)]
pub enum IntegrationErrorKind {
    /// The vendor refused authorization or the code exchange failed. Holds the detail.
    UpstreamAuth(String),
    StateMismatch,
    NoCredential,
    InvalidCredential,
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "Domain Error: {self:?}")
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
        // Errors that result from issues building the reqwest::Client instance. This
        // type of error will occur prior to any network calls being made.
        if err.is_builder() {
            Error {
                source: Some(Box::new(err)),
                error_kind: DomainErrorKind::Internal(InternalErrorKind::Other(
                    "Failed to build reqwest client".to_string(),
                )),
            }
        // Errors that result from issues with the network call itself.
        } else {
            Error {
                source: Some(Box::new(err)),
                error_kind: DomainErrorKind::External(ExternalErrorKind::Network),
            }
        }
    }
}

// This is where we translate errors from `integration-auth` to the `domain` layer.
impl From<IntegrationAuthError> for Error {
    fn from(err: IntegrationAuthError) -> Self {
        let error_kind = match &err.error_kind {
            IntegrationAuthErrorKind::OAuth(_) => {
                let detail = err.detail().unwrap_or_else(|| err.to_string());
                DomainErrorKind::Integration(IntegrationErrorKind::UpstreamAuth(detail))
            }
            IntegrationAuthErrorKind::State(_) => {
                DomainErrorKind::Integration(IntegrationErrorKind::StateMismatch)
            }
            IntegrationAuthErrorKind::Credential(CredentialErrorKind::NotFound) => {
                DomainErrorKind::Integration(IntegrationErrorKind::NoCredential)
            }
            IntegrationAuthErrorKind::Credential(CredentialErrorKind::Invalid) => {
                DomainErrorKind::Integration(IntegrationErrorKind::InvalidCredential)
            }
            IntegrationAuthErrorKind::Store(_) => DomainErrorKind::Internal(InternalErrorKind::Store),
            IntegrationAuthErrorKind::Http(_) => DomainErrorKind::External(ExternalErrorKind::Network),
        };
        Error {
            source: Some(Box::new(err)),
            error_kind,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use integration_auth::error::{credential_error, oauth_error, state_error, OAuthErrorKind, StateErrorKind};

    #[test]
    fn test_upstream_auth_keeps_detail() {
        let err: Error = oauth_error(OAuthErrorKind::AuthorizationDenied, "User denied").into();
        assert_eq!(
            err.error_kind,
            DomainErrorKind::Integration(IntegrationErrorKind::UpstreamAuth(
                "User denied".to_string()
            ))
        );
    }

    #[test]
    fn test_state_and_credential_translation() {
        let err: Error = state_error(StateErrorKind::Mismatch, "State does not match.").into();
        assert_eq!(
            err.error_kind,
            DomainErrorKind::Integration(IntegrationErrorKind::StateMismatch)
        );

        let err: Error = credential_error(CredentialErrorKind::NotFound, "No credentials found.").into();
        assert_eq!(
            err.error_kind,
            DomainErrorKind::Integration(IntegrationErrorKind::NoCredential)
        );
    }
}
