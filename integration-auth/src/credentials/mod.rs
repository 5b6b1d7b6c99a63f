//! Read-once handoff of vendor credentials.
//!
//! Credentials are not persisted long term. The callback writes the raw token response
//! into the ephemeral store, and the first caller to ask for it takes it out.

mod retriever;

use std::fmt;

use secrecy::SecretString;
use serde::{Deserialize, Serialize};

use crate::error::{credential_error, CredentialErrorKind, Error, ErrorKind};

pub use retriever::{credential_key, Retriever, DEFAULT_CREDENTIAL_TTL};

/// Token bundle returned by the vendor token endpoint, kept verbatim.
#[derive(Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Credential(serde_json::Value);

impl Credential {
    pub fn from_value(value: serde_json::Value) -> Self {
        Self(value)
    }

    /// Parse a credential from its JSON text.
    pub fn parse(text: &str) -> Result<Self, Error> {
        serde_json::from_str(text).map_err(|e| Error {
            source: Some(Box::new(e)),
            error_kind: ErrorKind::Credential(CredentialErrorKind::Invalid),
        })
    }

    pub fn as_value(&self) -> &serde_json::Value {
        &self.0
    }

    pub fn into_value(self) -> serde_json::Value {
        self.0
    }

    /// The bearer token to present to the vendor API.
    pub fn access_token(&self) -> Result<SecretString, Error> {
        self.0
            .get("access_token")
            .and_then(serde_json::Value::as_str)
            .filter(|token| !token.is_empty())
            .map(|token| SecretString::new(token.to_string()))
            .ok_or_else(|| {
                credential_error(CredentialErrorKind::Invalid, "Credential has no access_token")
            })
    }
}

impl fmt::Debug for Credential {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str("Credential([REDACTED])")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use secrecy::ExposeSecret;
    use serde_json::json;

    #[test]
    fn test_access_token() {
        let credential = Credential::from_value(json!({"access_token": "abc", "expires_in": 1800}));
        assert_eq!(credential.access_token().unwrap().expose_secret(), "abc");
    }

    #[test]
    fn test_missing_access_token_is_invalid() {
        let credential = Credential::from_value(json!({"refresh_token": "r"}));
        let err = credential.access_token().unwrap_err();
        assert_eq!(err.error_kind, ErrorKind::Credential(CredentialErrorKind::Invalid));
    }

    #[test]
    fn test_parse_rejects_non_json() {
        let err = Credential::parse("not json").unwrap_err();
        assert_eq!(err.error_kind, ErrorKind::Credential(CredentialErrorKind::Invalid));
    }

    #[test]
    fn test_debug_redacts_tokens() {
        let credential = Credential::from_value(json!({"access_token": "secret-value"}));
        assert!(!format!("{:?}", credential).contains("secret-value"));
    }
}
