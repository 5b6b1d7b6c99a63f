//! Static OAuth client configuration for a vendor.

use secrecy::SecretString;

/// Client registration and endpoints for the vendor's OAuth server.
///
/// Built once at startup from configuration and injected into the [`Handshake`].
///
/// [`Handshake`]: super::Handshake
#[derive(Debug, Clone)]
pub struct ProviderConfig {
    pub client_id: String,
    pub client_secret: SecretString,
    pub redirect_uri: String,
    pub scopes: Vec<String>,
    /// Vendor endpoint the browser is sent to.
    pub authorization_url: String,
    /// Vendor endpoint the authorization code is exchanged at.
    pub token_url: String,
}

impl ProviderConfig {
    /// Generate the authorization URL for an encoded state carrier.
    ///
    /// Everything except `state` is fixed by configuration.
    pub fn authorization_url(&self, state: &str) -> String {
        format!(
            "{}?\
            client_id={}&\
            redirect_uri={}&\
            scope={}&\
            state={}",
            self.authorization_url,
            urlencoding::encode(&self.client_id),
            urlencoding::encode(&self.redirect_uri),
            urlencoding::encode(&self.scopes.join(" ")),
            urlencoding::encode(state)
        )
    }
}
