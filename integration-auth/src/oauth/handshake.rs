//! Authorization redirect and callback processing.

use std::sync::Arc;
use std::time::Duration;

use log::*;
use secrecy::ExposeSecret;
use serde::{Deserialize, Serialize};

use super::{ProviderConfig, StateManager};
use crate::credentials::{Credential, Retriever};
use crate::error::{oauth_error, state_error, Error, ErrorKind, OAuthErrorKind, StateErrorKind};
use crate::store::Store;

/// Page returned to the popup once the callback has been processed. The opener watches
/// for the window to close.
pub const CLOSE_WINDOW_HTML: &str = r#"<html>
    <script>
        window.close();
    </script>
</html>"#;

/// Query parameters the vendor appends to the redirect URI.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CallbackParams {
    pub code: Option<String>,
    pub state: Option<String>,
    pub error: Option<String>,
    pub error_description: Option<String>,
}

/// Outcome of a successful callback.
#[derive(Debug, Clone, PartialEq)]
pub struct CallbackResponse {
    pub user_id: String,
    pub org_id: String,
}

impl CallbackResponse {
    /// Body for the browser: closes the window that started the flow.
    pub fn html(&self) -> &'static str {
        CLOSE_WINDOW_HTML
    }
}

/// Form body for the token endpoint.
#[derive(Debug, Serialize)]
struct TokenExchangeRequest<'a> {
    grant_type: &'a str,
    code: &'a str,
    redirect_uri: &'a str,
    client_id: &'a str,
    client_secret: &'a str,
}

/// Orchestrates the authorize → redirect → callback → token exchange sequence.
pub struct Handshake {
    provider: ProviderConfig,
    store: Arc<dyn Store>,
    states: StateManager,
    credentials: Retriever,
    http_client: reqwest::Client,
}

impl Handshake {
    /// Create a handshake with the default state and credential lifetimes.
    ///
    /// # Arguments
    ///
    /// * `provider` - Vendor client registration and endpoints
    /// * `store` - Ephemeral store shared by state and credential handoff
    /// * `http_client` - Client used for the token exchange
    pub fn new(
        provider: ProviderConfig,
        store: Arc<dyn Store>,
        http_client: reqwest::Client,
    ) -> Self {
        Self {
            provider,
            states: StateManager::new(store.clone()),
            credentials: Retriever::new(store.clone()),
            store,
            http_client,
        }
    }

    /// Override the lifetimes of pending state and unclaimed credentials.
    pub fn with_ttls(mut self, state_ttl: Duration, credential_ttl: Duration) -> Self {
        self.states = StateManager::with_ttl(self.store.clone(), state_ttl);
        self.credentials = Retriever::with_ttl(self.store.clone(), credential_ttl);
        self
    }

    pub fn credentials(&self) -> &Retriever {
        &self.credentials
    }

    /// Start an authorization for `(user_id, org_id)`.
    ///
    /// # Returns
    ///
    /// The vendor URL to send the user's browser to.
    pub async fn authorize(&self, user_id: &str, org_id: &str) -> Result<String, Error> {
        let (encoded_state, _) = self.states.begin(user_id, org_id).await?;

        info!("Starting OAuth authorization for user {} in org {}", user_id, org_id);
        Ok(self.provider.authorization_url(&encoded_state))
    }

    /// Process the vendor's redirect back to us.
    ///
    /// Nothing is written to the store unless the state validates. On success the pending
    /// state is gone and the token response is waiting to be consumed through
    /// [`Handshake::credentials`].
    pub async fn handle_callback(
        &self,
        params: &CallbackParams,
    ) -> Result<CallbackResponse, Error> {
        if let Some(error) = params.error.as_deref() {
            let detail = params
                .error_description
                .as_deref()
                .filter(|description| !description.is_empty())
                .unwrap_or(error);
            warn!("OAuth authorization refused by vendor: {} ({})", error, detail);
            return Err(oauth_error(OAuthErrorKind::AuthorizationDenied, detail));
        }

        let encoded_state = params
            .state
            .as_deref()
            .filter(|state| !state.is_empty())
            .ok_or_else(|| state_error(StateErrorKind::Missing, "Missing state parameter."))?;
        let code = params
            .code
            .as_deref()
            .filter(|code| !code.is_empty())
            .ok_or_else(|| oauth_error(OAuthErrorKind::MissingCode, "Missing code parameter."))?;

        let record = self.states.validate(encoded_state).await?;

        // The state is spent whether or not the exchange succeeds.
        let (exchanged, consumed) =
            tokio::join!(self.exchange_code(code), self.states.consume(&record));
        let credential = exchanged.inspect_err(|e| {
            warn!(
                "Failed to exchange OAuth code for user {} in org {}: {:?}",
                record.user_id, record.org_id, e
            )
        })?;
        consumed?;

        self.credentials
            .store(&record.user_id, &record.org_id, &credential)
            .await?;

        info!(
            "Stored OAuth credentials for user {} in org {}",
            record.user_id, record.org_id
        );
        Ok(CallbackResponse {
            user_id: record.user_id,
            org_id: record.org_id,
        })
    }

    /// Exchange an authorization code at the vendor token endpoint.
    async fn exchange_code(&self, code: &str) -> Result<Credential, Error> {
        let request = TokenExchangeRequest {
            grant_type: "authorization_code",
            code,
            redirect_uri: &self.provider.redirect_uri,
            client_id: &self.provider.client_id,
            client_secret: self.provider.client_secret.expose_secret(),
        };

        debug!("Exchanging OAuth code for tokens");

        let response = self
            .http_client
            .post(&self.provider.token_url)
            .form(&request)
            .send()
            .await
            .map_err(|e| Error {
                source: Some(Box::new(e)),
                error_kind: ErrorKind::OAuth(OAuthErrorKind::TokenExchangeFailed),
            })?;

        let status = response.status();
        let body = response.text().await.map_err(|e| Error {
            source: Some(Box::new(e)),
            error_kind: ErrorKind::OAuth(OAuthErrorKind::TokenExchangeFailed),
        })?;

        if !status.is_success() {
            let message = if body.is_empty() {
                format!("Token endpoint returned {}", status)
            } else {
                body
            };
            return Err(oauth_error(OAuthErrorKind::TokenExchangeFailed, &message));
        }

        let value: serde_json::Value = serde_json::from_str(&body).map_err(|e| Error {
            source: Some(Box::new(e)),
            error_kind: ErrorKind::OAuth(OAuthErrorKind::InvalidResponse),
        })?;
        if !value.is_object() {
            return Err(oauth_error(
                OAuthErrorKind::InvalidResponse,
                "Token response is not a JSON object",
            ));
        }

        Ok(Credential::from_value(value))
    }
}
