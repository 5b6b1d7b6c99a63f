//! HubSpot integration operations: authorize, callback, credential pickup and item loading.

use crate::error::{DomainErrorKind, Error, InternalErrorKind};
use crate::gateway::HubSpotClient;
use crate::integration_item::IntegrationItem;
use crate::item_fetcher::{self, LogReporter};
use integration_auth::credentials::{Credential, Retriever};
use integration_auth::http::ClientBuilder;
use integration_auth::oauth::{CallbackParams, CallbackResponse, Handshake, ProviderConfig};
use integration_auth::store::Store;
use log::*;
use secrecy::SecretString;
use service::config::Config;
use std::sync::Arc;

/// Build the HubSpot authorization URL for a user of an organization.
pub async fn authorize(
    config: &Config,
    store: Arc<dyn Store>,
    user_id: &str,
    org_id: &str,
) -> Result<String, Error> {
    let handshake = create_handshake(config, store)?;
    Ok(handshake.authorize(user_id, org_id).await?)
}

/// Process HubSpot's redirect back to us and park the resulting credential.
pub async fn oauth2_callback(
    config: &Config,
    store: Arc<dyn Store>,
    params: &CallbackParams,
) -> Result<CallbackResponse, Error> {
    let handshake = create_handshake(config, store)?;
    Ok(handshake.handle_callback(params).await?)
}

/// Take the credential parked for a user of an organization. Succeeds at most once.
pub async fn credentials(
    config: &Config,
    store: Arc<dyn Store>,
    user_id: &str,
    org_id: &str,
) -> Result<Credential, Error> {
    let retriever = Retriever::with_ttl(store, config.credential_ttl());
    Ok(retriever.consume(user_id, org_id).await?)
}

/// Load contacts, companies and deals with a credential.
///
/// Fails only when the credential carries no usable access token; failed queries
/// are logged and left out of the result.
pub async fn load_items(
    config: &Config,
    credential: &Credential,
) -> Result<Vec<IntegrationItem>, Error> {
    let access_token = credential.access_token()?;
    let client = HubSpotClient::new(
        &access_token,
        config.hubspot_api_base_url(),
        config.http_timeout(),
    )?;

    let items = item_fetcher::fetch_items(&client, &LogReporter).await;
    info!("Loaded {} HubSpot items", items.len());
    Ok(items)
}

/// Create a HubSpot handshake from config.
fn create_handshake(config: &Config, store: Arc<dyn Store>) -> Result<Handshake, Error> {
    let client_id = config.hubspot_client_id().ok_or_else(|| {
        warn!("HubSpot client ID is not configured");
        Error {
            source: None,
            error_kind: DomainErrorKind::Internal(InternalErrorKind::Config),
        }
    })?;

    let client_secret = config.hubspot_client_secret().ok_or_else(|| {
        warn!("HubSpot client secret is not configured");
        Error {
            source: None,
            error_kind: DomainErrorKind::Internal(InternalErrorKind::Config),
        }
    })?;

    let provider = ProviderConfig {
        client_id,
        client_secret: SecretString::new(client_secret),
        redirect_uri: config.hubspot_redirect_uri().to_string(),
        scopes: config.hubspot_scopes().to_vec(),
        authorization_url: config.hubspot_authorization_url().to_string(),
        token_url: config.hubspot_token_url().to_string(),
    };

    let http_client = ClientBuilder::new()
        .with_timeout(config.http_timeout())
        .build()?;

    Ok(Handshake::new(provider, store, http_client)
        .with_ttls(config.oauth_state_ttl(), config.credential_ttl()))
}
