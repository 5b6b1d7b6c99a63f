//! HubSpot CRM API client.
//!
//! This module provides an HTTP client for listing CRM objects (contacts,
//! companies, deals) with an OAuth access token.

use crate::error::{DomainErrorKind, Error, ExternalErrorKind};
use crate::integration_item::ItemType;
use async_trait::async_trait;
use integration_auth::http::ClientBuilder;
use log::*;
use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;
use std::time::Duration;

/// A CRM object as returned by the objects API.
#[derive(Debug, Clone, Deserialize)]
pub struct CrmObject {
    #[serde(default)]
    id: serde_json::Value,
    #[serde(default)]
    properties: serde_json::Map<String, serde_json::Value>,
    #[serde(rename = "createdAt", default)]
    pub created_at: Option<String>,
    #[serde(rename = "updatedAt", default)]
    pub updated_at: Option<String>,
}

impl CrmObject {
    /// Object id rendered as a string.
    pub fn id(&self) -> String {
        match &self.id {
            serde_json::Value::String(id) => id.clone(),
            serde_json::Value::Null => String::new(),
            other => other.to_string(),
        }
    }

    /// String property by name; missing, null or non-string values read as "".
    pub fn property(&self, name: &str) -> &str {
        self.properties
            .get(name)
            .and_then(serde_json::Value::as_str)
            .unwrap_or_default()
    }
}

/// Envelope of a list response.
#[derive(Debug, Deserialize)]
struct ObjectsResponse {
    #[serde(default)]
    results: Vec<CrmObject>,
}

/// Read access to CRM objects of a single account.
#[async_trait]
pub trait CrmGateway: Send + Sync {
    /// List the objects of the given kind.
    async fn list_objects(&self, item_type: ItemType) -> Result<Vec<CrmObject>, Error>;
}

/// HubSpot API client bound to one access token.
pub struct HubSpotClient {
    client: reqwest::Client,
    base_url: String,
}

impl HubSpotClient {
    /// Create a new HubSpot client with the given access token and base URL
    pub fn new(
        access_token: &SecretString,
        base_url: &str,
        timeout: Duration,
    ) -> Result<Self, Error> {
        let client = ClientBuilder::new()
            .with_bearer_token(access_token.expose_secret())
            .with_timeout(timeout)
            .build()?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }
}

#[async_trait]
impl CrmGateway for HubSpotClient {
    async fn list_objects(&self, item_type: ItemType) -> Result<Vec<CrmObject>, Error> {
        let url = format!("{}/crm/v3/objects/{}", self.base_url, item_type.object_path());

        debug!("Fetching HubSpot {}", item_type);

        let response = self.client.get(&url).send().await.map_err(|e| {
            debug!("Failed to fetch HubSpot {}: {:?}", item_type, e);
            Error {
                source: Some(Box::new(e)),
                error_kind: DomainErrorKind::External(ExternalErrorKind::Network),
            }
        })?;

        if response.status() == reqwest::StatusCode::OK {
            let objects: ObjectsResponse = response.json().await.map_err(|e| {
                debug!("Failed to parse HubSpot {} response: {:?}", item_type, e);
                Error {
                    source: Some(Box::new(e)),
                    error_kind: DomainErrorKind::External(ExternalErrorKind::Other(
                        "Invalid response from HubSpot".to_string(),
                    )),
                }
            })?;
            Ok(objects.results)
        } else {
            let status = response.status();
            let error_text = response.text().await.unwrap_or_default();
            debug!("HubSpot {} error ({}): {}", item_type, status, error_text);
            Err(Error {
                source: None,
                error_kind: DomainErrorKind::External(ExternalErrorKind::Other(format!(
                    "HubSpot returned {} for {}",
                    status, item_type
                ))),
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockito::Server;

    fn client(base_url: &str) -> HubSpotClient {
        HubSpotClient::new(
            &SecretString::new("token-1".to_string()),
            base_url,
            Duration::from_secs(5),
        )
        .unwrap()
    }

    #[tokio::test]
    async fn test_list_objects_sends_bearer_token() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("GET", "/crm/v3/objects/companies")
            .match_header("authorization", "Bearer token-1")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"{"results":[{"id":"1","properties":{"name":"Acme"}}]}"#)
            .create_async()
            .await;

        let objects = client(&server.url())
            .list_objects(ItemType::Company)
            .await
            .unwrap();

        mock.assert_async().await;
        assert_eq!(objects.len(), 1);
        assert_eq!(objects[0].id(), "1");
        assert_eq!(objects[0].property("name"), "Acme");
    }

    #[tokio::test]
    async fn test_list_objects_missing_results_is_empty() {
        let mut server = Server::new_async().await;
        let _mock = server
            .mock("GET", "/crm/v3/objects/deals")
            .with_status(200)
            .with_body("{}")
            .create_async()
            .await;

        let objects = client(&server.url()).list_objects(ItemType::Deal).await.unwrap();
        assert!(objects.is_empty());
    }

    #[tokio::test]
    async fn test_list_objects_non_200_is_error() {
        let mut server = Server::new_async().await;
        let _mock = server
            .mock("GET", "/crm/v3/objects/contacts")
            .with_status(401)
            .with_body(r#"{"status":"error","category":"EXPIRED_AUTHENTICATION"}"#)
            .create_async()
            .await;

        let err = client(&server.url())
            .list_objects(ItemType::Contact)
            .await
            .unwrap_err();
        assert!(matches!(
            err.error_kind,
            DomainErrorKind::External(ExternalErrorKind::Other(_))
        ));
    }

    #[test]
    fn test_base_url_trailing_slash() {
        let client = client("https://api.hubapi.com/");
        assert_eq!(client.base_url, "https://api.hubapi.com");
    }
}
