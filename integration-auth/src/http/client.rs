//! HTTP client builder for vendor endpoints.

use std::time::Duration;

use crate::error::{CredentialErrorKind, Error, ErrorKind};

/// HTTP client configuration.
#[derive(Debug, Clone)]
pub struct HttpClientConfig {
    /// Request timeout.
    pub timeout: Duration,
    /// User agent string.
    pub user_agent: String,
}

impl Default for HttpClientConfig {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(30),
            user_agent: format!("integration-auth/{}", env!("CARGO_PKG_VERSION")),
        }
    }
}

/// Builder for the HTTP clients used against vendor APIs.
///
/// Requests are never retried; a failed call is terminal for the attempt it belongs to.
pub struct ClientBuilder {
    config: HttpClientConfig,
    bearer_token: Option<String>,
}

impl ClientBuilder {
    /// Create a new client builder with default configuration.
    pub fn new() -> Self {
        Self {
            config: HttpClientConfig::default(),
            bearer_token: None,
        }
    }

    /// Send `Authorization: Bearer <token>` on every request made by the built client.
    pub fn with_bearer_token(mut self, token: &str) -> Self {
        self.bearer_token = Some(token.to_string());
        self
    }

    /// Set the request timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.config.timeout = timeout;
        self
    }

    /// Build the configured HTTP client.
    pub fn build(self) -> Result<reqwest::Client, Error> {
        let mut headers = reqwest::header::HeaderMap::new();

        if let Some(token) = self.bearer_token {
            let mut header_value =
                reqwest::header::HeaderValue::from_str(&format!("Bearer {}", token)).map_err(
                    |e| Error {
                        source: Some(Box::new(e)),
                        error_kind: ErrorKind::Credential(CredentialErrorKind::Invalid),
                    },
                )?;
            header_value.set_sensitive(true);
            headers.insert(reqwest::header::AUTHORIZATION, header_value);
        }

        let client = reqwest::Client::builder()
            .use_rustls_tls()
            .timeout(self.config.timeout)
            .user_agent(self.config.user_agent)
            .default_headers(headers)
            .build()?;

        Ok(client)
    }
}

impl Default for ClientBuilder {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder_default() {
        let builder = ClientBuilder::new();
        assert_eq!(builder.config.timeout, Duration::from_secs(30));
        assert!(builder.bearer_token.is_none());
    }

    #[test]
    fn test_builder_with_timeout() {
        let builder = ClientBuilder::new().with_timeout(Duration::from_secs(60));
        assert_eq!(builder.config.timeout, Duration::from_secs(60));
    }

    #[tokio::test]
    async fn test_build_client() {
        let result = ClientBuilder::new().with_bearer_token("token").build();
        assert!(result.is_ok());
    }

    #[test]
    fn test_build_rejects_unprintable_token() {
        let result = ClientBuilder::new().with_bearer_token("bad\ntoken").build();
        assert!(result.is_err());
    }

    #[tokio::test]
    async fn test_bearer_header_is_sent() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("GET", "/ping")
            .match_header("authorization", "Bearer abc123")
            .with_status(200)
            .create_async()
            .await;

        let client = ClientBuilder::new().with_bearer_token("abc123").build().unwrap();
        let response = client
            .get(format!("{}/ping", server.url()))
            .send()
            .await
            .unwrap();

        assert_eq!(response.status(), 200);
        mock.assert_async().await;
    }
}
