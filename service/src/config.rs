use clap::builder::TypedValueParser as _;
use clap::Parser;
use dotenvy::dotenv;
use log::LevelFilter;
use std::time::Duration;

/// Default HubSpot endpoint the user's browser is sent to for consent.
pub const DEFAULT_HUBSPOT_AUTHORIZATION_URL: &str = "https://app.hubspot.com/oauth/authorize";
/// Default HubSpot endpoint authorization codes are exchanged at.
pub const DEFAULT_HUBSPOT_TOKEN_URL: &str = "https://api.hubapi.com/oauth/v1/token";
/// Default HubSpot REST API base URL.
/// Override in tests to point at a mock server.
pub const DEFAULT_HUBSPOT_API_BASE_URL: &str = "https://api.hubapi.com";

#[derive(Clone, Debug, Parser)]
#[command(author, version, about, long_about = None)]
pub struct Config {
    /// A list of full CORS origin URLs that allowed to receive server responses.
    #[arg(
        long,
        env,
        value_delimiter = ',',
        use_value_delimiter = true,
        default_value = "http://localhost:3000,https://localhost:3000"
    )]
    pub allowed_origins: Vec<String>,

    /// The OAuth client ID registered with HubSpot.
    #[arg(long, env)]
    hubspot_client_id: Option<String>,

    /// The OAuth client secret registered with HubSpot.
    #[arg(long, env, hide_env_values = true)]
    hubspot_client_secret: Option<String>,

    /// The redirect URI HubSpot sends the browser back to after consent.
    #[arg(
        long,
        env,
        default_value = "http://localhost:8000/integrations/hubspot/oauth2callback"
    )]
    hubspot_redirect_uri: String,

    /// OAuth scopes requested from HubSpot.
    #[arg(
        long,
        env,
        value_delimiter = ',',
        use_value_delimiter = true,
        default_value = "crm.objects.contacts.read,crm.objects.companies.read,crm.objects.deals.read"
    )]
    hubspot_scopes: Vec<String>,

    /// The HubSpot authorization (consent) endpoint.
    #[arg(long, env, default_value = DEFAULT_HUBSPOT_AUTHORIZATION_URL)]
    hubspot_authorization_url: String,

    /// The HubSpot token endpoint.
    #[arg(long, env, default_value = DEFAULT_HUBSPOT_TOKEN_URL)]
    hubspot_token_url: String,

    /// The base URL of the HubSpot REST API.
    #[arg(long, env, default_value = DEFAULT_HUBSPOT_API_BASE_URL)]
    hubspot_api_base_url: String,

    /// Seconds a pending OAuth state stays valid
    #[arg(long, env, default_value_t = 600)]
    pub oauth_state_ttl_secs: u64,

    /// Seconds an exchanged credential waits to be picked up before it is dropped
    #[arg(long, env, default_value_t = 600)]
    pub credential_ttl_secs: u64,

    /// Timeout in seconds for outbound HTTP requests to HubSpot
    #[arg(long, env, default_value_t = 30)]
    pub http_timeout_secs: u64,

    /// The host interface to listen for incoming connections
    #[arg(short, long, env, default_value = "127.0.0.1")]
    pub interface: Option<String>,

    /// The host TCP port to listen for incoming connections
    #[arg(short, long, env, default_value_t = 8000)]
    pub port: u16,

    /// Set the log level verbosity threshold (level) to control what gets displayed on console output
    #[arg(
        short,
        long,
        env,
        default_value_t = LevelFilter::Info,
        value_parser = clap::builder::PossibleValuesParser::new(["OFF", "ERROR", "WARN", "INFO", "DEBUG", "TRACE"])
            .map(|s| s.parse::<LevelFilter>().unwrap()),
        )]
    pub log_level_filter: LevelFilter,
}

impl Default for Config {
    fn default() -> Self {
        Self::new()
    }
}

impl Config {
    pub fn new() -> Self {
        // Load .env file first
        dotenv().ok();
        // Then parse the command line parameters and flags
        Config::parse()
    }

    pub fn hubspot_client_id(&self) -> Option<String> {
        self.hubspot_client_id.clone()
    }

    pub fn hubspot_client_secret(&self) -> Option<String> {
        self.hubspot_client_secret.clone()
    }

    pub fn hubspot_redirect_uri(&self) -> &str {
        &self.hubspot_redirect_uri
    }

    pub fn hubspot_scopes(&self) -> &[String] {
        &self.hubspot_scopes
    }

    pub fn hubspot_authorization_url(&self) -> &str {
        &self.hubspot_authorization_url
    }

    pub fn hubspot_token_url(&self) -> &str {
        &self.hubspot_token_url
    }

    /// Returns the HubSpot API base URL.
    pub fn hubspot_api_base_url(&self) -> &str {
        &self.hubspot_api_base_url
    }

    pub fn oauth_state_ttl(&self) -> Duration {
        Duration::from_secs(self.oauth_state_ttl_secs)
    }

    pub fn credential_ttl(&self) -> Duration {
        Duration::from_secs(self.credential_ttl_secs)
    }

    pub fn http_timeout(&self) -> Duration {
        Duration::from_secs(self.http_timeout_secs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Variables that would otherwise leak into `try_parse_from` through `env` flags.
    const CONFIG_ENV: &[&str] = &[
        "HUBSPOT_CLIENT_ID",
        "HUBSPOT_CLIENT_SECRET",
        "HUBSPOT_REDIRECT_URI",
        "HUBSPOT_SCOPES",
        "HUBSPOT_AUTHORIZATION_URL",
        "HUBSPOT_TOKEN_URL",
        "HUBSPOT_API_BASE_URL",
        "OAUTH_STATE_TTL_SECS",
        "CREDENTIAL_TTL_SECS",
        "HTTP_TIMEOUT_SECS",
        "PORT",
        "LOG_LEVEL_FILTER",
    ];

    fn parse_config(args: &[&str]) -> Config {
        for name in CONFIG_ENV {
            std::env::remove_var(name);
        }
        Config::try_parse_from(args.iter().copied()).unwrap()
    }

    #[test]
    fn test_defaults() {
        let config = parse_config(&["crm_integrations"]);

        assert_eq!(config.port, 8000);
        assert_eq!(config.oauth_state_ttl(), Duration::from_secs(600));
        assert_eq!(config.credential_ttl(), Duration::from_secs(600));
        assert_eq!(config.hubspot_token_url(), DEFAULT_HUBSPOT_TOKEN_URL);
        assert_eq!(
            config.hubspot_scopes(),
            [
                "crm.objects.contacts.read",
                "crm.objects.companies.read",
                "crm.objects.deals.read"
            ]
        );
    }

    #[test]
    fn test_client_credentials_from_flags() {
        let config = parse_config(&[
            "crm_integrations",
            "--hubspot-client-id",
            "client-1",
            "--hubspot-client-secret",
            "secret-1",
            "--log-level-filter",
            "DEBUG",
        ]);

        assert_eq!(config.hubspot_client_id(), Some("client-1".to_string()));
        assert_eq!(config.hubspot_client_secret(), Some("secret-1".to_string()));
        assert_eq!(config.log_level_filter, LevelFilter::Debug);
    }

    #[test]
    fn test_invalid_log_level_rejected() {
        let result = Config::try_parse_from(["crm_integrations", "--log-level-filter", "LOUD"]);
        assert!(result.is_err());
    }
}
