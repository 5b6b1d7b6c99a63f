use crate::{controller::health_check_controller, params, AppState};
use axum::{
    routing::{get, post},
    Router,
};

use crate::controller::hubspot_controller;

use utoipa::OpenApi;
use utoipa_rapidoc::RapiDoc;

// This is the global definition of our OpenAPI document. To be a part
// of the rendered document, a path and schema must be listed here.
#[derive(OpenApi)]
#[openapi(
        info(
            title = "CRM Integrations API"
        ),
        paths(
            health_check_controller::health_check,
            hubspot_controller::authorize,
            hubspot_controller::oauth2_callback,
            hubspot_controller::credentials,
            hubspot_controller::load,
        ),
        components(
            schemas(
                domain::IntegrationItem,
                domain::ItemType,
                params::hubspot::IntegrationOwnerParams,
                params::hubspot::LoadItemsParams,
            )
        ),
        tags(
            (name = "crm_integrations", description = "Third-party CRM integrations API")
        )
    )]
struct ApiDoc;

pub fn define_routes(app_state: AppState) -> Router {
    Router::new()
        .merge(health_routes())
        .merge(hubspot_routes(app_state))
        .merge(RapiDoc::with_openapi("/api-docs/openapi.json", ApiDoc::openapi()).path("/rapidoc"))
}

fn health_routes() -> Router {
    Router::new().route("/health", get(health_check_controller::health_check))
}

fn hubspot_routes(app_state: AppState) -> Router {
    Router::new()
        .route(
            "/integrations/hubspot/authorize",
            post(hubspot_controller::authorize),
        )
        .route(
            "/integrations/hubspot/oauth2callback",
            get(hubspot_controller::oauth2_callback),
        )
        .route(
            "/integrations/hubspot/credentials",
            post(hubspot_controller::credentials),
        )
        .route("/integrations/hubspot/load", post(hubspot_controller::load))
        .with_state(app_state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::{to_bytes, Body};
    use axum::http::{header, Request, StatusCode};
    use clap::Parser;
    use domain::MemoryStore;
    use mockito::Server;
    use service::config::Config;
    use std::sync::Arc;
    use tower::ServiceExt;

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
    ];

    fn parse_config(args: &[&str]) -> Config {
        for name in CONFIG_ENV {
            std::env::remove_var(name);
        }
        Config::try_parse_from(args.iter().copied()).unwrap()
    }

    fn app_state(extra: &[&str]) -> AppState {
        let mut args = vec![
            "crm_integrations",
            "--hubspot-client-id",
            "client-1",
            "--hubspot-client-secret",
            "secret-1",
        ];
        args.extend_from_slice(extra);
        AppState::new(
            parse_config(&args),
            Arc::new(MemoryStore::new()),
        )
    }

    fn form_request(uri: &str, body: &str) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    async fn body_string(response: axum::response::Response) -> String {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        String::from_utf8(bytes.to_vec()).unwrap()
    }

    #[tokio::test]
    async fn test_health_check() {
        let app = define_routes(app_state(&[]));
        let request = Request::builder().uri("/health").body(Body::empty()).unwrap();

        let response = app.oneshot(request).await.unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(body_string(response).await, "healthy");
    }

    #[tokio::test]
    async fn test_authorize_returns_url() {
        let app = define_routes(app_state(&[]));

        let response = app
            .oneshot(form_request(
                "/integrations/hubspot/authorize",
                "user_id=u1&org_id=o1",
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let url: String = serde_json::from_str(&body_string(response).await).unwrap();
        assert!(url.starts_with("https://app.hubspot.com/oauth/authorize?client_id=client-1&"));
        assert!(url.contains("&state="));
    }

    #[tokio::test]
    async fn test_callback_with_vendor_error() {
        let app = define_routes(app_state(&[]));
        let request = Request::builder()
            .uri("/integrations/hubspot/oauth2callback?error=access_denied&error_description=User+denied")
            .body(Body::empty())
            .unwrap();

        let response = app.oneshot(request).await.unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(body_string(response).await, "User denied");
    }

    #[tokio::test]
    async fn test_callback_with_unknown_state() {
        let app = define_routes(app_state(&[]));
        let request = Request::builder()
            .uri("/integrations/hubspot/oauth2callback?code=abc&state=eyJzdGF0ZSI6IngiLCJ1c2VyX2lkIjoidTEiLCJvcmdfaWQiOiJvMSJ9")
            .body(Body::empty())
            .unwrap();

        let response = app.oneshot(request).await.unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(body_string(response).await, "State does not match.");
    }

    #[tokio::test]
    async fn test_handshake_then_credentials_once() {
        let mut server = Server::new_async().await;
        let _token = server
            .mock("POST", "/oauth/v1/token")
            .with_status(200)
            .with_body(r#"{"access_token":"at-1"}"#)
            .create_async()
            .await;
        let token_url = format!("{}/oauth/v1/token", server.url());
        let app = define_routes(app_state(&["--hubspot-token-url", &token_url]));

        let response = app
            .clone()
            .oneshot(form_request(
                "/integrations/hubspot/authorize",
                "user_id=u1&org_id=o1",
            ))
            .await
            .unwrap();
        let url: String = serde_json::from_str(&body_string(response).await).unwrap();
        let state = url.split("state=").nth(1).unwrap();

        let callback = Request::builder()
            .uri(format!(
                "/integrations/hubspot/oauth2callback?code=code-123&state={}",
                state
            ))
            .body(Body::empty())
            .unwrap();
        let response = app.clone().oneshot(callback).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert!(body_string(response).await.contains("window.close()"));

        let response = app
            .clone()
            .oneshot(form_request(
                "/integrations/hubspot/credentials",
                "user_id=u1&org_id=o1",
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let credential: serde_json::Value =
            serde_json::from_str(&body_string(response).await).unwrap();
        assert_eq!(credential["access_token"], "at-1");

        let response = app
            .oneshot(form_request(
                "/integrations/hubspot/credentials",
                "user_id=u1&org_id=o1",
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_credentials_reject_ids_containing_separator() {
        let app = define_routes(app_state(&[]));

        let response = app
            .oneshot(form_request(
                "/integrations/hubspot/credentials",
                "user_id=c&org_id=a%3Ab",
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(body_string(response).await, "No credentials found.");
    }

    #[tokio::test]
    async fn test_load_items() {
        let mut server = Server::new_async().await;
        let _contacts = server
            .mock("GET", "/crm/v3/objects/contacts")
            .with_status(200)
            .with_body(r#"{"results":[{"id":"c1","properties":{"firstname":"Ada","lastname":"Lovelace"},"createdAt":"2024-01-02T03:04:05Z"}]}"#)
            .create_async()
            .await;
        let _companies = server
            .mock("GET", "/crm/v3/objects/companies")
            .with_status(200)
            .with_body(r#"{"results":[{"id":"co1","properties":{"name":"Acme"}}]}"#)
            .create_async()
            .await;
        let _deals = server
            .mock("GET", "/crm/v3/objects/deals")
            .with_status(403)
            .create_async()
            .await;
        let app = define_routes(app_state(&["--hubspot-api-base-url", &server.url()]));

        let response = app
            .oneshot(form_request(
                "/integrations/hubspot/load",
                "credentials=%7B%22access_token%22%3A%22at-1%22%7D",
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let items: serde_json::Value = serde_json::from_str(&body_string(response).await).unwrap();
        assert_eq!(
            items,
            serde_json::json!([
                {
                    "id": "c1",
                    "name": "Ada Lovelace",
                    "type": "Contact",
                    "creation_time": "2024-01-02T03:04:05Z",
                    "last_modified_time": null
                },
                {
                    "id": "co1",
                    "name": "Acme",
                    "type": "Company",
                    "creation_time": null,
                    "last_modified_time": null
                }
            ])
        );
    }

    #[tokio::test]
    async fn test_load_rejects_malformed_credentials() {
        let app = define_routes(app_state(&[]));

        let response = app
            .oneshot(form_request("/integrations/hubspot/load", "credentials=nope"))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }
}
