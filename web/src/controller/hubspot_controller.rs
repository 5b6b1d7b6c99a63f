//! Controller for the HubSpot integration.
//!
//! The authorize and credentials endpoints are called by the frontend. The callback is
//! reached through HubSpot's browser redirect and answers with a page that closes the
//! popup the frontend opened.

use crate::params::hubspot::{IntegrationOwnerParams, LoadItemsParams};
use crate::{AppState, Error};

use axum::extract::{Query, State};
use axum::response::{Html, IntoResponse};
use axum::{Form, Json};

use domain::{hubspot, CallbackParams, Credential, IntegrationItem};
use log::*;

/// POST /integrations/hubspot/authorize
///
/// Starts a HubSpot authorization and returns the URL to open in a popup.
#[utoipa::path(
    post,
    path = "/integrations/hubspot/authorize",
    request_body(content = IntegrationOwnerParams, content_type = "application/x-www-form-urlencoded"),
    responses(
        (status = 200, description = "HubSpot authorization URL", body = String),
        (status = 500, description = "Server error (HubSpot not configured)"),
    )
)]
pub async fn authorize(
    State(app_state): State<AppState>,
    Form(params): Form<IntegrationOwnerParams>,
) -> Result<impl IntoResponse, Error> {
    let url = hubspot::authorize(
        &app_state.config,
        app_state.store.clone(),
        &params.user_id,
        &params.org_id,
    )
    .await?;

    Ok(Json(url))
}

/// GET /integrations/hubspot/oauth2callback
///
/// Handles HubSpot's redirect after the user granted or refused access.
#[utoipa::path(
    get,
    path = "/integrations/hubspot/oauth2callback",
    params(
        ("code" = Option<String>, Query, description = "Authorization code from HubSpot"),
        ("state" = Option<String>, Query, description = "State issued by the authorize endpoint"),
        ("error" = Option<String>, Query, description = "Error code when authorization was refused"),
        ("error_description" = Option<String>, Query, description = "Human readable error"),
    ),
    responses(
        (status = 200, description = "Page that closes the authorization window", body = String, content_type = "text/html"),
        (status = 400, description = "Authorization refused, or state invalid"),
    )
)]
pub async fn oauth2_callback(
    State(app_state): State<AppState>,
    Query(params): Query<CallbackParams>,
) -> Result<impl IntoResponse, Error> {
    let response =
        hubspot::oauth2_callback(&app_state.config, app_state.store.clone(), &params).await?;

    debug!(
        "HubSpot authorization completed for user {} in org {}",
        response.user_id, response.org_id
    );
    Ok(Html(response.html()))
}

/// POST /integrations/hubspot/credentials
///
/// Hands out the credential obtained by the callback. Each credential is returned once.
#[utoipa::path(
    post,
    path = "/integrations/hubspot/credentials",
    request_body(content = IntegrationOwnerParams, content_type = "application/x-www-form-urlencoded"),
    responses(
        (status = 200, description = "HubSpot token response", body = Object),
        (status = 400, description = "No credentials found"),
    )
)]
pub async fn credentials(
    State(app_state): State<AppState>,
    Form(params): Form<IntegrationOwnerParams>,
) -> Result<impl IntoResponse, Error> {
    let credential = hubspot::credentials(
        &app_state.config,
        app_state.store.clone(),
        &params.user_id,
        &params.org_id,
    )
    .await?;

    Ok(Json(credential.into_value()))
}

/// POST /integrations/hubspot/load
///
/// Loads contacts, companies and deals. Kinds that fail to load are left out.
#[utoipa::path(
    post,
    path = "/integrations/hubspot/load",
    request_body(content = LoadItemsParams, content_type = "application/x-www-form-urlencoded"),
    responses(
        (status = 200, description = "Loaded integration items", body = [IntegrationItem]),
        (status = 400, description = "Invalid credentials"),
    )
)]
pub async fn load(
    State(app_state): State<AppState>,
    Form(params): Form<LoadItemsParams>,
) -> Result<impl IntoResponse, Error> {
    let credential = Credential::parse(&params.credentials)?;
    let items: Vec<IntegrationItem> = hubspot::load_items(&app_state.config, &credential).await?;

    Ok(Json(items))
}
