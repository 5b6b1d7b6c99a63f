//! Parameters for HubSpot integration endpoints.

use serde::Deserialize;
use utoipa::ToSchema;

/// Identifies whose integration an operation acts on.
#[derive(Debug, Deserialize, ToSchema)]
pub struct IntegrationOwnerParams {
    pub user_id: String,
    pub org_id: String,
}

/// Parameters for loading items with a previously retrieved credential.
#[derive(Debug, Deserialize, ToSchema)]
pub struct LoadItemsParams {
    /// Credential JSON as returned by the credentials endpoint
    pub credentials: String,
}
