//! Vendor-agnostic representation of CRM records.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use utoipa::ToSchema;

use crate::gateway::hubspot::CrmObject;

/// Kinds of CRM records an integration loads.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub enum ItemType {
    Contact,
    Company,
    Deal,
}

impl ItemType {
    /// Path segment of the vendor's object endpoint for this kind.
    pub fn object_path(&self) -> &'static str {
        match self {
            ItemType::Contact => "contacts",
            ItemType::Company => "companies",
            ItemType::Deal => "deals",
        }
    }
}

impl fmt::Display for ItemType {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.object_path())
    }
}

/// A CRM record normalized for display.
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct IntegrationItem {
    pub id: String,
    pub name: String,
    #[serde(rename = "type")]
    pub item_type: ItemType,
    pub creation_time: Option<DateTime<Utc>>,
    pub last_modified_time: Option<DateTime<Utc>>,
}

impl IntegrationItem {
    /// Normalize a vendor object of the given kind.
    ///
    /// Contacts are named `firstname lastname`, companies by `name` and deals by
    /// `dealname`. Missing or null properties count as empty strings.
    pub fn from_crm_object(object: &CrmObject, item_type: ItemType) -> Self {
        let name = match item_type {
            ItemType::Contact => format!(
                "{} {}",
                object.property("firstname"),
                object.property("lastname")
            ),
            ItemType::Company => object.property("name").to_string(),
            ItemType::Deal => object.property("dealname").to_string(),
        };

        Self {
            id: object.id(),
            name,
            item_type,
            creation_time: parse_timestamp(object.created_at.as_deref()),
            last_modified_time: parse_timestamp(object.updated_at.as_deref()),
        }
    }
}

fn parse_timestamp(value: Option<&str>) -> Option<DateTime<Utc>> {
    value
        .and_then(|value| DateTime::parse_from_rfc3339(value).ok())
        .map(|timestamp| timestamp.with_timezone(&Utc))
}
