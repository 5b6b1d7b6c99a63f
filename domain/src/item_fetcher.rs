//! Loads CRM records of every kind and merges them into one list.
//!
//! Each kind is queried independently. A failed query is reported and dropped; it never
//! aborts the others, so callers get whatever could be loaded.

use log::*;

use crate::error::Error;
use crate::gateway::CrmGateway;
use crate::integration_item::{IntegrationItem, ItemType};

/// Result of querying one kind of record.
#[derive(Debug)]
pub enum QueryOutcome {
    Fetched {
        item_type: ItemType,
        items: Vec<IntegrationItem>,
    },
    Failed {
        item_type: ItemType,
        reason: String,
    },
}

/// Receives failures of individual queries.
pub trait FetchReporter: Send + Sync {
    fn query_failed(&self, item_type: ItemType, error: &Error);
}

/// Reports query failures to the application log.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogReporter;

impl FetchReporter for LogReporter {
    fn query_failed(&self, item_type: ItemType, error: &Error) {
        warn!("Error fetching {}: {}", item_type, error);
    }
}

/// Query one kind of record and normalize the results.
pub async fn query(
    gateway: &dyn CrmGateway,
    item_type: ItemType,
    reporter: &dyn FetchReporter,
) -> QueryOutcome {
    match gateway.list_objects(item_type).await {
        Ok(objects) => QueryOutcome::Fetched {
            item_type,
            items: objects
                .iter()
                .map(|object| IntegrationItem::from_crm_object(object, item_type))
                .collect(),
        },
        Err(e) => {
            reporter.query_failed(item_type, &e);
            QueryOutcome::Failed {
                item_type,
                reason: e.to_string(),
            }
        }
    }
}

/// Concatenate fetched items in outcome order, skipping failed queries.
pub fn merge(outcomes: impl IntoIterator<Item = QueryOutcome>) -> Vec<IntegrationItem> {
    outcomes
        .into_iter()
        .flat_map(|outcome| match outcome {
            QueryOutcome::Fetched { item_type, items } => {
                debug!("Fetched {} {}", items.len(), item_type);
                items
            }
            QueryOutcome::Failed { item_type, reason } => {
                debug!("Skipping {}: {}", item_type, reason);
                Vec::new()
            }
        })
        .collect()
}

/// Load contacts, companies and deals concurrently.
///
/// # Returns
///
/// Contacts, then companies, then deals, each in the order the vendor returned them.
pub async fn fetch_items(
    gateway: &dyn CrmGateway,
    reporter: &dyn FetchReporter,
) -> Vec<IntegrationItem> {
    let (contacts, companies, deals) = tokio::join!(
        query(gateway, ItemType::Contact, reporter),
        query(gateway, ItemType::Company, reporter),
        query(gateway, ItemType::Deal, reporter)
    );

    let items = merge([contacts, companies, deals]);
    debug!("Loaded {} integration items", items.len());
    items
}
