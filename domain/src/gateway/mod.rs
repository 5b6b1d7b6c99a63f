//! Clients for vendor APIs.

pub mod hubspot;

pub use hubspot::{CrmGateway, HubSpotClient};
