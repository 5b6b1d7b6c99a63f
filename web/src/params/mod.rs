//! This module holds typed parameters for various endpoint inputs.
//!
//! The integration endpoints are called by a browser frontend with form-encoded bodies,
//! so each parameter type here deserializes from `application/x-www-form-urlencoded`.

pub(crate) mod hubspot;
