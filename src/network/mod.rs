//! Network layer - catalog fetches against the remote source
//!
//! The Network actor receives fetch commands and sends back responses.

pub mod actor;
pub mod client;

pub use actor::NetworkActor;
pub use client::{create_client, fetch_catalog, parse_catalog};
