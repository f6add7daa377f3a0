//! Network messages - communication between App and Network layers

use thiserror::Error;

use crate::models::Product;

/// Commands sent from App layer to Network layer
#[derive(Debug, Clone)]
pub enum NetworkCommand {
    /// Download the full product collection
    FetchCatalog {
        id: u64,
        url: String,
    },
    /// Abort an in-flight fetch. A result already sent before the cancel
    /// landed may still arrive, followed by `Cancelled`.
    CancelFetch(u64),
    /// Shutdown the network actor
    Shutdown,
}

/// Why a catalog fetch failed. All variants are handled the same way by the
/// screen; the distinction only matters for the log.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum FetchError {
    #[error("request timed out")]
    Timeout,
    #[error("connection failed: {0}")]
    Transport(String),
    #[error("server responded with status {0}")]
    Status(u16),
    #[error("malformed catalog payload: {0}")]
    Decode(String),
}

/// Responses sent from Network layer to App layer
#[derive(Debug, Clone)]
pub enum NetworkResponse {
    /// The whole collection was downloaded and decoded
    CatalogLoaded {
        id: u64,
        products: Vec<Product>,
        time_ms: u64,
    },
    /// The fetch failed
    FetchFailed {
        id: u64,
        error: FetchError,
        time_ms: u64,
    },
    /// The fetch was cancelled before completing
    Cancelled {
        id: u64,
    },
}

impl NetworkResponse {
    /// Get the fetch ID from the response
    pub fn id(&self) -> u64 {
        match self {
            NetworkResponse::CatalogLoaded { id, .. } => *id,
            NetworkResponse::FetchFailed { id, .. } => *id,
            NetworkResponse::Cancelled { id } => *id,
        }
    }
}
