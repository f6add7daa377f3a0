//! # Catalog TUI
//!
//! A terminal browser for a remote product catalog.
//!
//! ## Features
//! - Two-column product grid with image reference, title and price
//! - Infinite scroll: pages are appended as the selection nears the end
//! - Refresh from the first page, superseding any in-flight fetch
//! - Product details screen
//!
//! ## Architecture
//! Actor-based with channels:
//! - UI Layer (Ratatui) - synchronous
//! - App Layer (State machine)
//! - Network Layer (Tokio runtime)

pub mod config;
pub mod constants;
pub mod models;
pub mod ui;
pub mod messages;
pub mod app;
pub mod network;

// Re-export commonly used types
pub use config::Config;
pub use models::{Product, ProductId, Rating};
pub use messages::{FetchError, NetworkCommand, NetworkResponse, RenderState, UiEvent};
pub use app::{AppActor, AppState, FetchOutcome, FetchToken, Navigator, ProductsScreen, Route, ScreenStack};
pub use network::NetworkActor;
