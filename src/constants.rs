//! Application constants
//!
//! Centralized location for magic strings and configuration defaults.

/// Default product collection endpoint
pub const DEFAULT_PRODUCTS_URL: &str = "https://fakestoreapi.com/products";

/// Number of products appended per page
pub const PRODUCTS_PER_PAGE: usize = 4;

/// Fraction of a screenful from the bottom at which the next page is requested
pub const DEFAULT_END_REACHED_THRESHOLD: f32 = 0.5;

/// Default HTTP request timeout in seconds
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;

/// Number of columns in the product grid
pub const GRID_COLUMNS: usize = 2;

/// Height of a single product card, borders included
pub const CARD_HEIGHT: u16 = 8;

/// Header text shown above the grid
pub const HEADER_TITLE: &str = "Item List";

/// Application name
pub const APP_NAME: &str = "Catalog TUI";

/// Application version
pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Log file name inside the configured log directory
pub const LOG_FILE_NAME: &str = "catalog.log";
