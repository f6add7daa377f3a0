//! Render state - data structure sent from App layer to UI for rendering

use crate::models::Product;

/// Complete state needed by the UI to render
#[derive(Debug, Clone, Default)]
pub struct RenderState {
    // Product grid
    pub products: Vec<Product>,
    pub selected: usize,
    /// First visible grid row
    pub scroll_row: usize,

    // Loading flags
    pub is_loading: bool,
    pub is_refreshing: bool,
    pub has_more: bool,
    pub page_cursor: usize,
    /// Local time of the last successful load, preformatted
    pub loaded_at: Option<String>,

    // Details screen, set while it is on top of the navigation stack
    pub details: Option<Product>,
    pub details_scroll: u16,

    // Popups
    pub show_help: bool,
}

impl RenderState {
    /// Whether the details screen is showing
    pub fn on_details(&self) -> bool {
        self.details.is_some()
    }
}
