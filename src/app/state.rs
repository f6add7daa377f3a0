//! App state - pure data structure with no I/O logic

use chrono::{DateTime, Local};

use crate::app::navigation::ScreenStack;
use crate::app::screen::ProductsScreen;
use crate::config::Config;
use crate::messages::RenderState;

/// Main application state - pure data, no I/O
pub struct AppState {
    // Remote source
    pub api_url: String,

    // Screen controller and navigation host
    pub screen: ProductsScreen,
    pub stack: ScreenStack,

    // Grid presentation
    pub selected: usize,
    pub scroll_row: usize,
    pub viewport_rows: usize,
    pub end_reached_threshold: f32,

    // Details screen
    pub details_scroll: u16,

    pub loaded_at: Option<DateTime<Local>>,

    // Popups
    pub show_help: bool,
}

impl Default for AppState {
    fn default() -> Self {
        Self::new(&Config::default())
    }
}

impl AppState {
    pub fn new(config: &Config) -> Self {
        AppState {
            api_url: config.api_url.clone(),
            screen: ProductsScreen::new(config.page_size),
            stack: ScreenStack::new(),
            selected: 0,
            scroll_row: 0,
            viewport_rows: 1,
            end_reached_threshold: config.end_reached_threshold,
            details_scroll: 0,
            loaded_at: None,
            show_help: false,
        }
    }

    /// Convert state to RenderState for UI
    pub fn to_render_state(&self) -> RenderState {
        RenderState {
            products: self.screen.items().to_vec(),
            selected: self.selected,
            scroll_row: self.scroll_row,
            is_loading: self.screen.is_loading(),
            is_refreshing: self.screen.is_refreshing(),
            has_more: self.screen.has_more(),
            page_cursor: self.screen.page_cursor(),
            loaded_at: self.loaded_at.map(|t| t.format("%H:%M:%S").to_string()),
            details: self.stack.current_product().cloned(),
            details_scroll: self.details_scroll,
            show_help: self.show_help,
        }
    }
}
