//! Command handlers - business logic for processing UI events and fetch results

use chrono::Local;

use crate::app::screen::{FetchOutcome, FetchToken};
use crate::app::AppState;
use crate::constants::GRID_COLUMNS;
use crate::messages::{FetchError, NetworkCommand, NetworkResponse};
use crate::models::Product;

impl AppState {
    // ========================
    // Loading
    // ========================

    /// Initial load when the products screen appears
    pub fn mount(&mut self) -> Option<NetworkCommand> {
        let token = self.screen.mount()?;
        Some(self.fetch_command(token))
    }

    /// Pull-to-refresh. Cancels the superseded fetch, if any, then reloads.
    pub fn refresh(&mut self) -> Vec<NetworkCommand> {
        let refresh = self.screen.handle_refresh();
        let mut commands = Vec::with_capacity(2);
        if let Some(old) = refresh.superseded {
            commands.push(NetworkCommand::CancelFetch(old.id()));
        }
        if let Some(token) = refresh.token {
            commands.push(self.fetch_command(token));
        }
        commands
    }

    fn fetch_command(&self, token: FetchToken) -> NetworkCommand {
        NetworkCommand::FetchCatalog {
            id: token.id(),
            url: self.api_url.clone(),
        }
    }

    /// Request the next page when the viewport is close to the last row
    pub fn load_more_if_near_end(&mut self) -> Option<NetworkCommand> {
        if !self.is_near_end() {
            return None;
        }
        let token = self.screen.handle_load_more()?;
        Some(self.fetch_command(token))
    }

    /// Rows below the viewport are within the threshold of a screenful
    pub fn is_near_end(&self) -> bool {
        let bottom = self.scroll_row + self.viewport_rows;
        let remaining = self.row_count().saturating_sub(bottom);
        remaining as f32 <= self.viewport_rows as f32 * self.end_reached_threshold
    }

    fn row_count(&self) -> usize {
        (self.screen.items().len() + GRID_COLUMNS - 1) / GRID_COLUMNS
    }

    // ========================
    // Network responses
    // ========================

    pub fn handle_response(&mut self, response: NetworkResponse) -> Option<NetworkCommand> {
        tracing::debug!(id = response.id(), in_flight = ?self.screen.in_flight().map(|t| t.id()), "Network response");
        match response {
            NetworkResponse::CatalogLoaded { id, products, time_ms } => {
                tracing::info!(id, count = products.len(), time_ms, "Catalog fetched");
                self.finish_fetch(id, Ok(products))
            }
            NetworkResponse::FetchFailed { id, error, time_ms } => {
                tracing::info!(id, time_ms, "Catalog fetch returned an error");
                self.finish_fetch(id, Err(error))
            }
            NetworkResponse::Cancelled { id } => {
                // Only superseded fetches are cancelled, so there is no token to release.
                // A late result for the same id is discarded by the token check.
                tracing::debug!(id, "Fetch cancelled");
                None
            }
        }
    }

    fn finish_fetch(
        &mut self,
        id: u64,
        result: Result<Vec<Product>, FetchError>,
    ) -> Option<NetworkCommand> {
        match self.screen.complete_fetch(FetchToken::from(id), result) {
            FetchOutcome::Replaced(_) => {
                self.selected = 0;
                self.scroll_row = 0;
                self.loaded_at = Some(Local::now());
                self.load_more_if_near_end()
            }
            FetchOutcome::Appended(_) => {
                self.loaded_at = Some(Local::now());
                self.load_more_if_near_end()
            }
            FetchOutcome::Exhausted => {
                self.loaded_at = Some(Local::now());
                None
            }
            FetchOutcome::Failed | FetchOutcome::Discarded => None,
        }
    }

    // ========================
    // Grid navigation
    // ========================

    pub fn select_left(&mut self) -> Option<NetworkCommand> {
        self.move_selection(self.selected.saturating_sub(1))
    }

    pub fn select_right(&mut self) -> Option<NetworkCommand> {
        self.move_selection(self.selected + 1)
    }

    pub fn select_up(&mut self) -> Option<NetworkCommand> {
        if self.selected < GRID_COLUMNS {
            return self.move_selection(self.selected);
        }
        self.move_selection(self.selected - GRID_COLUMNS)
    }

    pub fn select_down(&mut self) -> Option<NetworkCommand> {
        let len = self.screen.items().len();
        let last_row = len.saturating_sub(1) / GRID_COLUMNS;
        if self.selected / GRID_COLUMNS >= last_row {
            return self.move_selection(self.selected);
        }
        // A short last row clamps to its final cell
        self.move_selection(self.selected + GRID_COLUMNS)
    }

    pub fn page_down(&mut self) -> Option<NetworkCommand> {
        self.move_selection(self.selected + self.viewport_rows * GRID_COLUMNS)
    }

    pub fn page_up(&mut self) -> Option<NetworkCommand> {
        self.move_selection(self.selected.saturating_sub(self.viewport_rows * GRID_COLUMNS))
    }

    pub fn select_first(&mut self) -> Option<NetworkCommand> {
        self.move_selection(0)
    }

    pub fn select_last(&mut self) -> Option<NetworkCommand> {
        self.move_selection(usize::MAX)
    }

    fn move_selection(&mut self, target: usize) -> Option<NetworkCommand> {
        let len = self.screen.items().len();
        self.selected = target.min(len.saturating_sub(1));
        self.ensure_selected_visible();
        self.load_more_if_near_end()
    }

    fn ensure_selected_visible(&mut self) {
        let row = self.selected / GRID_COLUMNS;
        if row < self.scroll_row {
            self.scroll_row = row;
        } else if row >= self.scroll_row + self.viewport_rows {
            self.scroll_row = row + 1 - self.viewport_rows;
        }
    }

    /// Grid area changed size
    pub fn resize(&mut self, rows: u16) -> Option<NetworkCommand> {
        self.viewport_rows = usize::from(rows).max(1);
        self.ensure_selected_visible();
        self.load_more_if_near_end()
    }

    // ========================
    // Navigation
    // ========================

    pub fn open_selected(&mut self) {
        if let Some(item) = self.screen.items().get(self.selected) {
            self.screen.on_item_selected(item, &mut self.stack);
            self.details_scroll = 0;
        }
    }

    pub fn go_back(&mut self) {
        if self.stack.pop() {
            self.details_scroll = 0;
        }
    }

    pub fn details_scroll_up(&mut self) {
        self.details_scroll = self.details_scroll.saturating_sub(1);
    }

    pub fn details_scroll_down(&mut self) {
        self.details_scroll = self.details_scroll.saturating_add(1);
    }

    // ========================
    // Popups
    // ========================

    pub fn toggle_help(&mut self) {
        self.show_help = !self.show_help;
    }

    pub fn close_help(&mut self) {
        self.show_help = false;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::navigation::Route;

    fn catalog(n: i64) -> Vec<Product> {
        (1..=n)
            .map(|i| Product::new(i, format!("Item {}", i), 10.0, "img.png"))
            .collect()
    }

    fn fetch_id(cmd: Option<NetworkCommand>) -> u64 {
        match cmd {
            Some(NetworkCommand::FetchCatalog { id, .. }) => id,
            other => panic!("expected fetch, got {:?}", other),
        }
    }

    fn loaded(id: u64, products: Vec<Product>) -> NetworkResponse {
        NetworkResponse::CatalogLoaded { id, products, time_ms: 1 }
    }

    /// One page loaded into a one-row viewport, so nothing loads on its own
    fn state_with_page(all: &[Product]) -> AppState {
        let mut state = AppState::default();
        state.viewport_rows = 1;
        let id = fetch_id(state.mount());
        assert!(state.handle_response(loaded(id, all.to_vec())).is_none());
        state
    }

    #[test]
    fn test_mount_fetches_configured_url() {
        let mut state = AppState::default();
        state.api_url = "http://localhost/products".into();
        match state.mount() {
            Some(NetworkCommand::FetchCatalog { url, .. }) => assert_eq!(url, "http://localhost/products"),
            other => panic!("unexpected {:?}", other),
        }
        // Already in flight
        assert!(state.mount().is_none());
    }

    #[test]
    fn test_short_content_keeps_loading_until_filled() {
        let all = catalog(10);
        let mut state = AppState::default();
        state.viewport_rows = 4;

        let id = fetch_id(state.mount());
        let next = state.handle_response(loaded(id, all.clone()));
        let id = fetch_id(next);
        assert_eq!(state.screen.items().len(), 4);

        let next = state.handle_response(loaded(id, all.clone()));
        let id = fetch_id(next);
        assert_eq!(state.screen.items().len(), 8);

        // 5 rows with 4 visible leaves 1 row below, within half a screen
        let id = fetch_id(state.handle_response(loaded(id, all.clone())));
        assert_eq!(state.screen.items().len(), 10);
        assert!(state.handle_response(loaded(id, all.clone())).is_none());
        assert!(!state.screen.has_more());
    }

    #[test]
    fn test_scrolling_down_triggers_next_page() {
        let all = catalog(20);
        let mut state = state_with_page(&all);
        assert_eq!(state.screen.items().len(), 4);

        // Two rows loaded, one visible: moving down reaches the last row
        let cmd = state.select_down();
        let id = fetch_id(cmd);
        assert!(state.select_down().is_none(), "no duplicate load while in flight");

        state.handle_response(loaded(id, all.clone()));
        assert_eq!(state.screen.items().len(), 8);
    }

    #[test]
    fn test_failure_then_manual_retry() {
        let all = catalog(20);
        let mut state = state_with_page(&all);
        let id = fetch_id(state.select_down());
        let follow_up = state.handle_response(NetworkResponse::FetchFailed {
            id,
            error: FetchError::Transport("refused".into()),
            time_ms: 3,
        });
        assert!(follow_up.is_none(), "failures are not retried automatically");
        assert!(!state.screen.is_loading());
        assert_eq!(state.screen.items().len(), 4);

        let id = fetch_id(state.select_down());
        state.handle_response(loaded(id, all.clone()));
        assert_eq!(state.screen.items().len(), 8);
    }

    #[test]
    fn test_refresh_cancels_in_flight_and_ignores_stale_page() {
        let all = catalog(20);
        let mut state = state_with_page(&all);
        let stale = fetch_id(state.select_down());
        state.selected = 3;

        let commands = state.refresh();
        assert_eq!(commands.len(), 2);
        assert!(matches!(commands[0], NetworkCommand::CancelFetch(id) if id == stale));
        let fresh = match &commands[1] {
            NetworkCommand::FetchCatalog { id, .. } => *id,
            other => panic!("unexpected {:?}", other),
        };

        assert!(state.handle_response(loaded(stale, all.clone())).is_none());
        assert_eq!(state.screen.items().len(), 4);
        assert!(state.to_render_state().is_refreshing);

        state.handle_response(loaded(fresh, all.clone()));
        let render = state.to_render_state();
        assert_eq!(render.products, all[0..4].to_vec());
        assert_eq!(render.selected, 0);
        assert!(!render.is_refreshing);
        assert!(!render.is_loading);
        assert!(render.loaded_at.is_some());
    }

    #[test]
    fn test_selection_stays_in_bounds() {
        let all = catalog(3);
        let mut state = AppState::default();
        state.viewport_rows = 10;
        let id = fetch_id(state.mount());
        state.handle_response(loaded(id, all.clone()));
        assert_eq!(state.screen.items().len(), 3);

        state.select_right();
        state.select_down();
        assert_eq!(state.selected, 2);
        state.select_right();
        assert_eq!(state.selected, 2);
        state.select_up();
        assert_eq!(state.selected, 0);
        state.select_last();
        assert_eq!(state.selected, 2);
        state.select_first();
        assert_eq!(state.selected, 0);
    }

    #[test]
    fn test_scroll_follows_selection() {
        let all = catalog(40);
        let mut state = AppState::default();
        state.viewport_rows = 2;
        let id = fetch_id(state.mount());
        let id = fetch_id(state.handle_response(loaded(id, all.clone())));
        assert!(state.handle_response(loaded(id, all.clone())).is_none());
        assert_eq!(state.screen.items().len(), 8);

        let id = fetch_id(state.select_last());
        assert_eq!(state.selected, 7);
        assert_eq!(state.scroll_row, 2);

        assert!(state.handle_response(loaded(id, all.clone())).is_none());
        assert_eq!(state.screen.items().len(), 12);

        assert!(state.page_up().is_none());
        assert_eq!(state.selected, 3);
        assert_eq!(state.scroll_row, 1);
    }

    #[test]
    fn test_open_and_close_details() {
        let all = catalog(4);
        let mut state = state_with_page(&all);
        state.selected = 1;
        state.open_selected();

        assert_eq!(state.stack.depth(), 2);
        assert_eq!(state.stack.current(), &Route::ProductDetails(all[1].clone()));
        assert_eq!(state.to_render_state().details, Some(all[1].clone()));
        assert_eq!(state.screen.items().len(), 4);

        state.details_scroll_down();
        state.go_back();
        assert_eq!(state.details_scroll, 0);
        assert!(state.to_render_state().details.is_none());
    }

    #[test]
    fn test_open_on_empty_grid_does_nothing() {
        let mut state = AppState::default();
        state.open_selected();
        assert_eq!(state.stack.depth(), 1);
    }

    #[test]
    fn test_resize_clamps_viewport() {
        let mut state = AppState::default();
        let first = state.resize(0);
        assert_eq!(state.viewport_rows, 1);
        // Empty list is always at its end
        assert!(first.is_some());
    }
}
