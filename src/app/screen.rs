//! Products screen controller - client-side paging over the remote collection
//!
//! The remote source returns the whole collection on every fetch. The
//! controller slices it into fixed-size pages and appends one page per
//! successful load. Every load is identified by a [`FetchToken`]; only the
//! holder of the current token may complete it, and a refresh invalidates
//! whatever token was held before it.

use std::ops::Range;

use crate::app::navigation::{Navigator, Route};
use crate::messages::FetchError;
use crate::models::Product;

/// Identifies one in-flight fetch
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct FetchToken(u64);

impl FetchToken {
    pub fn id(self) -> u64 {
        self.0
    }
}

impl From<u64> for FetchToken {
    fn from(id: u64) -> Self {
        FetchToken(id)
    }
}

/// What a completed fetch did to the screen
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FetchOutcome {
    /// Page appended to the existing items
    Appended(usize),
    /// Items replaced by the first page
    Replaced(usize),
    /// Requested window was empty; no more pages
    Exhausted,
    /// Fetch failed; state left as it was
    Failed,
    /// Result belonged to a superseded or unknown fetch and was dropped
    Discarded,
}

/// Result of a refresh request
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Refresh {
    /// Fetch that was in flight and is now invalid
    pub superseded: Option<FetchToken>,
    pub token: Option<FetchToken>,
}

#[derive(Clone, Copy, Debug)]
struct InFlight {
    token: FetchToken,
    reset: bool,
    /// Cursor to restore if the fetch fails
    prior_cursor: usize,
}

/// Contiguous window `[start, start + size)` clipped to `total`
pub fn page_window(total: usize, start: usize, size: usize) -> Range<usize> {
    let start = start.min(total);
    let end = start.saturating_add(size).min(total);
    start..end
}

/// State owned by the products screen for its whole lifetime
#[derive(Debug)]
pub struct ProductsScreen {
    items: Vec<Product>,
    page_size: usize,
    page_cursor: usize,
    has_more: bool,
    is_refreshing: bool,
    in_flight: Option<InFlight>,
    next_token: u64,
}

impl ProductsScreen {
    pub fn new(page_size: usize) -> Self {
        ProductsScreen {
            items: Vec::new(),
            page_size: page_size.max(1),
            page_cursor: 1,
            has_more: true,
            is_refreshing: false,
            in_flight: None,
            next_token: 1,
        }
    }

    pub fn items(&self) -> &[Product] {
        &self.items
    }

    pub fn is_loading(&self) -> bool {
        self.in_flight.is_some()
    }

    pub fn is_refreshing(&self) -> bool {
        self.is_refreshing
    }

    pub fn has_more(&self) -> bool {
        self.has_more
    }

    pub fn page_cursor(&self) -> usize {
        self.page_cursor
    }

    pub fn page_size(&self) -> usize {
        self.page_size
    }

    /// Token of the fetch currently in flight
    pub fn in_flight(&self) -> Option<FetchToken> {
        self.in_flight.map(|f| f.token)
    }

    /// First load when the screen is shown
    pub fn mount(&mut self) -> Option<FetchToken> {
        self.load_page(false)
    }

    /// Start a load. Returns `None` when a fetch is already in flight, or
    /// when the collection is exhausted and this is not a reset.
    pub fn load_page(&mut self, reset: bool) -> Option<FetchToken> {
        if self.in_flight.is_some() || (!self.has_more && !reset) {
            return None;
        }
        let token = FetchToken(self.next_token);
        self.next_token += 1;
        self.in_flight = Some(InFlight {
            token,
            reset,
            prior_cursor: self.page_cursor,
        });
        tracing::debug!(token = token.id(), reset, cursor = self.page_cursor, "Starting page load");
        Some(token)
    }

    /// Scroll reached the end of the rendered list
    pub fn handle_load_more(&mut self) -> Option<FetchToken> {
        if self.has_more && !self.is_loading() {
            self.load_page(false)
        } else {
            None
        }
    }

    /// Pull-to-refresh: invalidate any in-flight fetch and reload from the first page
    pub fn handle_refresh(&mut self) -> Refresh {
        let superseded = self.in_flight.take().map(|f| f.token);
        if let Some(old) = superseded {
            tracing::debug!(token = old.id(), "Superseding in-flight fetch");
        }
        let prior_cursor = self.page_cursor;
        self.is_refreshing = true;
        self.page_cursor = 1;
        let token = self.load_page(true);
        if let Some(flight) = self.in_flight.as_mut() {
            flight.prior_cursor = prior_cursor;
        }
        Refresh { superseded, token }
    }

    /// Deliver the result of a fetch. Only the current token is accepted.
    pub fn complete_fetch(
        &mut self,
        token: FetchToken,
        result: Result<Vec<Product>, FetchError>,
    ) -> FetchOutcome {
        let flight = match self.in_flight {
            Some(flight) if flight.token == token => flight,
            _ => {
                tracing::debug!(token = token.id(), "Discarding result of stale fetch");
                return FetchOutcome::Discarded;
            }
        };
        self.in_flight = None;

        let outcome = match result {
            Ok(all) => self.apply_page(&all, flight.reset),
            Err(error) => {
                tracing::error!(token = token.id(), %error, "Catalog fetch failed");
                // Items still hold every earlier page, so the cursor must match them
                self.page_cursor = flight.prior_cursor;
                FetchOutcome::Failed
            }
        };

        if flight.reset {
            self.is_refreshing = false;
        }
        outcome
    }

    fn apply_page(&mut self, all: &[Product], reset: bool) -> FetchOutcome {
        let start = if reset {
            0
        } else {
            (self.page_cursor - 1).saturating_mul(self.page_size)
        };
        let window = page_window(all.len(), start, self.page_size);
        let page = &all[window];

        if page.is_empty() {
            self.has_more = false;
            return FetchOutcome::Exhausted;
        }

        self.has_more = true;
        if reset {
            self.items = page.to_vec();
            self.page_cursor = 2;
            FetchOutcome::Replaced(page.len())
        } else {
            self.items.extend_from_slice(page);
            self.page_cursor += 1;
            FetchOutcome::Appended(page.len())
        }
    }

    /// Ask the navigator to show details for `item`
    pub fn on_item_selected(&self, item: &Product, navigator: &mut impl Navigator) {
        tracing::info!(id = %item.id, "Opening product details");
        navigator.push(Route::ProductDetails(item.clone()));
    }
}
