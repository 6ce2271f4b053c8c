//! The per-page listing core: a {loading, success, error} presentation
//! state machine over a wholesale-replaced item collection, with local
//! filtering, pagination, and a stale-response guard.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Mutex;

use serde::Serialize;
use tracing::debug;

use crate::fetch_error::FetchError;
use crate::pagination::PageState;

/// Items that support the free-text filter box of their page
pub trait Filterable {
    fn matches(&self, query: &str) -> bool;
}

/// Exactly one of these is active per listing instance
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum RequestStatus {
    Loading,
    Success,
    Error,
}

#[derive(Debug)]
pub struct ListingState<T> {
    items: Vec<T>,
    status: RequestStatus,
    error: Option<FetchError>,
    query: String,
    page: PageState,
}

impl<T> Default for ListingState<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> ListingState<T> {
    pub fn new() -> Self {
        Self {
            items: Vec::new(),
            status: RequestStatus::Loading,
            error: None,
            query: String::new(),
            page: PageState::new(),
        }
    }

    /// A fetch is underway. Existing items stay visible behind the loading
    /// affordance until the response replaces them.
    pub fn begin(&mut self) {
        self.status = RequestStatus::Loading;
        self.error = None;
    }

    /// Apply a fetch outcome: wholesale replacement on success, cleared
    /// items plus the surfaced message on failure. Either way the view
    /// snaps back to page 1.
    pub fn complete(&mut self, result: Result<Vec<T>, FetchError>) {
        match result {
            Ok(items) => {
                self.items = items;
                self.status = RequestStatus::Success;
                self.error = None;
            }
            Err(err) => {
                self.items.clear();
                self.status = RequestStatus::Error;
                self.error = Some(err);
            }
        }
        self.page.reset();
    }

    pub fn status(&self) -> RequestStatus {
        self.status
    }

    pub fn error(&self) -> Option<&FetchError> {
        self.error.as_ref()
    }

    pub fn items(&self) -> &[T] {
        &self.items
    }

    /// Fetch succeeded but there is nothing to show ("no results", which is
    /// not an error state)
    pub fn is_empty(&self) -> bool {
        self.status == RequestStatus::Success && self.items.is_empty()
    }

    pub fn set_items_per_page(&mut self, size: usize) -> bool {
        self.page.set_items_per_page(size)
    }

    pub fn items_per_page(&self) -> usize {
        self.page.items_per_page()
    }

    pub fn current_page(&self) -> usize {
        self.page.current_page()
    }
}

impl<T: Filterable> ListingState<T> {
    /// Local case-insensitive filter. Changing it snaps back to page 1.
    pub fn set_query(&mut self, query: &str) {
        self.query = query.trim().to_lowercase();
        self.page.reset();
    }

    pub fn query(&self) -> &str {
        &self.query
    }

    pub fn filtered(&self) -> Vec<&T> {
        if self.query.is_empty() {
            return self.items.iter().collect();
        }
        self.items
            .iter()
            .filter(|item| item.matches(&self.query))
            .collect()
    }

    pub fn total_pages(&self) -> usize {
        self.page.total_pages(self.filtered().len())
    }

    pub fn set_page(&mut self, page: usize) -> bool {
        let total = self.filtered().len();
        self.page.set_page(page, total)
    }

    /// The slice of the filtered collection on the current page
    pub fn visible(&self) -> Vec<&T> {
        let filtered = self.filtered();
        let start = (self.page.current_page() - 1) * self.page.items_per_page();
        if start >= filtered.len() {
            return Vec::new();
        }
        let end = (start + self.page.items_per_page()).min(filtered.len());
        filtered[start..end].to_vec()
    }
}

/// Opaque handle tying a fetch to the moment it was issued
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FetchToken(u64);

/// Thread-safe wrapper coupling `ListingState` with a monotonic fetch
/// token. A completion is applied only when its token is still the latest
/// issued, so a response arriving late can never clobber newer state.
pub struct ListingController<T> {
    state: Mutex<ListingState<T>>,
    seq: AtomicU64,
}

impl<T> Default for ListingController<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> ListingController<T> {
    pub fn new() -> Self {
        Self {
            state: Mutex::new(ListingState::new()),
            seq: AtomicU64::new(0),
        }
    }

    /// Mark the listing loading and issue the token the eventual completion
    /// must present
    pub fn begin_fetch(&self) -> FetchToken {
        let token = self.seq.fetch_add(1, Ordering::SeqCst) + 1;
        self.state.lock().unwrap().begin();
        FetchToken(token)
    }

    /// Apply a fetch outcome. Returns false (state untouched) when a newer
    /// fetch was issued after this token.
    pub fn complete(&self, token: FetchToken, result: Result<Vec<T>, FetchError>) -> bool {
        let latest = self.seq.load(Ordering::SeqCst);
        if token.0 != latest {
            debug!(
                "discarding stale listing result (token {} superseded by {})",
                token.0, latest
            );
            return false;
        }
        self.state.lock().unwrap().complete(result);
        true
    }

    pub fn read<R>(&self, f: impl FnOnce(&ListingState<T>) -> R) -> R {
        f(&self.state.lock().unwrap())
    }

    pub fn update<R>(&self, f: impl FnOnce(&mut ListingState<T>) -> R) -> R {
        f(&mut self.state.lock().unwrap())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fetch_error::FetchErrorKind;

    #[derive(Debug, Clone, PartialEq)]
    struct Row(u32, &'static str);

    impl Filterable for Row {
        fn matches(&self, query: &str) -> bool {
            self.1.to_lowercase().contains(query)
        }
    }

    fn rows(n: u32) -> Vec<Row> {
        (1..=n).map(|i| Row(i, "item")).collect()
    }

    #[test]
    fn test_success_with_zero_items_is_empty_not_error() {
        let mut state = ListingState::<Row>::new();
        state.begin();
        state.complete(Ok(Vec::new()));

        assert_eq!(state.status(), RequestStatus::Success);
        assert!(state.is_empty());
        assert!(state.error().is_none());
        assert_eq!(state.total_pages(), 0);
    }

    #[test]
    fn test_error_keeps_message_and_clears_items() {
        let mut state = ListingState::<Row>::new();
        state.complete(Ok(rows(5)));
        state.begin();
        state.complete(Err(FetchError::network("connection refused")));

        assert_eq!(state.status(), RequestStatus::Error);
        assert!(state.items().is_empty());
        let err = state.error().unwrap();
        assert_eq!(err.kind, FetchErrorKind::Network);
        assert_eq!(err.message, "connection refused");
        // Not the "no results" state
        assert!(!state.is_empty());
    }

    #[test]
    fn test_retry_transitions_error_back_to_loading() {
        let mut state = ListingState::<Row>::new();
        state.complete(Err(FetchError::network("offline")));
        assert_eq!(state.status(), RequestStatus::Error);

        state.begin();
        assert_eq!(state.status(), RequestStatus::Loading);
        assert!(state.error().is_none());
    }

    #[test]
    fn test_replacing_collection_resets_page() {
        let mut state = ListingState::<Row>::new();
        state.complete(Ok(rows(23)));
        assert!(state.set_page(3));

        state.begin();
        state.complete(Ok(rows(23)));
        assert_eq!(state.current_page(), 1);
    }

    #[test]
    fn test_query_narrows_filtered_set_and_resets_page() {
        let mut state = ListingState::<Row>::new();
        let mut items = rows(30);
        items.push(Row(31, "Paracetamol"));
        state.complete(Ok(items));

        assert!(state.set_page(2));
        state.set_query("PARA");
        assert_eq!(state.current_page(), 1);
        assert_eq!(state.filtered().len(), 1);
        assert_eq!(state.visible().len(), 1);
        assert_eq!(state.visible()[0].0, 31);
    }

    #[test]
    fn test_stale_completion_is_discarded() {
        let controller = ListingController::<Row>::new();
        let first = controller.begin_fetch();
        let second = controller.begin_fetch();

        assert!(!controller.complete(first, Ok(rows(3))));
        assert_eq!(controller.read(|s| s.status()), RequestStatus::Loading);

        assert!(controller.complete(second, Ok(rows(7))));
        assert_eq!(controller.read(|s| s.items().len()), 7);
    }

    #[test]
    fn test_latest_token_wins_regardless_of_arrival_order() {
        let controller = ListingController::<Row>::new();
        let first = controller.begin_fetch();
        let second = controller.begin_fetch();

        // Newest response lands first, stale one afterwards
        assert!(controller.complete(second, Ok(rows(7))));
        assert!(!controller.complete(first, Ok(rows(3))));
        assert_eq!(controller.read(|s| s.items().len()), 7);
    }
}
