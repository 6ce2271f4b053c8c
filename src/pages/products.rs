//! The all-products page: two debounced free-text filters feeding a
//! server-side filtered search. Every settled filter change re-issues the
//! fetch; the listing token guard keeps late responses from clobbering
//! newer results.

use std::sync::Arc;
use std::time::Duration;

use crate::content_api::{ContentApiClient, ProductQuery};
use crate::debounce::Debouncer;
use crate::listing::ListingController;
use crate::models::Product;

pub struct ProductDirectory {
    api: Arc<ContentApiClient>,
    listing: ListingController<Product>,
    name_filter: Debouncer,
    company_filter: Debouncer,
}

impl ProductDirectory {
    pub fn new(api: Arc<ContentApiClient>, debounce: Duration) -> Self {
        Self {
            api,
            listing: ListingController::new(),
            name_filter: Debouncer::new(debounce),
            company_filter: Debouncer::new(debounce),
        }
    }

    pub fn listing(&self) -> &ListingController<Product> {
        &self.listing
    }

    /// Keystroke in the "search by medicine" box
    pub fn type_product_name(&self, input: &str) {
        self.name_filter.input(input);
    }

    /// Keystroke in the "search by company" box
    pub fn type_company_name(&self, input: &str) {
        self.company_filter.input(input);
    }

    /// The filter payload as of the last settled values
    pub fn current_query(&self) -> ProductQuery {
        ProductQuery {
            product_name: self.name_filter.settled(),
            company_name: self.company_filter.settled(),
        }
    }

    /// Fetch with the current settled filters. Returns false when the
    /// result was discarded as stale.
    pub async fn refresh(&self) -> bool {
        let query = self.current_query();
        let token = self.listing.begin_fetch();
        let result = self.api.search_products(&query).await;
        self.listing.complete(token, result)
    }

    /// The error-state retry affordance: re-issues the identical request
    /// with the same settled filters
    pub async fn retry(&self) -> bool {
        self.refresh().await
    }

    /// Background loop re-fetching whenever either filter settles. Holds
    /// only a weak handle, so dropping the page stops the loop; abort the
    /// returned handle to stop it earlier.
    pub fn spawn_filter_watcher(self: Arc<Self>) -> tokio::task::JoinHandle<()> {
        let mut names = self.name_filter.subscribe();
        let mut companies = self.company_filter.subscribe();
        let page = Arc::downgrade(&self);

        tokio::spawn(async move {
            loop {
                let changed = tokio::select! {
                    changed = names.changed() => changed,
                    changed = companies.changed() => changed,
                };
                if changed.is_err() {
                    return;
                }
                let Some(page) = page.upgrade() else {
                    return;
                };
                page.refresh().await;
            }
        })
    }
}
