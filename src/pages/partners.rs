//! The "We Deal With" partner directory: the shared manufacturer list with
//! a local name search. No pagination here; the grid shows every match.

use std::sync::Arc;

use crate::content_api::ContentApiClient;
use crate::listing::ListingController;
use crate::models::Manufacturer;

pub struct PartnerDirectory {
    api: Arc<ContentApiClient>,
    listing: ListingController<Manufacturer>,
}

impl PartnerDirectory {
    pub fn new(api: Arc<ContentApiClient>) -> Self {
        Self {
            api,
            listing: ListingController::new(),
        }
    }

    pub fn listing(&self) -> &ListingController<Manufacturer> {
        &self.listing
    }

    pub async fn load(&self) -> bool {
        let token = self.listing.begin_fetch();
        let result = self
            .api
            .manufacturers()
            .await
            .map(|shared| (*shared).clone());
        self.listing.complete(token, result)
    }

    pub async fn retry(&self) -> bool {
        self.load().await
    }

    pub fn search(&self, term: &str) {
        self.listing.update(|s| s.set_query(term));
    }

    /// Every partner matching the current search term
    pub fn matches(&self) -> Vec<Manufacturer> {
        self.listing
            .read(|s| s.filtered().into_iter().cloned().collect())
    }
}
