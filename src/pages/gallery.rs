//! The gallery page: one fetch, then an images/videos toggle over the
//! materialized collection.

use std::sync::{Arc, Mutex};

use crate::content_api::ContentApiClient;
use crate::listing::ListingController;
use crate::models::{GalleryItem, GalleryKind};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GalleryFilter {
    All,
    Images,
    Videos,
}

impl GalleryFilter {
    fn admits(&self, kind: GalleryKind) -> bool {
        match self {
            GalleryFilter::All => true,
            GalleryFilter::Images => kind == GalleryKind::Image,
            GalleryFilter::Videos => kind == GalleryKind::Video,
        }
    }
}

pub struct GalleryPage {
    api: Arc<ContentApiClient>,
    listing: ListingController<GalleryItem>,
    filter: Mutex<GalleryFilter>,
}

impl GalleryPage {
    pub fn new(api: Arc<ContentApiClient>) -> Self {
        Self {
            api,
            listing: ListingController::new(),
            filter: Mutex::new(GalleryFilter::All),
        }
    }

    pub fn listing(&self) -> &ListingController<GalleryItem> {
        &self.listing
    }

    pub async fn load(&self) -> bool {
        let token = self.listing.begin_fetch();
        let result = self.api.gallery_items().await;
        self.listing.complete(token, result)
    }

    pub async fn retry(&self) -> bool {
        self.load().await
    }

    pub fn set_filter(&self, filter: GalleryFilter) {
        *self.filter.lock().unwrap() = filter;
    }

    pub fn filter(&self) -> GalleryFilter {
        *self.filter.lock().unwrap()
    }

    /// Items admitted by the current toggle
    pub fn visible(&self) -> Vec<GalleryItem> {
        let filter = self.filter();
        self.listing.read(|s| {
            s.items()
                .iter()
                .filter(|item| filter.admits(item.kind))
                .cloned()
                .collect()
        })
    }

    /// Success with nothing admitted by the toggle ("no items for this
    /// filter"), distinct from an empty fetch
    pub fn filter_is_empty(&self) -> bool {
        self.listing
            .read(|s| s.status() == crate::listing::RequestStatus::Success)
            && self.visible().is_empty()
    }
}
