//! The blog index: aggregated feed posts behind the standard listing state
//! machine.

use std::sync::Arc;

use crate::blog_api::BlogFeedClient;
use crate::listing::ListingController;
use crate::models::BlogPost;

pub struct BlogIndex {
    feeds: Arc<BlogFeedClient>,
    listing: ListingController<BlogPost>,
}

impl BlogIndex {
    pub fn new(feeds: Arc<BlogFeedClient>) -> Self {
        Self {
            feeds,
            listing: ListingController::new(),
        }
    }

    pub fn listing(&self) -> &ListingController<BlogPost> {
        &self.listing
    }

    pub async fn load(&self) -> bool {
        let token = self.listing.begin_fetch();
        let result = self.feeds.fetch_posts().await;
        self.listing.complete(token, result)
    }

    pub async fn retry(&self) -> bool {
        self.load().await
    }

    pub fn posts(&self) -> Vec<BlogPost> {
        self.listing.read(|s| s.items().to_vec())
    }
}
