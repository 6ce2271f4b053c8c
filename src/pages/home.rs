//! Home page content: the "We Serve" cards, the testimonial strip, and the
//! shared site settings. The sections are independent listings fetched
//! concurrently; one failing must not take down the others.

use std::sync::Arc;

use crate::content_api::ContentApiClient;
use crate::fetch_error::FetchError;
use crate::listing::ListingController;
use crate::models::{Cater, Testimonial};
use crate::settings::{SettingsStore, SiteSettings};

pub struct HomeContent {
    api: Arc<ContentApiClient>,
    settings: Arc<SettingsStore>,
    caters: ListingController<Cater>,
    testimonials: ListingController<Testimonial>,
}

impl HomeContent {
    pub fn new(api: Arc<ContentApiClient>, settings: Arc<SettingsStore>) -> Self {
        Self {
            api,
            settings,
            caters: ListingController::new(),
            testimonials: ListingController::new(),
        }
    }

    pub fn caters(&self) -> &ListingController<Cater> {
        &self.caters
    }

    pub fn testimonials(&self) -> &ListingController<Testimonial> {
        &self.testimonials
    }

    /// Fetch both strips concurrently; each section settles on its own
    /// outcome.
    pub async fn load(&self) {
        let cater_token = self.caters.begin_fetch();
        let testimonial_token = self.testimonials.begin_fetch();

        let (caters, testimonials) =
            tokio::join!(self.api.caters(), self.api.testimonials());

        self.caters.complete(cater_token, caters);
        self.testimonials.complete(testimonial_token, testimonials);
    }

    /// Shared settings via the injected read-through store
    pub async fn settings(&self) -> Result<Arc<SiteSettings>, FetchError> {
        self.settings.get().await
    }
}
