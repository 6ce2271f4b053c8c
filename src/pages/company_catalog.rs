//! A single manufacturer's product catalog: one fetch per company, then
//! local name search and client-side pagination over the materialized set.

use std::sync::{Arc, Mutex};

use crate::content_api::ContentApiClient;
use crate::listing::ListingController;
use crate::models::Product;

const HEADING_FALLBACK: &str = "Selected Manufacturer";

pub struct CompanyCatalog {
    api: Arc<ContentApiClient>,
    slug: String,
    listing: ListingController<Product>,
    company_name: Mutex<Option<String>>,
}

impl CompanyCatalog {
    pub fn new(api: Arc<ContentApiClient>, slug: impl Into<String>) -> Self {
        Self {
            api,
            slug: slug.into(),
            listing: ListingController::new(),
            company_name: Mutex::new(None),
        }
    }

    pub fn listing(&self) -> &ListingController<Product> {
        &self.listing
    }

    pub async fn load(&self) -> bool {
        let token = self.listing.begin_fetch();
        let result = self.api.manufacturer_products(&self.slug).await;

        if let Ok(products) = &result {
            // The records carry the display name; an empty catalog keeps
            // the generic heading
            *self.company_name.lock().unwrap() = products.first().map(|p| p.company.clone());
        }
        self.listing.complete(token, result)
    }

    pub async fn retry(&self) -> bool {
        self.load().await
    }

    /// "Products by {company}" heading source
    pub fn company_name(&self) -> String {
        self.company_name
            .lock()
            .unwrap()
            .clone()
            .unwrap_or_else(|| HEADING_FALLBACK.to_string())
    }

    pub fn search(&self, term: &str) {
        self.listing.update(|s| s.set_query(term));
    }

    pub fn set_page(&self, page: usize) -> bool {
        self.listing.update(|s| s.set_page(page))
    }

    pub fn set_items_per_page(&self, size: usize) -> bool {
        self.listing.update(|s| s.set_items_per_page(size))
    }

    pub fn current_page(&self) -> usize {
        self.listing.read(|s| s.current_page())
    }

    pub fn total_pages(&self) -> usize {
        self.listing.read(|s| s.total_pages())
    }

    /// The rows visible on the current page of the filtered catalog
    pub fn visible(&self) -> Vec<Product> {
        self.listing
            .read(|s| s.visible().into_iter().cloned().collect())
    }
}
