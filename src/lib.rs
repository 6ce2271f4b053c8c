pub mod blog_api;
pub mod config;
pub mod content_api;
pub mod debounce;
pub mod fetch_error;
pub mod listing;
pub mod models;
pub mod normalize;
pub mod pages;
pub mod pagination;
pub mod settings;
mod utils;


pub use blog_api::BlogFeedClient;
pub use config::CatalogConfig;
pub use content_api::{ContentApiClient, ContentTransport, HttpTransport, ProductQuery};
pub use debounce::Debouncer;
pub use fetch_error::{FetchError, FetchErrorKind};
pub use listing::{FetchToken, Filterable, ListingController, ListingState, RequestStatus};
pub use pagination::{PageState, DEFAULT_PAGE_SIZE, PAGE_SIZE_OPTIONS};
pub use settings::{SettingsStore, SiteSettings};
