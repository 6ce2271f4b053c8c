//! One self-contained listing instance per page of the site. Each owns its
//! own controller state; the API client and settings store are shared,
//! injected collaborators.

pub mod blog;
pub mod company_catalog;
pub mod gallery;
pub mod home;
pub mod partners;
pub mod products;
