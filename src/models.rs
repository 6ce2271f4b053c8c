use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::listing::Filterable;
use crate::utils;

/// Fallback shown when a product record carries no category
pub const CATEGORY_FALLBACK: &str = "Generic";
/// Fallback shown for absent quantity/price display fields
pub const FIELD_FALLBACK: &str = "N/A";
/// Local asset used when a blog post's content has no inline image
pub const BLOG_COVER_FALLBACK: &str = "/images/blog-fallback.png";

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Product {
    pub id: u64,
    pub name: String,
    pub company: String,
    pub category: String,
    pub mrp: String,
    pub ptr: String,
    pub qty: String,
}

impl Filterable for Product {
    fn matches(&self, query: &str) -> bool {
        self.name.to_lowercase().contains(query)
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Manufacturer {
    pub id: u64,
    pub name: String,
    pub logo_url: String,
}

impl Manufacturer {
    /// Two-letter stand-in rendered when the logo image fails to load
    pub fn monogram(&self) -> String {
        let letters: String = self.name.chars().take(2).collect();
        if letters.is_empty() {
            "??".to_string()
        } else {
            letters.to_uppercase()
        }
    }
}

impl Filterable for Manufacturer {
    fn matches(&self, query: &str) -> bool {
        self.name.to_lowercase().contains(query)
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GalleryKind {
    #[serde(rename = "image")]
    Image,
    #[serde(rename = "video")]
    Video,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct GalleryItem {
    pub id: u64,
    pub kind: GalleryKind,
    pub title: String,
    pub description: Option<String>,
    /// URL as stored in the CMS (image URL, or the original YouTube link)
    pub source_url: String,
    /// What the page embeds: the image itself, or the muted-autoplay
    /// YouTube embed derived from `source_url`
    pub display_url: String,
    pub created_at: Option<DateTime<Utc>>,
}

impl GalleryItem {
    /// Title with the per-kind fallback applied
    pub fn display_title(&self) -> &str {
        if !self.title.trim().is_empty() {
            return &self.title;
        }
        match self.kind {
            GalleryKind::Image => "Untitled Image",
            GalleryKind::Video => "Untitled Video",
        }
    }

    /// Embed URL for the fullscreen modal. Videos drop the mute flag so the
    /// modal plays with sound; images are unchanged.
    pub fn modal_url(&self) -> String {
        match self.kind {
            GalleryKind::Video => self.display_url.replace("&mute=1", ""),
            GalleryKind::Image => self.display_url.clone(),
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Testimonial {
    pub id: u64,
    pub name: String,
    pub designation: Option<String>,
    pub message: String,
    pub image_url: Option<String>,
    pub rating: u8,
}

/// A customer segment card on the home page ("We Serve")
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Cater {
    pub id: u64,
    pub title: String,
    pub image_url: Option<String>,
    pub icon: Option<String>,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct BlogPost {
    pub id: String,
    pub title: String,
    pub link: String,
    /// Raw HTML body as delivered by the feed
    pub content: String,
    pub published: Option<DateTime<Utc>>,
}

impl BlogPost {
    pub fn display_title(&self) -> &str {
        if self.title.trim().is_empty() {
            "Untitled Post"
        } else {
            &self.title
        }
    }

    /// First inline image of the post body, else the local fallback asset
    pub fn cover_image_url(&self) -> String {
        utils::extract_image_url(&self.content)
            .unwrap_or_else(|| BLOG_COVER_FALLBACK.to_string())
    }

    pub fn snippet(&self, max_len: usize) -> String {
        utils::snippet(&self.content, max_len)
    }
}

/// One `{key, value}` row from the settings endpoint, prior to schema
/// validation (see `settings`)
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct SettingPair {
    pub key: String,
    pub value: String,
}
