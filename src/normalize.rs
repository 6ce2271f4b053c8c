//! Mapping of raw CMS records (variable field names, optional fields) onto
//! the stable local shapes in `models`. Records are decoded one at a time so
//! a single malformed row never fails the whole batch; only a missing id
//! drops a record.

use serde::Deserialize;
use serde_json::Value;
use tracing::warn;

use crate::models::{
    Cater, GalleryItem, GalleryKind, Manufacturer, Product, SettingPair, Testimonial,
    CATEGORY_FALLBACK, FIELD_FALLBACK,
};
use crate::utils;

/// Price-like fields arrive as numbers or strings depending on the CMS row.
/// They are presented as-is; no rounding or currency conversion.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum PriceValue {
    Number(f64),
    Text(String),
}

impl PriceValue {
    fn display(&self) -> String {
        match self {
            PriceValue::Number(n) if n.fract() == 0.0 => format!("{}", *n as i64),
            PriceValue::Number(n) => format!("{}", n),
            PriceValue::Text(s) => s.clone(),
        }
    }
}

// Aliases accept our own normalized field names as well, so re-normalizing
// an already-normalized collection is a no-op.
#[derive(Debug, Deserialize)]
struct RawProduct {
    id: Option<u64>,
    #[serde(alias = "name")]
    product_name: Option<String>,
    #[serde(alias = "company")]
    m_name: Option<String>,
    category: Option<String>,
    mrp: Option<PriceValue>,
    ptr: Option<PriceValue>,
    qty: Option<String>,
}

#[derive(Debug, Deserialize)]
struct RawManufacturer {
    #[serde(alias = "id")]
    ma_id: Option<u64>,
    #[serde(alias = "name")]
    m_name: Option<String>,
    #[serde(alias = "logo_url")]
    logo_image: Option<String>,
}

#[derive(Debug, Deserialize)]
struct RawGalleryItem {
    id: Option<u64>,
    #[serde(rename = "type", alias = "kind")]
    kind: Option<GalleryKind>,
    title: Option<String>,
    description: Option<String>,
    #[serde(alias = "source_url")]
    path: Option<String>,
    created_at: Option<String>,
}

#[derive(Debug, Deserialize)]
struct RawTestimonial {
    id: Option<u64>,
    name: Option<String>,
    designation: Option<String>,
    message: Option<String>,
    image_url: Option<String>,
    rating: Option<f64>,
}

#[derive(Debug, Deserialize)]
struct RawCater {
    id: Option<u64>,
    title: Option<String>,
    image_url: Option<String>,
    icon: Option<String>,
}

fn decode<T: serde::de::DeserializeOwned>(endpoint: &str, index: usize, value: Value) -> Option<T> {
    match serde_json::from_value::<T>(value) {
        Ok(raw) => Some(raw),
        Err(e) => {
            warn!("{}: failed to parse record at index {}: {}", endpoint, index, e);
            None
        }
    }
}

fn require_id(endpoint: &str, index: usize, id: Option<u64>) -> Option<u64> {
    if id.is_none() {
        warn!("{}: record at index {} has no id, skipping", endpoint, index);
    }
    id
}

pub fn products(records: Vec<Value>) -> Vec<Product> {
    let mut out = Vec::with_capacity(records.len());
    for (i, val) in records.into_iter().enumerate() {
        let Some(raw) = decode::<RawProduct>("products", i, val) else {
            continue;
        };
        let Some(id) = require_id("products", i, raw.id) else {
            continue;
        };
        out.push(Product {
            id,
            name: raw.product_name.unwrap_or_default(),
            company: raw.m_name.unwrap_or_default(),
            category: raw
                .category
                .filter(|c| !c.is_empty())
                .unwrap_or_else(|| CATEGORY_FALLBACK.to_string()),
            mrp: raw
                .mrp
                .map(|v| v.display())
                .unwrap_or_else(|| FIELD_FALLBACK.to_string()),
            ptr: raw
                .ptr
                .map(|v| v.display())
                .unwrap_or_else(|| FIELD_FALLBACK.to_string()),
            qty: raw
                .qty
                .filter(|q| !q.is_empty())
                .unwrap_or_else(|| FIELD_FALLBACK.to_string()),
        });
    }
    out
}

pub fn manufacturers(records: Vec<Value>) -> Vec<Manufacturer> {
    let mut out = Vec::with_capacity(records.len());
    for (i, val) in records.into_iter().enumerate() {
        let Some(raw) = decode::<RawManufacturer>("manufactures", i, val) else {
            continue;
        };
        let Some(id) = require_id("manufactures", i, raw.ma_id) else {
            continue;
        };
        out.push(Manufacturer {
            id,
            name: raw.m_name.unwrap_or_default(),
            logo_url: raw.logo_image.unwrap_or_default(),
        });
    }
    out
}

pub fn gallery_items(records: Vec<Value>) -> Vec<GalleryItem> {
    let mut out = Vec::with_capacity(records.len());
    for (i, val) in records.into_iter().enumerate() {
        let Some(raw) = decode::<RawGalleryItem>("galleries", i, val) else {
            continue;
        };
        let Some(id) = require_id("galleries", i, raw.id) else {
            continue;
        };
        let kind = raw.kind.unwrap_or(GalleryKind::Image);
        let source_url = raw.path.unwrap_or_default();

        let display_url = match kind {
            GalleryKind::Image => source_url.clone(),
            GalleryKind::Video => match utils::youtube_embed_url(&source_url) {
                Some(embed) => embed,
                None => {
                    // Nothing embeddable to show for this row
                    warn!("galleries: no embeddable video id in {:?}, skipping", source_url);
                    continue;
                }
            },
        };

        out.push(GalleryItem {
            id,
            kind,
            title: raw.title.unwrap_or_default(),
            description: raw.description.filter(|d| !d.is_empty()),
            source_url,
            display_url,
            created_at: raw
                .created_at
                .and_then(|s| chrono::DateTime::parse_from_rfc3339(&s).ok())
                .map(|dt| dt.with_timezone(&chrono::Utc)),
        });
    }
    out
}

pub fn testimonials(records: Vec<Value>) -> Vec<Testimonial> {
    let mut out = Vec::with_capacity(records.len());
    for (i, val) in records.into_iter().enumerate() {
        let Some(raw) = decode::<RawTestimonial>("testimonials", i, val) else {
            continue;
        };
        let Some(id) = require_id("testimonials", i, raw.id) else {
            continue;
        };
        out.push(Testimonial {
            id,
            name: raw.name.unwrap_or_default(),
            designation: raw.designation.filter(|d| !d.is_empty()),
            message: raw.message.unwrap_or_default(),
            image_url: raw.image_url.filter(|u| !u.is_empty()),
            rating: raw.rating.map(|r| r.clamp(0.0, 5.0) as u8).unwrap_or(0),
        });
    }
    out
}

pub fn caters(records: Vec<Value>) -> Vec<Cater> {
    let mut out = Vec::with_capacity(records.len());
    for (i, val) in records.into_iter().enumerate() {
        let Some(raw) = decode::<RawCater>("caters", i, val) else {
            continue;
        };
        let Some(id) = require_id("caters", i, raw.id) else {
            continue;
        };
        out.push(Cater {
            id,
            title: raw.title.unwrap_or_default(),
            image_url: raw.image_url.filter(|u| !u.is_empty()),
            icon: raw.icon.filter(|s| !s.is_empty()),
        });
    }
    out
}

pub fn setting_pairs(records: Vec<Value>) -> Vec<SettingPair> {
    let mut out = Vec::with_capacity(records.len());
    for (i, val) in records.into_iter().enumerate() {
        let Some(pair) = decode::<SettingPair>("settings", i, val) else {
            continue;
        };
        out.push(pair);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_product_fallbacks_applied() {
        let raw = vec![json!({
            "id": 7,
            "product_name": "Paracetamol 500mg",
            "m_name": "Sunrise Remedies"
        })];
        let products = products(raw);
        assert_eq!(products.len(), 1);
        let p = &products[0];
        assert_eq!(p.category, "Generic");
        assert_eq!(p.qty, "N/A");
        assert_eq!(p.mrp, "N/A");
        assert_eq!(p.ptr, "N/A");
    }

    #[test]
    fn test_product_missing_id_is_skipped_not_fatal() {
        let raw = vec![
            json!({"product_name": "No Id Tonic", "m_name": "X"}),
            json!({"id": 2, "product_name": "Kept", "m_name": "Y"}),
        ];
        let products = products(raw);
        assert_eq!(products.len(), 1);
        assert_eq!(products[0].id, 2);
    }

    #[test]
    fn test_price_values_render_numbers_and_strings_alike() {
        let raw = vec![json!({
            "id": 1,
            "product_name": "Syrup",
            "m_name": "Acme",
            "mrp": 120,
            "ptr": "98.50"
        })];
        let p = &products(raw)[0];
        assert_eq!(p.mrp, "120");
        assert_eq!(p.ptr, "98.50");

        let raw = vec![json!({"id": 1, "product_name": "Syrup", "m_name": "Acme", "mrp": 45.5})];
        assert_eq!(products(raw)[0].mrp, "45.5");
    }

    #[test]
    fn test_normalization_is_idempotent() {
        let raw = vec![json!({
            "id": 9,
            "product_name": "Amoxicillin",
            "m_name": "Acme Pharma",
            "mrp": 99,
            "ptr": 80.5,
            "qty": "10x10"
        })];
        let first = products(raw);
        let round_tripped: Vec<Value> = first
            .iter()
            .map(|p| serde_json::to_value(p).unwrap())
            .collect();
        let second = products(round_tripped);
        assert_eq!(first, second);
    }

    #[test]
    fn test_manufacturer_field_names_mapped() {
        let raw = vec![json!({
            "ma_id": 4,
            "m_name": "Helix Biotech",
            "logo_image": "https://cdn.example/helix.png"
        })];
        let companies = manufacturers(raw);
        assert_eq!(companies[0].id, 4);
        assert_eq!(companies[0].name, "Helix Biotech");
        assert_eq!(companies[0].logo_url, "https://cdn.example/helix.png");
    }

    #[test]
    fn test_gallery_video_without_embeddable_url_is_dropped() {
        let raw = vec![
            json!({"id": 1, "type": "video", "title": "Broken", "path": "https://example.com/clip"}),
            json!({"id": 2, "type": "video", "title": "Tour", "path": "https://youtu.be/dQw4w9WgXcQ"}),
            json!({"id": 3, "type": "image", "title": "Depot", "path": "https://cdn.example/depot.jpg"}),
        ];
        let items = gallery_items(raw);
        assert_eq!(items.len(), 2);
        assert_eq!(items[0].id, 2);
        assert!(items[0].display_url.contains("youtube.com/embed/dQw4w9WgXcQ"));
        assert_eq!(items[1].display_url, "https://cdn.example/depot.jpg");
    }

    #[test]
    fn test_gallery_created_at_parsed_when_valid() {
        let raw = vec![json!({
            "id": 1,
            "type": "image",
            "path": "https://cdn.example/a.jpg",
            "created_at": "2025-03-14T09:30:00+05:30"
        })];
        let items = gallery_items(raw);
        assert!(items[0].created_at.is_some());

        let raw = vec![json!({
            "id": 2,
            "type": "image",
            "path": "https://cdn.example/b.jpg",
            "created_at": "last tuesday"
        })];
        assert!(gallery_items(raw)[0].created_at.is_none());
    }
}
