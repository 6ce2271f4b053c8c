//! Site settings shared by the navbar, footer, and home page. One
//! read-through cache with in-flight de-duplication replaces the original
//! per-component fetch-and-fold; the `{key, value}` rows are validated
//! against an explicit schema instead of being folded into an untyped map.

use std::sync::Arc;
use std::time::Duration;

use moka::future::Cache;
use serde::Serialize;
use tracing::warn;

use crate::content_api::ContentApiClient;
use crate::fetch_error::FetchError;
use crate::models::SettingPair;

const SETTINGS_CACHE_TTL: Duration = Duration::from_secs(300);

/// Every settings key the site consumes, with its expected value shape.
/// Anything else coming from the CMS is logged and dropped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SettingKey {
    ContactNo,
    Address,
    Email,
    WhatsappNo,
    PlaceOrderUrl,
    ConnectNowUrl,
    FooterText,
    FacebookUrl,
    InstagramUrl,
    LinkedinUrl,
    YoutubeUrl,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ValueShape {
    Text,
    Url,
    Phone,
}

impl SettingKey {
    fn from_name(name: &str) -> Option<Self> {
        match name {
            "contact_no" => Some(Self::ContactNo),
            "address" => Some(Self::Address),
            "email" => Some(Self::Email),
            "whatsapp_no" => Some(Self::WhatsappNo),
            "place_order_url" => Some(Self::PlaceOrderUrl),
            "connect_now_url" => Some(Self::ConnectNowUrl),
            "footer_text" => Some(Self::FooterText),
            "facebook_url" => Some(Self::FacebookUrl),
            "instagram_url" => Some(Self::InstagramUrl),
            "linkedin_url" => Some(Self::LinkedinUrl),
            "youtube_url" => Some(Self::YoutubeUrl),
            _ => None,
        }
    }

    fn shape(&self) -> ValueShape {
        match self {
            Self::ContactNo | Self::WhatsappNo => ValueShape::Phone,
            Self::PlaceOrderUrl
            | Self::ConnectNowUrl
            | Self::FacebookUrl
            | Self::InstagramUrl
            | Self::LinkedinUrl
            | Self::YoutubeUrl => ValueShape::Url,
            Self::Address | Self::Email | Self::FooterText => ValueShape::Text,
        }
    }
}

fn value_fits(shape: ValueShape, value: &str) -> bool {
    let value = value.trim();
    if value.is_empty() {
        return false;
    }
    match shape {
        ValueShape::Text => true,
        ValueShape::Url => {
            value.starts_with("http://") || value.starts_with("https://") || value.starts_with('/')
        }
        ValueShape::Phone => {
            let digits = value.trim_start_matches('+');
            let digits: String = digits.chars().filter(|c| !c.is_whitespace()).collect();
            digits.len() >= 7 && digits.chars().all(|c| c.is_ascii_digit())
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct SiteSettings {
    pub contact_no: Option<String>,
    pub address: Option<String>,
    pub email: Option<String>,
    pub whatsapp_no: Option<String>,
    pub place_order_url: Option<String>,
    pub connect_now_url: Option<String>,
    pub footer_text: Option<String>,
    pub facebook_url: Option<String>,
    pub instagram_url: Option<String>,
    pub linkedin_url: Option<String>,
    pub youtube_url: Option<String>,
}

impl SiteSettings {
    /// Validate and absorb the raw `{key, value}` rows. Later rows win on
    /// duplicate keys, matching the original fold order.
    pub fn from_pairs(pairs: Vec<SettingPair>) -> Self {
        let mut settings = Self::default();
        for pair in pairs {
            let Some(key) = SettingKey::from_name(&pair.key) else {
                warn!("settings: unknown key {:?}, ignoring", pair.key);
                continue;
            };
            if !value_fits(key.shape(), &pair.value) {
                warn!("settings: value for {:?} failed validation, ignoring", pair.key);
                continue;
            }
            let value = Some(pair.value.trim().to_string());
            match key {
                SettingKey::ContactNo => settings.contact_no = value,
                SettingKey::Address => settings.address = value,
                SettingKey::Email => settings.email = value,
                SettingKey::WhatsappNo => settings.whatsapp_no = value,
                SettingKey::PlaceOrderUrl => settings.place_order_url = value,
                SettingKey::ConnectNowUrl => settings.connect_now_url = value,
                SettingKey::FooterText => settings.footer_text = value,
                SettingKey::FacebookUrl => settings.facebook_url = value,
                SettingKey::InstagramUrl => settings.instagram_url = value,
                SettingKey::LinkedinUrl => settings.linkedin_url = value,
                SettingKey::YoutubeUrl => settings.youtube_url = value,
            }
        }
        settings
    }

    /// WhatsApp deep link for the floating chat button (Indian numbers, as
    /// on the original site)
    pub fn whatsapp_link(&self) -> Option<String> {
        self.whatsapp_no
            .as_ref()
            .map(|number| format!("https://wa.me/91{}", number))
    }
}

/// Read-through settings cache injected into every consumer. Concurrent
/// first readers share a single upstream request.
pub struct SettingsStore {
    api: Arc<ContentApiClient>,
    cache: Cache<String, Arc<SiteSettings>>,
}

impl SettingsStore {
    pub fn new(api: Arc<ContentApiClient>) -> Self {
        Self {
            api,
            cache: Cache::builder()
                .time_to_live(SETTINGS_CACHE_TTL)
                .build(),
        }
    }

    pub async fn get(&self) -> Result<Arc<SiteSettings>, FetchError> {
        self.cache
            .try_get_with("site".to_string(), async {
                let pairs = self.api.setting_pairs().await?;
                Ok(Arc::new(SiteSettings::from_pairs(pairs)))
            })
            .await
            .map_err(|e: Arc<FetchError>| (*e).clone())
    }

    pub fn invalidate(&self) {
        self.cache.invalidate_all();
    }
}
