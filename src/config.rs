use std::time::Duration;

use crate::fetch_error::FetchError;

/// Environment variable naming the content API base URL (no trailing slash)
pub const API_BASE_URL_VAR: &str = "CATALOG_API_BASE_URL";
/// Environment variable holding comma-separated blog feed URLs
pub const BLOG_FEEDS_VAR: &str = "CATALOG_BLOG_FEEDS";

/// Delay before a filter keystroke burst is considered settled
pub const DEFAULT_DEBOUNCE: Duration = Duration::from_millis(500);

#[derive(Debug, Clone)]
pub struct CatalogConfig {
    pub api_base_url: String,
    pub blog_feed_urls: Vec<String>,
    pub debounce: Duration,
}

impl CatalogConfig {
    pub fn new(api_base_url: impl Into<String>) -> Self {
        Self {
            api_base_url: trim_base_url(api_base_url.into()),
            blog_feed_urls: Vec::new(),
            debounce: DEFAULT_DEBOUNCE,
        }
    }

    /// Read configuration from the environment. The base URL is required;
    /// feed URLs are optional (the blog page then reports a config error).
    pub fn from_env() -> Result<Self, FetchError> {
        let base = std::env::var(API_BASE_URL_VAR)
            .ok()
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
            .ok_or_else(|| {
                FetchError::config(format!("{} is not set", API_BASE_URL_VAR))
            })?;

        let feeds = std::env::var(BLOG_FEEDS_VAR)
            .map(|v| parse_feed_list(&v))
            .unwrap_or_default();

        Ok(Self {
            api_base_url: trim_base_url(base),
            blog_feed_urls: feeds,
            debounce: DEFAULT_DEBOUNCE,
        })
    }

    pub fn with_blog_feeds(mut self, feeds: Vec<String>) -> Self {
        self.blog_feed_urls = feeds;
        self
    }
}

fn trim_base_url(url: String) -> String {
    url.trim_end_matches('/').to_string()
}

fn parse_feed_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(|u| u.trim())
        .filter(|u| !u.is_empty())
        .map(|u| u.to_string())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_feed_list_trims_and_drops_empties() {
        let feeds = parse_feed_list(" https://a.example/feed , ,https://b.example/feed,");
        assert_eq!(
            feeds,
            vec![
                "https://a.example/feed".to_string(),
                "https://b.example/feed".to_string()
            ]
        );
    }

    #[test]
    fn test_base_url_loses_trailing_slash() {
        let cfg = CatalogConfig::new("https://cms.example.com/api/");
        assert_eq!(cfg.api_base_url, "https://cms.example.com/api");
    }
}
