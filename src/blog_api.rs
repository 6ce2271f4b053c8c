//! Aggregator for externally hosted Blogger-style JSON feeds. All
//! configured feeds are fetched in parallel and merged in configuration
//! order; a single failing feed fails the whole aggregate (no partial
//! success).

use std::sync::Arc;

use chrono::{DateTime, Utc};
use futures::future::try_join_all;
use serde::Deserialize;
use tracing::warn;

use crate::content_api::{ContentTransport, HttpTransport};
use crate::fetch_error::FetchError;
use crate::models::BlogPost;

#[derive(Debug, Deserialize)]
struct BloggerDocument {
    feed: Option<FeedBody>,
}

#[derive(Debug, Deserialize)]
struct FeedBody {
    entry: Option<Vec<FeedEntry>>,
}

#[derive(Debug, Deserialize)]
struct FeedEntry {
    id: Option<TextNode>,
    title: Option<TextNode>,
    link: Option<Vec<FeedLink>>,
    content: Option<TextNode>,
    published: Option<TextNode>,
}

/// Blogger wraps every scalar as `{"$t": "..."}`
#[derive(Debug, Deserialize)]
struct TextNode {
    #[serde(rename = "$t")]
    t: String,
}

#[derive(Debug, Deserialize)]
struct FeedLink {
    rel: String,
    href: String,
}

impl FeedEntry {
    fn into_post(self, index: usize) -> Option<BlogPost> {
        let Some(id) = self.id.map(|n| n.t).filter(|id| !id.is_empty()) else {
            warn!("blog feed: entry at index {} has no id, skipping", index);
            return None;
        };

        let link = self
            .link
            .unwrap_or_default()
            .into_iter()
            .find(|l| l.rel == "alternate")
            .map(|l| l.href)
            .unwrap_or_else(|| "#".to_string());

        Some(BlogPost {
            id,
            title: self.title.map(|n| n.t).unwrap_or_default(),
            link,
            content: self.content.map(|n| n.t).unwrap_or_default(),
            published: self
                .published
                .and_then(|n| DateTime::parse_from_rfc3339(&n.t).ok())
                .map(|dt| dt.with_timezone(&Utc)),
        })
    }
}

pub struct BlogFeedClient {
    transport: Arc<dyn ContentTransport>,
    feed_urls: Vec<String>,
}

impl BlogFeedClient {
    pub fn new(feed_urls: Vec<String>) -> Self {
        Self::with_transport(feed_urls, Arc::new(HttpTransport::new()))
    }

    pub fn with_transport(feed_urls: Vec<String>, transport: Arc<dyn ContentTransport>) -> Self {
        Self {
            transport,
            feed_urls,
        }
    }

    /// All posts across the configured feeds, in feed order
    pub async fn fetch_posts(&self) -> Result<Vec<BlogPost>, FetchError> {
        if self.feed_urls.is_empty() {
            return Err(FetchError::config("no blog feeds configured"));
        }

        let fetches = self.feed_urls.iter().map(|url| self.fetch_feed(url));
        let feeds = try_join_all(fetches).await?;
        Ok(feeds.into_iter().flatten().collect())
    }

    async fn fetch_feed(&self, url: &str) -> Result<Vec<BlogPost>, FetchError> {
        let raw = self.transport.get_json(url).await?;
        let document: BloggerDocument = serde_json::from_value(raw)
            .map_err(|e| FetchError::contract(format!("malformed feed document: {}", e)))?;

        let entries = document
            .feed
            .and_then(|f| f.entry)
            .unwrap_or_default();

        Ok(entries
            .into_iter()
            .enumerate()
            .filter_map(|(i, entry)| entry.into_post(i))
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::{json, Value};

    fn entry(id: &str, title: &str) -> Value {
        json!({
            "id": {"$t": id},
            "title": {"$t": title},
            "link": [
                {"rel": "self", "href": "https://blog.example/feeds/1"},
                {"rel": "alternate", "href": "https://blog.example/posts/1"}
            ],
            "content": {"$t": "<p>Cold chain <img src=\"https://cdn.example/truck.jpg\"> update</p>"},
            "published": {"$t": "2025-06-01T10:00:00+05:30"}
        })
    }

    fn parse_entries(doc: Value) -> Vec<BlogPost> {
        let document: BloggerDocument = serde_json::from_value(doc).unwrap();
        document
            .feed
            .and_then(|f| f.entry)
            .unwrap_or_default()
            .into_iter()
            .enumerate()
            .filter_map(|(i, e)| e.into_post(i))
            .collect()
    }

    #[test]
    fn test_entry_maps_alternate_link_and_published() {
        let posts = parse_entries(json!({"feed": {"entry": [entry("post-1", "Cold chain")]}}));
        assert_eq!(posts.len(), 1);
        let post = &posts[0];
        assert_eq!(post.id, "post-1");
        assert_eq!(post.link, "https://blog.example/posts/1");
        assert!(post.published.is_some());
        assert_eq!(post.cover_image_url(), "https://cdn.example/truck.jpg");
    }

    #[test]
    fn test_entry_without_alternate_link_falls_back() {
        let posts = parse_entries(json!({"feed": {"entry": [{
            "id": {"$t": "post-2"},
            "title": {"$t": "No link"},
            "link": [{"rel": "self", "href": "https://blog.example/feeds/2"}],
            "content": {"$t": "<p>text</p>"}
        }]}}));
        assert_eq!(posts[0].link, "#");
        assert!(posts[0].published.is_none());
    }

    #[test]
    fn test_entry_without_id_is_dropped() {
        let posts = parse_entries(json!({"feed": {"entry": [
            {"title": {"$t": "Orphan"}},
            entry("post-3", "Kept")
        ]}}));
        assert_eq!(posts.len(), 1);
        assert_eq!(posts[0].id, "post-3");
    }

    #[test]
    fn test_empty_feed_yields_no_posts() {
        assert!(parse_entries(json!({"feed": {}})).is_empty());
        assert!(parse_entries(json!({})).is_empty());
    }

    #[tokio::test]
    async fn test_no_configured_feeds_is_a_config_error() {
        let client = BlogFeedClient::new(Vec::new());
        let err = client.fetch_posts().await.unwrap_err();
        assert_eq!(err.kind, crate::fetch_error::FetchErrorKind::Config);
    }
}
