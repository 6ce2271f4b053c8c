use once_cell::sync::Lazy;
use regex::Regex;

static IMG_SRC_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"<img[^>]+src="([^">]+)""#).unwrap());

static HTML_TAG_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"<[^>]*>").unwrap());

static WHITESPACE_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").unwrap());

// Matches the watch/share/embed URL shapes YouTube hands out and captures
// the 11-character video id.
static YOUTUBE_ID_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^.*(?:youtu\.be/|v/|u/\w/|embed/|watch\?v=|&v=)([^#&?]*).*$").unwrap()
});

/// First `<img src>` URL inside an HTML fragment, if any
pub fn extract_image_url(html: &str) -> Option<String> {
    IMG_SRC_RE
        .captures(html)
        .and_then(|c| c.get(1))
        .map(|m| m.as_str().to_string())
}

/// Plain-text preview of an HTML fragment: tags stripped, whitespace
/// collapsed, truncated on a char boundary with a trailing ellipsis.
pub fn snippet(html: &str, max_len: usize) -> String {
    let no_tags = HTML_TAG_RE.replace_all(html, "");
    let plain = WHITESPACE_RE.replace_all(&no_tags, " ");
    let plain = plain.trim();

    if plain.chars().count() <= max_len {
        return plain.to_string();
    }
    let truncated: String = plain.chars().take(max_len).collect();
    format!("{}...", truncated)
}

/// Muted-autoplay embed URL for the gallery grid, derived from any of the
/// usual YouTube URL forms. Returns None when no 11-char id can be found.
pub fn youtube_embed_url(url: &str) -> Option<String> {
    let id = YOUTUBE_ID_RE
        .captures(url)
        .and_then(|c| c.get(1))
        .map(|m| m.as_str())?;

    if id.len() != 11 {
        return None;
    }
    Some(format!(
        "https://www.youtube.com/embed/{}?autoplay=1&mute=1&rel=0",
        id
    ))
}
