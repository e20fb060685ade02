//! Financial news records and their display cleanup.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

pub const HEADLINE_DISPLAY_CHARS: usize = 100;
pub const SUMMARY_DISPLAY_CHARS: usize = 200;
/// Articles relayed per `/news` request.
pub const PROXY_ARTICLE_LIMIT: usize = 5;
pub const EMPTY_SUMMARY_TEXT: &str = "Click to read full article...";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewsArticle {
    pub headline: String,
    #[serde(default)]
    pub summary: String,
    #[serde(default)]
    pub url: String,
    #[serde(default)]
    pub source: String,
    /// Unix seconds, as published by the upstream feed.
    #[serde(default, rename = "datetime", skip_serializing_if = "Option::is_none")]
    pub published_at: Option<i64>,
    /// Upstream fields with no typed counterpart (`id`, `image`, `category`, `related`).
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl NewsArticle {
    pub fn published(&self) -> Option<DateTime<Utc>> {
        self.published_at
            .and_then(|secs| DateTime::<Utc>::from_timestamp(secs, 0))
    }

    /// Copy with the headline and summary shortened for a news card.
    pub fn for_display(&self) -> NewsArticle {
        let summary = clean_summary(&self.summary);
        NewsArticle {
            headline: truncate_ellipsis(self.headline.trim(), HEADLINE_DISPLAY_CHARS),
            summary: if summary.is_empty() {
                EMPTY_SUMMARY_TEXT.to_string()
            } else {
                truncate_ellipsis(&summary, SUMMARY_DISPLAY_CHARS)
            },
            url: self.url.clone(),
            source: self.source.clone(),
            published_at: self.published_at,
            extra: self.extra.clone(),
        }
    }
}

/// First `limit` articles in upstream order.
pub fn take_top(mut articles: Vec<NewsArticle>, limit: usize) -> Vec<NewsArticle> {
    articles.truncate(limit);
    articles
}

/// Strip HTML tags and collapse runs of whitespace.
pub fn clean_summary(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut in_tag = false;
    for c in text.chars() {
        match c {
            '<' => in_tag = true,
            '>' if in_tag => in_tag = false,
            _ if !in_tag => out.push(c),
            _ => {}
        }
    }
    out.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Keep at most `max_chars` characters, appending "..." when cut.
pub fn truncate_ellipsis(text: &str, max_chars: usize) -> String {
    match text.char_indices().nth(max_chars) {
        Some((byte_idx, _)) => format!("{}...", &text[..byte_idx]),
        None => text.to_string(),
    }
}

/// "Mar 05, 2024 • 02:30 PM"
pub fn format_published(at: &DateTime<Utc>) -> String {
    at.format("%b %d, %Y • %I:%M %p").to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn article(headline: &str, summary: &str) -> NewsArticle {
        NewsArticle {
            headline: headline.to_string(),
            summary: summary.to_string(),
            url: "https://example.com/a".to_string(),
            source: "Reuters".to_string(),
            published_at: Some(1_709_649_000),
            extra: Map::new(),
        }
    }

    #[test]
    fn take_top_preserves_order() {
        let articles: Vec<NewsArticle> = (0..8).map(|i| article(&format!("h{i}"), "")).collect();
        let top = take_top(articles, 5);
        let headlines: Vec<&str> = top.iter().map(|a| a.headline.as_str()).collect();
        assert_eq!(headlines, vec!["h0", "h1", "h2", "h3", "h4"]);
    }

    #[test]
    fn take_top_with_fewer_articles() {
        let top = take_top(vec![article("only", "")], 5);
        assert_eq!(top.len(), 1);
    }

    #[test]
    fn clean_summary_strips_tags() {
        let cleaned = clean_summary("<p>Stocks <b>rally</b>\n as   rates fall</p>");
        assert_eq!(cleaned, "Stocks rally as rates fall");
    }

    #[test]
    fn truncate_respects_char_boundaries() {
        assert_eq!(truncate_ellipsis("₹₹₹₹", 2), "₹₹...");
        assert_eq!(truncate_ellipsis("short", 10), "short");
        assert_eq!(truncate_ellipsis("exact", 5), "exact");
    }

    #[test]
    fn display_copy_shortens_long_text() {
        let long = "x".repeat(250);
        let shown = article(&long, &long).for_display();
        assert_eq!(shown.headline.chars().count(), HEADLINE_DISPLAY_CHARS + 3);
        assert_eq!(shown.summary.chars().count(), SUMMARY_DISPLAY_CHARS + 3);
    }

    #[test]
    fn display_copy_fills_empty_summary() {
        let shown = article("Markets", "<br/>").for_display();
        assert_eq!(shown.summary, EMPTY_SUMMARY_TEXT);
    }

    #[test]
    fn deserializes_upstream_record() {
        let json = r#"{"category":"top news","datetime":1709649000,"headline":"Fed holds",
            "id":1,"image":"","related":"","source":"CNBC","summary":"Rates unchanged","url":"https://x"}"#;
        let parsed: NewsArticle = serde_json::from_str(json).unwrap();
        assert_eq!(parsed.headline, "Fed holds");
        assert_eq!(parsed.source, "CNBC");
        assert_eq!(parsed.published_at, Some(1_709_649_000));
        assert_eq!(parsed.extra["id"], 1);
        assert_eq!(parsed.extra["category"], "top news");
        assert!(!parsed.extra.contains_key("headline"));
    }

    #[test]
    fn reserializes_untyped_upstream_fields() {
        let json = r#"{"datetime":1709649000,"headline":"Fed holds","id":7,
            "image":"https://img","related":"AAPL","source":"CNBC","summary":"s","url":"https://x"}"#;
        let parsed: NewsArticle = serde_json::from_str(json).unwrap();
        let value = serde_json::to_value(parsed.for_display()).unwrap();
        assert_eq!(value["image"], "https://img");
        assert_eq!(value["id"], 7);
        assert_eq!(value["related"], "AAPL");
        assert_eq!(value["datetime"], 1_709_649_000);
    }

    #[test]
    fn formats_publication_time() {
        let at = DateTime::<Utc>::from_timestamp(1_709_649_000, 0).unwrap();
        assert_eq!(format_published(&at), "Mar 05, 2024 • 02:30 PM");
    }
}
