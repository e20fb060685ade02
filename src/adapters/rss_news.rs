//! Headlines from an RSS feed relayed as JSON by rss2json.
//!
//! Payload: `{"status":"ok","items":[{"title","description","content","link","author","pubDate"}]}`.

use async_trait::async_trait;
use chrono::{DateTime, NaiveDateTime};
use log::debug;
use reqwest::Client;
use serde::Deserialize;

use super::http::{build_client, get_text, parse_json};
use crate::domain::error::FinsightError;
use crate::domain::news::NewsArticle;
use crate::ports::news_port::NewsPort;

pub const DEFAULT_FEED_URL: &str = "https://api.rss2json.com/v1/api.json?rss_url=https://feeds.marketwatch.com/marketwatch/realtimeheadlines/";
const PROVIDER_ID: &str = "RSS2JSON";
const DEFAULT_SOURCE: &str = "Financial News";

#[derive(Debug, Deserialize)]
struct FeedResponse {
    status: String,
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    items: Vec<FeedItem>,
}

#[derive(Debug, Deserialize)]
struct FeedItem {
    #[serde(default)]
    title: String,
    #[serde(default)]
    description: String,
    #[serde(default)]
    content: String,
    #[serde(default)]
    link: String,
    #[serde(default)]
    author: String,
    #[serde(default, rename = "pubDate")]
    pub_date: String,
}

/// Accepts "2024-03-05 14:30:00" as well as RFC 3339.
fn parse_pub_date(text: &str) -> Option<i64> {
    let text = text.trim();
    if text.is_empty() {
        return None;
    }
    if text.contains('T') {
        return DateTime::parse_from_rfc3339(text)
            .ok()
            .map(|dt| dt.timestamp());
    }
    text.get(..19)
        .and_then(|s| NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S").ok())
        .map(|dt| dt.and_utc().timestamp())
}

pub fn parse_feed_payload(body: &str) -> Result<Vec<NewsArticle>, FinsightError> {
    let feed: FeedResponse = parse_json(PROVIDER_ID, body)?;
    if feed.status != "ok" {
        return Err(FinsightError::Provider {
            provider: PROVIDER_ID.to_string(),
            reason: feed
                .message
                .unwrap_or_else(|| format!("feed status '{}'", feed.status)),
        });
    }

    Ok(feed
        .items
        .into_iter()
        .map(|item| {
            let summary = if item.description.trim().is_empty() {
                item.content
            } else {
                item.description
            };
            let source = if item.author.trim().is_empty() {
                DEFAULT_SOURCE.to_string()
            } else {
                item.author
            };
            NewsArticle {
                headline: item.title,
                summary,
                url: item.link,
                source,
                published_at: parse_pub_date(&item.pub_date),
                extra: Default::default(),
            }
        })
        .collect())
}

pub struct Rss2JsonNewsAdapter {
    client: Client,
    feed_url: String,
}

impl Rss2JsonNewsAdapter {
    pub fn new(feed_url: &str, timeout_secs: u64) -> Self {
        Self {
            client: build_client(timeout_secs),
            feed_url: feed_url.to_string(),
        }
    }
}

#[async_trait]
impl NewsPort for Rss2JsonNewsAdapter {
    /// A feed has a single category; the argument is ignored.
    async fn fetch_news(&self, _category: &str) -> Result<Vec<NewsArticle>, FinsightError> {
        let body = get_text(&self.client, PROVIDER_ID, &self.feed_url, &[], &[]).await?;
        let articles = parse_feed_payload(&body)?;
        debug!("{} feed items from {PROVIDER_ID}", articles.len());
        Ok(articles)
    }
}
