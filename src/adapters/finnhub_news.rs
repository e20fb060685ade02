//! Market news from Finnhub's `/news` endpoint.
//!
//! The API key travels in the `X-Finnhub-Token` header rather than the query.

use async_trait::async_trait;
use log::debug;
use reqwest::Client;

use super::http::{build_client, get_text, parse_json};
use crate::domain::error::FinsightError;
use crate::domain::news::NewsArticle;
use crate::ports::news_port::NewsPort;

pub const DEFAULT_BASE_URL: &str = "https://finnhub.io/api/v1";
const PROVIDER_ID: &str = "FINNHUB";

pub fn parse_news_payload(body: &str) -> Result<Vec<NewsArticle>, FinsightError> {
    parse_json(PROVIDER_ID, body)
}

pub struct FinnhubNewsAdapter {
    client: Client,
    base_url: String,
    api_key: String,
}

impl FinnhubNewsAdapter {
    pub fn new(base_url: &str, api_key: String, timeout_secs: u64) -> Self {
        Self {
            client: build_client(timeout_secs),
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key,
        }
    }
}

#[async_trait]
impl NewsPort for FinnhubNewsAdapter {
    async fn fetch_news(&self, category: &str) -> Result<Vec<NewsArticle>, FinsightError> {
        let url = format!("{}/news", self.base_url);
        let body = get_text(
            &self.client,
            PROVIDER_ID,
            &url,
            &[("category", category)],
            &[("X-Finnhub-Token", self.api_key.as_str())],
        )
        .await?;
        let articles = parse_news_payload(&body)?;
        debug!("{} {category} articles from {PROVIDER_ID}", articles.len());
        Ok(articles)
    }
}
