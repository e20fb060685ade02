#![allow(dead_code)]

use async_trait::async_trait;
use chrono::NaiveDate;
use finsight::domain::currency::RateTable;
use finsight::domain::error::FinsightError;
use finsight::domain::news::NewsArticle;
use finsight::domain::quote::PricePoint;
use finsight::ports::news_port::NewsPort;
use finsight::ports::quote_port::QuotePort;
use finsight::ports::rate_port::RatePort;
use std::collections::HashMap;
use std::sync::Mutex;

pub struct MockQuotePort {
    pub data: HashMap<String, Vec<PricePoint>>,
    pub errors: HashMap<String, String>,
    pub calls: Mutex<Vec<String>>,
}

impl MockQuotePort {
    pub fn new() -> Self {
        Self {
            data: HashMap::new(),
            errors: HashMap::new(),
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn with_closes(mut self, symbol: &str, closes: &[f64]) -> Self {
        self.data
            .insert(symbol.to_string(), generate_closes("2024-03-01", closes));
        self
    }

    pub fn with_error(mut self, symbol: &str, reason: &str) -> Self {
        self.errors.insert(symbol.to_string(), reason.to_string());
        self
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }
}

#[async_trait]
impl QuotePort for MockQuotePort {
    async fn daily_closes(&self, symbol: &str, _days: u32) -> Result<Vec<PricePoint>, FinsightError> {
        self.calls.lock().unwrap().push(symbol.to_string());
        if let Some(reason) = self.errors.get(symbol) {
            return Err(FinsightError::Provider {
                provider: "MOCK".to_string(),
                reason: reason.clone(),
            });
        }
        Ok(self.data.get(symbol).cloned().unwrap_or_default())
    }
}

pub enum NewsBehaviour {
    Articles(Vec<NewsArticle>),
    Status(u16),
    Transport(String),
}

pub struct MockNewsPort {
    pub behaviour: NewsBehaviour,
    pub categories: Mutex<Vec<String>>,
}

impl MockNewsPort {
    pub fn with_articles(articles: Vec<NewsArticle>) -> Self {
        Self {
            behaviour: NewsBehaviour::Articles(articles),
            categories: Mutex::new(Vec::new()),
        }
    }

    pub fn with_status(status: u16) -> Self {
        Self {
            behaviour: NewsBehaviour::Status(status),
            categories: Mutex::new(Vec::new()),
        }
    }

    pub fn with_transport_error(reason: &str) -> Self {
        Self {
            behaviour: NewsBehaviour::Transport(reason.to_string()),
            categories: Mutex::new(Vec::new()),
        }
    }

    pub fn requested_categories(&self) -> Vec<String> {
        self.categories.lock().unwrap().clone()
    }
}

#[async_trait]
impl NewsPort for MockNewsPort {
    async fn fetch_news(&self, category: &str) -> Result<Vec<NewsArticle>, FinsightError> {
        self.categories.lock().unwrap().push(category.to_string());
        match &self.behaviour {
            NewsBehaviour::Articles(articles) => Ok(articles.clone()),
            NewsBehaviour::Status(status) => Err(FinsightError::Upstream {
                provider: "MOCK".to_string(),
                status: *status,
            }),
            NewsBehaviour::Transport(reason) => Err(FinsightError::Provider {
                provider: "MOCK".to_string(),
                reason: reason.clone(),
            }),
        }
    }
}

pub struct MockRatePort {
    pub table: Option<RateTable>,
}

#[async_trait]
impl RatePort for MockRatePort {
    async fn latest_rates(&self, pivot: &str) -> Result<RateTable, FinsightError> {
        match &self.table {
            Some(table) => table.rebased(pivot),
            None => Err(FinsightError::Timeout {
                provider: "MOCK".to_string(),
            }),
        }
    }
}

pub fn generate_closes(start: &str, closes: &[f64]) -> Vec<PricePoint> {
    let start = NaiveDate::parse_from_str(start, "%Y-%m-%d").unwrap();
    closes
        .iter()
        .enumerate()
        .map(|(i, &close)| PricePoint {
            date: start + chrono::Days::new(i as u64),
            close,
        })
        .collect()
}

pub fn make_article(i: usize) -> NewsArticle {
    NewsArticle {
        headline: format!("Headline {i}"),
        summary: format!("<p>Summary {i}</p>"),
        url: format!("https://news.example/{i}"),
        source: "Reuters".to_string(),
        published_at: Some(1_709_649_000 + i as i64),
        extra: Default::default(),
    }
}

pub fn usd_table() -> RateTable {
    RateTable::new(
        "USD",
        [
            ("EUR".to_string(), 0.85),
            ("INR".to_string(), 83.2),
            ("JPY".to_string(), 110.0),
        ],
    )
    .unwrap()
}
