//! Daily closes from the Yahoo Finance chart endpoint.
//!
//! `GET {base}/v8/finance/chart/{symbol}?period1=..&period2=..&interval=1d`
//! returns parallel `timestamp` and `indicators.quote[0].close` arrays;
//! closes are null on days without a print.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use log::debug;
use reqwest::Client;
use serde::Deserialize;

use super::http::{build_client, get_text, parse_json};
use crate::domain::error::FinsightError;
use crate::domain::quote::PricePoint;
use crate::ports::quote_port::QuotePort;

pub const DEFAULT_BASE_URL: &str = "https://query1.finance.yahoo.com";
const PROVIDER_ID: &str = "YAHOO";
const SECONDS_PER_DAY: i64 = 86_400;

#[derive(Debug, Deserialize)]
struct ChartEnvelope {
    chart: Chart,
}

#[derive(Debug, Deserialize)]
struct Chart {
    #[serde(default)]
    result: Option<Vec<ChartResult>>,
    #[serde(default)]
    error: Option<ChartError>,
}

#[derive(Debug, Deserialize)]
struct ChartError {
    #[serde(default)]
    description: String,
}

#[derive(Debug, Deserialize)]
struct ChartResult {
    #[serde(default)]
    timestamp: Vec<i64>,
    indicators: Indicators,
}

#[derive(Debug, Deserialize)]
struct Indicators {
    #[serde(default)]
    quote: Vec<QuoteSeries>,
}

#[derive(Debug, Deserialize)]
struct QuoteSeries {
    #[serde(default)]
    close: Vec<Option<f64>>,
}

/// Extract ascending daily closes, skipping null prints.
pub fn parse_chart_payload(symbol: &str, body: &str) -> Result<Vec<PricePoint>, FinsightError> {
    let envelope: ChartEnvelope = parse_json(PROVIDER_ID, body)?;

    if let Some(error) = envelope.chart.error {
        return Err(FinsightError::Provider {
            provider: PROVIDER_ID.to_string(),
            reason: format!("{symbol}: {}", error.description),
        });
    }

    let result = envelope
        .chart
        .result
        .and_then(|mut r| if r.is_empty() { None } else { Some(r.swap_remove(0)) })
        .ok_or_else(|| FinsightError::Unavailable {
            symbol: symbol.to_string(),
        })?;

    let closes = result
        .indicators
        .quote
        .into_iter()
        .next()
        .map(|q| q.close)
        .unwrap_or_default();

    let mut points: Vec<PricePoint> = result
        .timestamp
        .iter()
        .zip(closes)
        .filter_map(|(&ts, close)| {
            let close = close.filter(|c| c.is_finite())?;
            let date = DateTime::<Utc>::from_timestamp(ts, 0)?.date_naive();
            Some(PricePoint { date, close })
        })
        .collect();

    points.sort_by_key(|p| p.date);
    points.dedup_by_key(|p| p.date);
    Ok(points)
}

pub struct YahooQuoteAdapter {
    client: Client,
    base_url: String,
}

impl YahooQuoteAdapter {
    pub fn new(base_url: &str, timeout_secs: u64) -> Self {
        Self {
            client: build_client(timeout_secs),
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }
}

#[async_trait]
impl QuotePort for YahooQuoteAdapter {
    async fn daily_closes(&self, symbol: &str, days: u32) -> Result<Vec<PricePoint>, FinsightError> {
        let now = Utc::now().timestamp();
        let start = now - i64::from(days) * SECONDS_PER_DAY;
        let period1 = start.to_string();
        let period2 = now.to_string();
        let url = format!("{}/v8/finance/chart/{}", self.base_url, symbol);

        let body = get_text(
            &self.client,
            PROVIDER_ID,
            &url,
            &[
                ("period1", period1.as_str()),
                ("period2", period2.as_str()),
                ("interval", "1d"),
            ],
            &[],
        )
        .await?;

        let points = parse_chart_payload(symbol, &body)?;
        debug!("{symbol}: {} daily closes over {days} days", points.len());
        Ok(points)
    }
}
