//! Live exchange rates over HTTP, plus a fallback wrapper.
//!
//! The API answers `GET {base_url}{PIVOT}` with `{"base": "USD", "rates": {...}}`.

use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;
use log::{info, warn};
use reqwest::Client;
use serde::Deserialize;

use super::http::{build_client, get_text, parse_json};
use crate::domain::currency::{RateTable, fallback_rates};
use crate::domain::error::FinsightError;
use crate::ports::rate_port::{RatePort, RateSource};

pub const DEFAULT_API_URL: &str = "https://api.exchangerate-api.com/v4/latest/";
const PROVIDER_ID: &str = "EXCHANGERATE_API";

#[derive(Debug, Deserialize)]
struct LatestResponse {
    #[serde(default)]
    base: Option<String>,
    rates: HashMap<String, f64>,
}

/// Parse a `latest` payload into a table pivoted on `pivot`.
pub fn parse_latest_payload(pivot: &str, body: &str) -> Result<RateTable, FinsightError> {
    let response: LatestResponse = parse_json(PROVIDER_ID, body)?;
    let base = response.base.unwrap_or_else(|| pivot.to_string());
    let table = RateTable::new(&base, response.rates).map_err(|e| FinsightError::Provider {
        provider: PROVIDER_ID.to_string(),
        reason: e.to_string(),
    })?;
    table.rebased(pivot)
}

pub struct ExchangeRateApiAdapter {
    client: Client,
    base_url: String,
}

impl ExchangeRateApiAdapter {
    pub fn new(base_url: &str, timeout_secs: u64) -> Self {
        let mut base_url = base_url.to_string();
        if !base_url.ends_with('/') {
            base_url.push('/');
        }
        Self {
            client: build_client(timeout_secs),
            base_url,
        }
    }
}

#[async_trait]
impl RatePort for ExchangeRateApiAdapter {
    async fn latest_rates(&self, pivot: &str) -> Result<RateTable, FinsightError> {
        let url = format!("{}{}", self.base_url, pivot.trim().to_ascii_uppercase());
        let body = get_text(&self.client, PROVIDER_ID, &url, &[], &[]).await?;
        let table = parse_latest_payload(pivot, &body)?;
        info!("loaded {} live exchange rates against {}", table.len(), table.pivot());
        Ok(table)
    }
}

/// Wraps a provider and substitutes the built-in table when it fails.
pub struct FallbackRatePort<P> {
    inner: P,
    last_source: Mutex<Option<RateSource>>,
}

impl<P: RatePort> FallbackRatePort<P> {
    pub fn new(inner: P) -> Self {
        Self {
            inner,
            last_source: Mutex::new(None),
        }
    }

    fn record(&self, source: RateSource) {
        if let Ok(mut guard) = self.last_source.lock() {
            *guard = Some(source);
        }
    }
}

#[async_trait]
impl<P: RatePort> RatePort for FallbackRatePort<P> {
    async fn latest_rates(&self, pivot: &str) -> Result<RateTable, FinsightError> {
        match self.inner.latest_rates(pivot).await {
            Ok(table) => {
                self.record(RateSource::Live);
                Ok(table)
            }
            Err(e) => {
                warn!("exchange rates unavailable ({e}); using fallback rates");
                self.record(RateSource::Fallback);
                let fallback = fallback_rates();
                match fallback.rebased(pivot) {
                    Ok(table) => Ok(table),
                    Err(rebase_err) => {
                        warn!(
                            "cannot pivot fallback rates on {pivot} ({rebase_err}); keeping {}",
                            fallback.pivot()
                        );
                        Ok(fallback)
                    }
                }
            }
        }
    }

    fn last_source(&self) -> Option<RateSource> {
        self.last_source.lock().ok().and_then(|guard| *guard)
    }
}
