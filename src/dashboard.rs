//! Dashboard state with background refresh.
//!
//! [`Dashboard::refresh`] fans out one tokio task per panel (indices, stocks,
//! chart, news). Each task reports back over an mpsc channel tagged with the
//! generation it was started for; the owner applies updates in
//! [`Dashboard::apply`] and drops any that belong to an older refresh.

use std::sync::Arc;

use log::{debug, info, warn};
use tokio::sync::mpsc;

use crate::domain::news::{NewsArticle, take_top};
use crate::domain::quote::{PricePoint, QuoteStatus};
use crate::ports::news_port::NewsPort;
use crate::ports::quote_port::QuotePort;

const PANEL_COUNT: usize = 4;

#[derive(Debug, Clone)]
pub struct DashboardConfig {
    pub indices: Vec<String>,
    pub stocks: Vec<String>,
    pub chart_symbol: String,
    pub chart_days: u32,
    pub headlines: usize,
    pub news_category: String,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            indices: ["^GSPC", "^DJI", "^IXIC"].map(String::from).to_vec(),
            stocks: ["AAPL", "GOOGL", "MSFT", "TSLA"].map(String::from).to_vec(),
            chart_symbol: "^GSPC".to_string(),
            chart_days: 30,
            headlines: 8,
            news_category: "general".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Panel<T> {
    Loading,
    Ready(T),
    Failed(String),
}

impl<T> Panel<T> {
    pub fn is_loading(&self) -> bool {
        matches!(self, Panel::Loading)
    }
}

impl<T, E: std::fmt::Display> From<Result<T, E>> for Panel<T> {
    fn from(result: Result<T, E>) -> Self {
        match result {
            Ok(value) => Panel::Ready(value),
            Err(e) => Panel::Failed(e.to_string()),
        }
    }
}

#[derive(Debug, Clone)]
pub enum Update {
    Indices(Vec<QuoteStatus>),
    Stocks(Vec<QuoteStatus>),
    Chart(Panel<Vec<PricePoint>>),
    News(Panel<Vec<NewsArticle>>),
}

#[derive(Debug, Clone)]
pub struct Tagged {
    pub generation: u64,
    pub update: Update,
}

pub struct Dashboard {
    quotes: Arc<dyn QuotePort>,
    news: Arc<dyn NewsPort>,
    config: DashboardConfig,
    generation: u64,
    pending: usize,
    tx: mpsc::UnboundedSender<Tagged>,
    rx: mpsc::UnboundedReceiver<Tagged>,
    pub indices: Panel<Vec<QuoteStatus>>,
    pub stocks: Panel<Vec<QuoteStatus>>,
    pub chart: Panel<Vec<PricePoint>>,
    pub headlines: Panel<Vec<NewsArticle>>,
}

impl Dashboard {
    pub fn new(
        quotes: Arc<dyn QuotePort>,
        news: Arc<dyn NewsPort>,
        config: DashboardConfig,
    ) -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        Self {
            quotes,
            news,
            config,
            generation: 0,
            pending: 0,
            tx,
            rx,
            indices: Panel::Loading,
            stocks: Panel::Loading,
            chart: Panel::Loading,
            headlines: Panel::Loading,
        }
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn config(&self) -> &DashboardConfig {
        &self.config
    }

    /// Updates from the current generation still outstanding.
    pub fn pending(&self) -> usize {
        self.pending
    }

    /// Start a new refresh and return its generation. Must be called inside a
    /// tokio runtime.
    pub fn refresh(&mut self) -> u64 {
        self.generation += 1;
        self.pending = PANEL_COUNT;
        self.indices = Panel::Loading;
        self.stocks = Panel::Loading;
        self.chart = Panel::Loading;
        self.headlines = Panel::Loading;

        let generation = self.generation;
        info!("dashboard refresh #{generation}");

        spawn_quotes(
            self.tx.clone(),
            generation,
            Arc::clone(&self.quotes),
            self.config.indices.clone(),
            Update::Indices,
        );
        spawn_quotes(
            self.tx.clone(),
            generation,
            Arc::clone(&self.quotes),
            self.config.stocks.clone(),
            Update::Stocks,
        );

        let tx = self.tx.clone();
        let quotes = Arc::clone(&self.quotes);
        let symbol = self.config.chart_symbol.clone();
        let days = self.config.chart_days;
        tokio::spawn(async move {
            let result = quotes.daily_closes(&symbol, days).await;
            if let Err(e) = &result {
                warn!("chart history for {symbol} failed: {e}");
            }
            send(&tx, generation, Update::Chart(result.into()));
        });

        let tx = self.tx.clone();
        let news = Arc::clone(&self.news);
        let category = self.config.news_category.clone();
        let limit = self.config.headlines;
        tokio::spawn(async move {
            let panel = match news.fetch_news(&category).await {
                Ok(articles) => Panel::Ready(
                    take_top(articles, limit)
                        .iter()
                        .map(NewsArticle::for_display)
                        .collect(),
                ),
                Err(e) => {
                    warn!("news fetch failed: {e}");
                    Panel::Failed(e.to_string())
                }
            };
            send(&tx, generation, Update::News(panel));
        });

        generation
    }

    /// Apply one update; returns false when it belonged to a superseded refresh.
    pub fn apply(&mut self, tagged: Tagged) -> bool {
        if tagged.generation != self.generation {
            debug!(
                "dropping stale update from generation {} (current {})",
                tagged.generation, self.generation
            );
            return false;
        }
        match tagged.update {
            Update::Indices(statuses) => self.indices = Panel::Ready(statuses),
            Update::Stocks(statuses) => self.stocks = Panel::Ready(statuses),
            Update::Chart(panel) => self.chart = panel,
            Update::News(panel) => self.headlines = panel,
        }
        self.pending = self.pending.saturating_sub(1);
        true
    }

    /// Receive and apply updates until every panel of the current refresh is in.
    pub async fn settle(&mut self) {
        while self.pending > 0 {
            match self.rx.recv().await {
                Some(tagged) => {
                    self.apply(tagged);
                }
                None => break,
            }
        }
    }
}

fn send(tx: &mpsc::UnboundedSender<Tagged>, generation: u64, update: Update) {
    if tx.send(Tagged { generation, update }).is_err() {
        debug!("dashboard dropped before generation {generation} finished");
    }
}

fn spawn_quotes(
    tx: mpsc::UnboundedSender<Tagged>,
    generation: u64,
    quotes: Arc<dyn QuotePort>,
    symbols: Vec<String>,
    wrap: fn(Vec<QuoteStatus>) -> Update,
) {
    tokio::spawn(async move {
        let mut statuses = Vec::with_capacity(symbols.len());
        for symbol in symbols {
            let result = quotes.quote(&symbol).await;
            if let Err(e) = &result {
                warn!("quote for {symbol} unavailable: {e}");
            }
            statuses.push(QuoteStatus::from((symbol, result)));
        }
        send(&tx, generation, wrap(statuses));
    });
}
