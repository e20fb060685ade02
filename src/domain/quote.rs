//! Quote snapshots and daily price history.

use chrono::NaiveDate;
use serde::Serialize;

use super::error::FinsightError;

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PricePoint {
    pub date: NaiveDate,
    pub close: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Up,
    Down,
    Flat,
}

impl Direction {
    pub fn arrow(&self) -> &'static str {
        match self {
            Direction::Up => "▲",
            Direction::Down => "▼",
            Direction::Flat => "",
        }
    }
}

/// Last close against the close before it.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct QuoteSnapshot {
    pub symbol: String,
    pub last_close: f64,
    pub previous_close: f64,
}

impl QuoteSnapshot {
    /// Build from an ascending close series; needs at least two closes.
    pub fn from_history(symbol: &str, history: &[PricePoint]) -> Result<Self, FinsightError> {
        match history {
            [.., previous, last] if previous.close > 0.0 => Ok(Self {
                symbol: symbol.to_string(),
                last_close: last.close,
                previous_close: previous.close,
            }),
            _ => Err(FinsightError::Unavailable {
                symbol: symbol.to_string(),
            }),
        }
    }

    pub fn change(&self) -> f64 {
        self.last_close - self.previous_close
    }

    pub fn change_percent(&self) -> f64 {
        self.change() / self.previous_close * 100.0
    }

    pub fn direction(&self) -> Direction {
        let change = self.change();
        if change > 0.0 {
            Direction::Up
        } else if change < 0.0 {
            Direction::Down
        } else {
            Direction::Flat
        }
    }

    /// "▲ +1.23%", "▼ -0.50%", or "--" when unchanged.
    pub fn format_change(&self) -> String {
        match self.direction() {
            Direction::Flat => "--".to_string(),
            dir => format!("{} {:+.2}%", dir.arrow(), self.change_percent()),
        }
    }
}

/// Outcome of a quote fetch as shown on a dashboard tile.
#[derive(Debug, Clone, PartialEq)]
pub enum QuoteStatus {
    Available(QuoteSnapshot),
    Unavailable { symbol: String, reason: String },
}

impl QuoteStatus {
    pub fn symbol(&self) -> &str {
        match self {
            QuoteStatus::Available(q) => &q.symbol,
            QuoteStatus::Unavailable { symbol, .. } => symbol,
        }
    }
}

impl From<(String, Result<QuoteSnapshot, FinsightError>)> for QuoteStatus {
    fn from((symbol, result): (String, Result<QuoteSnapshot, FinsightError>)) -> Self {
        match result {
            Ok(snapshot) => QuoteStatus::Available(snapshot),
            Err(e) => QuoteStatus::Unavailable {
                symbol,
                reason: e.to_string(),
            },
        }
    }
}

/// Friendly names for the tracked market indices.
pub fn index_display_name(symbol: &str) -> &str {
    match symbol {
        "^GSPC" => "S&P 500",
        "^DJI" => "Dow Jones",
        "^IXIC" => "NASDAQ",
        other => other,
    }
}
