//! Quote provider port trait.

use async_trait::async_trait;

use crate::domain::error::FinsightError;
use crate::domain::quote::{PricePoint, QuoteSnapshot};

/// Calendar days of history requested when building a snapshot; covers weekends.
pub const SNAPSHOT_LOOKBACK_DAYS: u32 = 5;

#[async_trait]
pub trait QuotePort: Send + Sync {
    /// Daily closes over roughly the last `days` calendar days, oldest first.
    async fn daily_closes(&self, symbol: &str, days: u32) -> Result<Vec<PricePoint>, FinsightError>;

    /// Last close against the previous close.
    async fn quote(&self, symbol: &str) -> Result<QuoteSnapshot, FinsightError> {
        let history = self.daily_closes(symbol, SNAPSHOT_LOOKBACK_DAYS).await?;
        QuoteSnapshot::from_history(symbol, &history)
    }
}
