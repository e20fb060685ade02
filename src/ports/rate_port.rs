//! Exchange-rate provider port trait.

use async_trait::async_trait;

use crate::domain::currency::RateTable;
use crate::domain::error::FinsightError;

/// Where a rate table came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RateSource {
    Live,
    File,
    Fallback,
}

impl RateSource {
    pub fn label(self) -> &'static str {
        match self {
            RateSource::Live => "live rates",
            RateSource::File => "rates file",
            RateSource::Fallback => "built-in fallback rates",
        }
    }
}

#[async_trait]
pub trait RatePort: Send + Sync {
    /// Rates for every known currency against `pivot`.
    async fn latest_rates(&self, pivot: &str) -> Result<RateTable, FinsightError>;

    /// Source of the last table returned, `None` before the first call.
    fn last_source(&self) -> Option<RateSource> {
        None
    }
}
