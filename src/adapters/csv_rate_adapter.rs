//! Offline rate table read from a CSV file.
//!
//! Expected columns: `code,rate`, one header row, rates against `pivot`
//! (the first column of the header may be anything).

use std::fs;
use std::path::PathBuf;

use async_trait::async_trait;
use log::debug;

use crate::domain::currency::RateTable;
use crate::domain::error::FinsightError;
use crate::ports::rate_port::{RatePort, RateSource};

pub struct CsvRateAdapter {
    path: PathBuf,
    pivot: String,
}

impl CsvRateAdapter {
    pub fn new(path: PathBuf, pivot: &str) -> Self {
        Self {
            path,
            pivot: pivot.to_string(),
        }
    }

    pub fn load(&self) -> Result<RateTable, FinsightError> {
        let content = fs::read_to_string(&self.path)?;
        parse_rate_csv(&self.pivot, &content)
    }
}

pub fn parse_rate_csv(pivot: &str, content: &str) -> Result<RateTable, FinsightError> {
    let mut rdr = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(content.as_bytes());
    let mut rates = Vec::new();

    for (line, record) in rdr.records().enumerate() {
        let record = record?;
        let code = record.get(0).ok_or_else(|| {
            FinsightError::invalid_input("rates_file", format!("row {}: missing code column", line + 1))
        })?;
        let rate: f64 = record
            .get(1)
            .ok_or_else(|| {
                FinsightError::invalid_input("rates_file", format!("row {}: missing rate column", line + 1))
            })?
            .parse()
            .map_err(|e| {
                FinsightError::invalid_input("rates_file", format!("row {}: invalid rate: {e}", line + 1))
            })?;
        rates.push((code.to_string(), rate));
    }

    RateTable::new(pivot, rates)
}

#[async_trait]
impl RatePort for CsvRateAdapter {
    async fn latest_rates(&self, pivot: &str) -> Result<RateTable, FinsightError> {
        let table = self.load()?;
        debug!("read {} rates from {}", table.len(), self.path.display());
        table.rebased(pivot)
    }

    fn last_source(&self) -> Option<RateSource> {
        Some(RateSource::File)
    }
}
