//! CSV file market data adapter.
//!
//! Reads `<base>/<SYMBOL>.csv` files with a `datetime,close` header, one row
//! per trading day in any order.

use crate::domain::error::CompounderError;
use crate::domain::price_series::{PriceObservation, DATE_FORMAT};
use crate::ports::market_data_port::MarketDataPort;
use chrono::NaiveDate;
use std::fs;
use std::path::PathBuf;

pub struct CsvPriceAdapter {
    base_path: PathBuf,
}

impl CsvPriceAdapter {
    pub fn new(base_path: PathBuf) -> Self {
        Self { base_path }
    }

    fn csv_path(&self, symbol: &str) -> PathBuf {
        self.base_path.join(format!("{}.csv", symbol.to_uppercase()))
    }

    pub fn read_closes(&self, symbol: &str) -> Result<Vec<PriceObservation>, CompounderError> {
        let path = self.csv_path(symbol);
        let content = fs::read_to_string(&path).map_err(|e| CompounderError::Upstream {
            symbol: symbol.to_string(),
            message: format!("no price data at {}: {}", path.display(), e),
        })?;

        let mut rdr = csv::Reader::from_reader(content.as_bytes());
        let mut observations = Vec::new();

        for result in rdr.records() {
            let record = result.map_err(|e| CompounderError::DataSource {
                reason: format!("CSV parse error in {}: {}", path.display(), e),
            })?;

            let date_str = record
                .get(0)
                .ok_or_else(|| CompounderError::DataSource {
                    reason: "missing datetime column".into(),
                })?
                .trim();
            let date = NaiveDate::parse_from_str(date_str, DATE_FORMAT).map_err(|e| {
                CompounderError::DataSource {
                    reason: format!("invalid date '{}': {}", date_str, e),
                }
            })?;

            let close: f64 = record
                .get(1)
                .ok_or_else(|| CompounderError::DataSource {
                    reason: "missing close column".into(),
                })?
                .trim()
                .parse()
                .map_err(|e| CompounderError::DataSource {
                    reason: format!("invalid close value: {}", e),
                })?;

            observations.push((date, close));
        }

        // Newest first, matching the port contract.
        observations.sort_by(|a, b| b.0.cmp(&a.0));
        log::debug!(
            "read {} closes for {} from {}",
            observations.len(),
            symbol,
            path.display()
        );
        Ok(observations
            .into_iter()
            .map(|(date, close)| PriceObservation::new(date.format(DATE_FORMAT).to_string(), close))
            .collect())
    }
}

impl MarketDataPort for CsvPriceAdapter {
    async fn fetch_daily_closes(
        &self,
        symbol: &str,
    ) -> Result<Vec<PriceObservation>, CompounderError> {
        self.read_closes(symbol)
    }
}
