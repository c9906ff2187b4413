#![allow(dead_code)]

use compounder::domain::error::CompounderError;
use compounder::domain::frequency::Frequency;
pub use compounder::domain::price_series::{PriceObservation, PriceSeries};
use compounder::domain::projection::ProjectionParameters;
use compounder::ports::market_data_port::MarketDataPort;
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

pub struct MockMarketDataPort {
    pub data: HashMap<String, Vec<PriceObservation>>,
    pub errors: HashMap<String, String>,
    pub delays: HashMap<String, Duration>,
    pub calls: AtomicUsize,
}

impl MockMarketDataPort {
    pub fn new() -> Self {
        Self {
            data: HashMap::new(),
            errors: HashMap::new(),
            delays: HashMap::new(),
            calls: AtomicUsize::new(0),
        }
    }

    /// Observations given oldest first; stored newest first like a provider.
    pub fn with_closes(mut self, symbol: &str, closes: &[(&str, f64)]) -> Self {
        let obs = closes
            .iter()
            .rev()
            .map(|(d, c)| PriceObservation::new(*d, *c))
            .collect();
        self.data.insert(symbol.to_string(), obs);
        self
    }

    pub fn with_error(mut self, symbol: &str, message: &str) -> Self {
        self.errors.insert(symbol.to_string(), message.to_string());
        self
    }

    pub fn with_delay(mut self, symbol: &str, delay: Duration) -> Self {
        self.delays.insert(symbol.to_string(), delay);
        self
    }

    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl MarketDataPort for MockMarketDataPort {
    async fn fetch_daily_closes(
        &self,
        symbol: &str,
    ) -> Result<Vec<PriceObservation>, CompounderError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if let Some(delay) = self.delays.get(symbol) {
            tokio::time::sleep(*delay).await;
        }
        if let Some(message) = self.errors.get(symbol) {
            return Err(CompounderError::Upstream {
                symbol: symbol.to_string(),
                message: message.clone(),
            });
        }
        Ok(self.data.get(symbol).cloned().unwrap_or_default())
    }
}

pub fn series(points: &[(&str, f64)]) -> PriceSeries {
    points.iter().copied().collect()
}

pub fn params(
    initial_deposit: f64,
    years: u32,
    rate: f64,
    compound: Frequency,
    contribution: f64,
    contribution_frequency: Frequency,
) -> ProjectionParameters {
    ProjectionParameters {
        initial_deposit,
        years,
        annual_rate_percent: rate,
        compound_frequency: compound,
        contribution_amount: contribution,
        contribution_frequency,
    }
}

pub fn frequency(monthly: bool) -> Frequency {
    if monthly {
        Frequency::Monthly
    } else {
        Frequency::Annually
    }
}
