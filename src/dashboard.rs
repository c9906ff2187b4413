//! Stock comparison dashboard: fetches closes through a [`MarketDataPort`]
//! and keeps the aligned chart in a [`ComparisonSession`].
//!
//! Every fetch runs under a timeout and can be abandoned through a
//! [`CancelHandle`]. Requests on one dashboard are serialised by `&mut self`.

use crate::domain::alignment::AlignedChartSeries;
use crate::domain::comparison::{normalize_symbol, ComparisonSession, RequestKind};
use crate::domain::error::CompounderError;
use crate::domain::price_series::PriceSeries;
use crate::ports::market_data_port::MarketDataPort;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;

/// Cancels whichever fetch is in flight when [`CancelHandle::cancel`] is
/// called. Fetches started afterwards are unaffected.
#[derive(Debug, Clone)]
pub struct CancelHandle {
    epoch: Arc<watch::Sender<u64>>,
}

impl Default for CancelHandle {
    fn default() -> Self {
        let (tx, _rx) = watch::channel(0);
        Self { epoch: Arc::new(tx) }
    }
}

impl CancelHandle {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.epoch.send_modify(|epoch| *epoch += 1);
    }

    fn current(&self) -> u64 {
        *self.epoch.borrow()
    }

    async fn cancelled_since(&self, started: u64) {
        let mut rx = self.epoch.subscribe();
        let _ = rx.wait_for(|epoch| *epoch != started).await;
    }
}

/// Fetch `symbol` and reduce it to an ascending series, giving up after
/// `timeout` or when `cancel` fires.
pub async fn fetch_series<P: MarketDataPort>(
    port: &P,
    symbol: &str,
    timeout: Duration,
    cancel: &CancelHandle,
) -> Result<PriceSeries, CompounderError> {
    let started = cancel.current();
    tokio::select! {
        biased;
        _ = cancel.cancelled_since(started) => {
            log::warn!("fetch for {symbol} cancelled");
            Err(CompounderError::Cancelled { symbol: symbol.to_string() })
        }
        fetched = tokio::time::timeout(timeout, port.fetch_daily_closes(symbol)) => match fetched {
            Ok(result) => result.map(PriceSeries::from_newest_first),
            Err(_) => {
                log::warn!("fetch for {symbol} timed out after {timeout:?}");
                Err(CompounderError::Timeout {
                    symbol: symbol.to_string(),
                    seconds: timeout.as_secs(),
                })
            }
        },
    }
}

pub struct Dashboard<P: MarketDataPort> {
    port: P,
    session: ComparisonSession,
    timeout: Duration,
    cancel: CancelHandle,
}

impl<P: MarketDataPort> Dashboard<P> {
    pub fn new(port: P, timeout: Duration) -> Self {
        Self {
            port,
            session: ComparisonSession::new(),
            timeout,
            cancel: CancelHandle::new(),
        }
    }

    pub fn chart(&self) -> Option<&AlignedChartSeries> {
        self.session.chart()
    }

    /// Handle for cancelling from another task while a request is awaited.
    pub fn cancel_handle(&self) -> CancelHandle {
        self.cancel.clone()
    }

    async fn fetch(&self, symbol: &str) -> Result<PriceSeries, CompounderError> {
        fetch_series(&self.port, symbol, self.timeout, &self.cancel).await
    }

    /// Replace the chart with `symbol` alone. On failure the chart is cleared.
    pub async fn search(&mut self, symbol: &str) -> Result<&AlignedChartSeries, CompounderError> {
        let symbol = normalize_symbol(symbol, RequestKind::Search)?;
        let ticket = self.session.begin(RequestKind::Search)?;
        log::info!("searching {symbol}");

        match self.fetch(&symbol).await {
            Ok(series) => self.session.apply_search(ticket, &symbol, &series),
            Err(e) => {
                self.session.fail(ticket, RequestKind::Search);
                Err(e)
            }
        }
    }

    /// Add `symbol` as the comparison series. On failure the chart is kept.
    pub async fn compare(&mut self, symbol: &str) -> Result<&AlignedChartSeries, CompounderError> {
        let symbol = normalize_symbol(symbol, RequestKind::Compare)?;
        let ticket = self.session.begin(RequestKind::Compare)?;
        log::info!("comparing against {symbol}");

        match self.fetch(&symbol).await {
            Ok(series) => self.session.apply_compare(ticket, &symbol, &series),
            Err(e) => {
                self.session.fail(ticket, RequestKind::Compare);
                Err(e)
            }
        }
    }

    /// Fetch every symbol first, then align them in one pass. A failed fetch
    /// clears the chart, as a failed search does.
    pub async fn load_all(
        &mut self,
        symbols: &[&str],
    ) -> Result<&AlignedChartSeries, CompounderError> {
        let normalized = symbols
            .iter()
            .enumerate()
            .map(|(i, raw)| {
                let kind = if i == 0 {
                    RequestKind::Search
                } else {
                    RequestKind::Compare
                };
                normalize_symbol(raw, kind)
            })
            .collect::<Result<Vec<_>, _>>()?;

        let ticket = self.session.begin(RequestKind::Search)?;
        log::info!("loading {}", normalized.join(", "));

        let mut fetched = Vec::with_capacity(normalized.len());
        for symbol in normalized {
            match self.fetch(&symbol).await {
                Ok(series) => fetched.push((symbol, series)),
                Err(e) => {
                    self.session.fail(ticket, RequestKind::Search);
                    return Err(e);
                }
            }
        }

        let inputs: Vec<(&str, &PriceSeries)> =
            fetched.iter().map(|(s, series)| (s.as_str(), series)).collect();
        self.session.apply_all(ticket, &inputs)
    }
}
