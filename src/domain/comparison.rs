//! Chart state behind the stock comparison dashboard.
//!
//! A search replaces the chart with one series; a compare re-aligns the
//! current primary series against a second one. Each request takes a
//! [`RequestTicket`] before its fetch starts. Only the most recent ticket may
//! apply a result, so a slow fetch finishing after a newer one is discarded
//! instead of merging into a chart it was not started against.

use crate::domain::alignment::{align, align_all, AlignedChartSeries};
use crate::domain::error::CompounderError;
use crate::domain::price_series::PriceSeries;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct RequestTicket(u64);

impl RequestTicket {
    pub fn id(self) -> u64 {
        self.0
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RequestKind {
    Search,
    Compare,
}

#[derive(Debug, Default)]
pub struct ComparisonSession {
    chart: Option<AlignedChartSeries>,
    latest: u64,
}

/// Trimmed symbol, or an error naming which input was empty.
pub fn normalize_symbol(symbol: &str, kind: RequestKind) -> Result<String, CompounderError> {
    let trimmed = symbol.trim();
    if trimmed.is_empty() {
        let reason = match kind {
            RequestKind::Search => "Please enter a ticker symbol.",
            RequestKind::Compare => "Please enter a compare ticker symbol.",
        };
        return Err(CompounderError::invalid_input("symbol", reason));
    }
    Ok(trimmed.to_string())
}

impl ComparisonSession {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn chart(&self) -> Option<&AlignedChartSeries> {
        self.chart.as_ref()
    }

    pub fn is_latest(&self, ticket: RequestTicket) -> bool {
        ticket.0 == self.latest
    }

    /// Start a request. Any ticket handed out earlier becomes stale.
    pub fn begin(&mut self, kind: RequestKind) -> Result<RequestTicket, CompounderError> {
        if kind == RequestKind::Compare && self.chart.is_none() {
            return Err(CompounderError::invalid_input(
                "symbol",
                "Please search for a main symbol first.",
            ));
        }
        self.latest += 1;
        Ok(RequestTicket(self.latest))
    }

    fn check(&self, ticket: RequestTicket) -> Result<(), CompounderError> {
        if self.is_latest(ticket) {
            Ok(())
        } else {
            Err(CompounderError::Stale { ticket: ticket.0 })
        }
    }

    /// Replace the chart with `series` alone.
    pub fn apply_search(
        &mut self,
        ticket: RequestTicket,
        symbol: &str,
        series: &PriceSeries,
    ) -> Result<&AlignedChartSeries, CompounderError> {
        self.check(ticket)?;
        Ok(self.chart.insert(align(series, None, symbol, None)))
    }

    /// Merge `series` into the current chart as the comparison series.
    pub fn apply_compare(
        &mut self,
        ticket: RequestTicket,
        symbol: &str,
        series: &PriceSeries,
    ) -> Result<&AlignedChartSeries, CompounderError> {
        self.check(ticket)?;
        let merged = match &self.chart {
            Some(chart) => chart.compare_with(series, symbol),
            None => {
                return Err(CompounderError::invalid_input(
                    "symbol",
                    "Please search for a main symbol first.",
                ));
            }
        };
        Ok(self.chart.insert(merged))
    }

    /// Replace the chart with every series in `inputs`, aligned in one pass.
    pub fn apply_all(
        &mut self,
        ticket: RequestTicket,
        inputs: &[(&str, &PriceSeries)],
    ) -> Result<&AlignedChartSeries, CompounderError> {
        self.check(ticket)?;
        Ok(self.chart.insert(align_all(inputs)))
    }

    /// Record a failed request. A failed search clears the chart; a failed
    /// compare leaves it. Stale failures change nothing.
    pub fn fail(&mut self, ticket: RequestTicket, kind: RequestKind) {
        if self.is_latest(ticket) && kind == RequestKind::Search {
            self.chart = None;
        }
    }
}
