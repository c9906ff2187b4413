//! Market data port trait.

use crate::domain::error::CompounderError;
use crate::domain::price_series::PriceObservation;
use std::future::Future;

/// Source of daily closing prices.
pub trait MarketDataPort {
    /// Daily closes for `symbol`, newest first as providers list them.
    ///
    /// A provider-side error payload or non-success status is reported as
    /// [`CompounderError::Upstream`]; no retry is attempted.
    fn fetch_daily_closes(
        &self,
        symbol: &str,
    ) -> impl Future<Output = Result<Vec<PriceObservation>, CompounderError>> + Send;
}
