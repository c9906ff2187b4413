//! Aligns price series onto one shared date axis for charting.

use crate::domain::price_series::PriceSeries;
use std::collections::{BTreeMap, BTreeSet};

/// Appended to the upper-cased symbol to form a series label.
pub const CLOSING_PRICE_SUFFIX: &str = "Closing Price";

#[derive(Debug, Clone, PartialEq)]
pub struct ChartSeries {
    pub symbol: String,
    pub label: String,
    /// Parallel to [`AlignedChartSeries::labels`]; `None` where the series has
    /// no observation for that date.
    pub values: Vec<Option<f64>>,
}

impl ChartSeries {
    fn build(name: &str, series: &PriceSeries, axis: &[String]) -> Self {
        Self::from_lookup(name, axis, |date| series.get(date))
    }

    fn from_lookup(name: &str, axis: &[String], lookup: impl Fn(&str) -> Option<f64>) -> Self {
        let symbol = name.to_uppercase();
        let label = format!("{} {}", symbol, CLOSING_PRICE_SUFFIX);
        let values = axis.iter().map(|date| lookup(date)).collect();
        Self {
            symbol,
            label,
            values,
        }
    }

    pub fn missing_count(&self) -> usize {
        self.values.iter().filter(|v| v.is_none()).count()
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct AlignedChartSeries {
    pub labels: Vec<String>,
    pub series: Vec<ChartSeries>,
}

impl AlignedChartSeries {
    pub fn primary(&self) -> Option<&ChartSeries> {
        self.series.first()
    }

    /// Zip the axis with one series' values back into its observations.
    /// Missing markers are not observations and are left out.
    pub fn series_to_price_series(&self, index: usize) -> Option<PriceSeries> {
        let series = self.series.get(index)?;
        Some(
            self.labels
                .iter()
                .zip(&series.values)
                .filter_map(|(date, value)| value.map(|v| (date.as_str(), v)))
                .collect(),
        )
    }

    /// Re-align the primary series of this chart against `other`.
    ///
    /// The current axis need not cover `other`'s dates, so the primary series
    /// is first zipped back into a date mapping and the union is computed from
    /// scratch. Every current axis date is kept, including those where the
    /// primary has only a missing marker.
    pub fn compare_with(&self, other: &PriceSeries, other_name: &str) -> AlignedChartSeries {
        let Some(primary) = self.primary() else {
            return align(&PriceSeries::new(), Some(other), "", Some(other_name));
        };

        let rebuilt: BTreeMap<&str, Option<f64>> = self
            .labels
            .iter()
            .map(String::as_str)
            .zip(primary.values.iter().copied())
            .collect();

        let unique_dates: BTreeSet<&str> = rebuilt.keys().copied().chain(other.dates()).collect();
        let labels: Vec<String> = unique_dates.into_iter().map(str::to_string).collect();

        let series = vec![
            ChartSeries::from_lookup(&primary.symbol, &labels, |date| {
                rebuilt.get(date).copied().flatten()
            }),
            ChartSeries::build(other_name, other, &labels),
        ];
        AlignedChartSeries { labels, series }
    }
}

/// Sorted, deduplicated union of every series' dates.
pub fn build_unified_axis<'a, I>(all: I) -> Vec<String>
where
    I: IntoIterator<Item = &'a PriceSeries>,
{
    let unique_dates: BTreeSet<&str> = all.into_iter().flat_map(|s| s.dates()).collect();
    unique_dates.into_iter().map(str::to_string).collect()
}

/// Align any number of named series at once.
pub fn align_all(inputs: &[(&str, &PriceSeries)]) -> AlignedChartSeries {
    let labels = build_unified_axis(inputs.iter().map(|(_, s)| *s));
    let series = inputs
        .iter()
        .map(|(name, s)| ChartSeries::build(name, s, &labels))
        .collect();
    AlignedChartSeries { labels, series }
}

/// Align a primary series and an optional secondary one.
pub fn align(
    primary: &PriceSeries,
    secondary: Option<&PriceSeries>,
    primary_name: &str,
    secondary_name: Option<&str>,
) -> AlignedChartSeries {
    match secondary {
        Some(second) => align_all(&[
            (primary_name, primary),
            (secondary_name.unwrap_or_default(), second),
        ]),
        None => align_all(&[(primary_name, primary)]),
    }
}
