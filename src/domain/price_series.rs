//! Daily closing prices keyed by ISO calendar date.

use std::collections::BTreeMap;

/// Date format of every series key.
pub const DATE_FORMAT: &str = "%Y-%m-%d";

#[derive(Debug, Clone, PartialEq)]
pub struct PriceObservation {
    pub date: String,
    pub close: f64,
}

impl PriceObservation {
    pub fn new(date: impl Into<String>, close: f64) -> Self {
        Self {
            date: date.into(),
            close,
        }
    }
}

/// Date-string to close mapping. Keys iterate in ascending string order,
/// which is chronological for fixed-width ISO dates.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PriceSeries {
    closes: BTreeMap<String, f64>,
}

impl PriceSeries {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build from observations in provider order (newest first). The list is
    /// replayed oldest first, so a repeated date keeps its newest-listed close.
    pub fn from_newest_first(observations: Vec<PriceObservation>) -> Self {
        observations.into_iter().rev().collect()
    }

    pub fn insert(&mut self, date: impl Into<String>, close: f64) {
        self.closes.insert(date.into(), close);
    }

    pub fn get(&self, date: &str) -> Option<f64> {
        self.closes.get(date).copied()
    }

    pub fn contains(&self, date: &str) -> bool {
        self.closes.contains_key(date)
    }

    pub fn len(&self) -> usize {
        self.closes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.closes.is_empty()
    }

    pub fn dates(&self) -> impl Iterator<Item = &str> {
        self.closes.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, f64)> {
        self.closes.iter().map(|(d, c)| (d.as_str(), *c))
    }

    /// First and last date, if any.
    pub fn date_range(&self) -> Option<(&str, &str)> {
        let first = self.closes.keys().next()?;
        let last = self.closes.keys().next_back()?;
        Some((first.as_str(), last.as_str()))
    }
}

impl FromIterator<PriceObservation> for PriceSeries {
    fn from_iter<I: IntoIterator<Item = PriceObservation>>(iter: I) -> Self {
        let mut series = PriceSeries::new();
        for obs in iter {
            series.insert(obs.date, obs.close);
        }
        series
    }
}

impl<'a> FromIterator<(&'a str, f64)> for PriceSeries {
    fn from_iter<I: IntoIterator<Item = (&'a str, f64)>>(iter: I) -> Self {
        let mut series = PriceSeries::new();
        for (date, close) in iter {
            series.insert(date, close);
        }
        series
    }
}
