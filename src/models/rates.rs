//! Rates snapshot models

use chrono::NaiveDate;

use super::currency::CurrencyCode;

/// One bar on the chart
#[derive(Debug, Clone, PartialEq)]
pub struct RateEntry {
    pub abbreviation: CurrencyCode,
    pub rate: f64,
}

/// Rates for one base/date combination, sorted by code
#[derive(Debug, Clone, PartialEq)]
pub struct RatesSnapshot {
    pub base: CurrencyCode,
    pub date: NaiveDate,
    pub rates: Vec<RateEntry>,
}

impl RatesSnapshot {
    pub fn codes(&self) -> impl Iterator<Item = &CurrencyCode> {
        self.rates.iter().map(|entry| &entry.abbreviation)
    }

    pub fn entry(&self, code: &CurrencyCode) -> Option<&RateEntry> {
        self.rates
            .binary_search_by(|entry| entry.abbreviation.cmp(code))
            .ok()
            .map(|idx| &self.rates[idx])
    }

    pub fn max_rate(&self) -> Option<f64> {
        self.rates.iter().map(|entry| entry.rate).reduce(f64::max)
    }
}
