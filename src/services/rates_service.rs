use std::collections::HashMap;

use chrono::NaiveDate;
use tracing::{debug, info};

use crate::api::ratesapi::{ApiError, RatesClient, RatesResponse};
use crate::models::{CurrencyCode, RateEntry, RatesSnapshot};

/// Turn the API's code -> rate mapping into chart entries sorted by code.
///
/// With `known_only`, codes missing from the currency name table are dropped.
/// Keys that are not valid codes are always dropped.
pub fn to_rate_entries(rates: &HashMap<String, f64>, known_only: bool) -> Vec<RateEntry> {
    let mut entries: Vec<RateEntry> = rates
        .iter()
        .filter_map(|(code, rate)| {
            let abbreviation = code.parse::<CurrencyCode>().ok()?;
            if known_only && !abbreviation.is_known() {
                debug!("Dropping unknown currency {}", abbreviation);
                return None;
            }
            Some(RateEntry {
                abbreviation,
                rate: *rate,
            })
        })
        .collect();

    entries.sort_by(|a, b| a.abbreviation.cmp(&b.abbreviation));
    entries
}

/// Validate a decoded body and build the snapshot the chart is drawn from
pub fn snapshot_from_response(response: RatesResponse) -> Result<RatesSnapshot, ApiError> {
    let base = response
        .base
        .parse::<CurrencyCode>()
        .map_err(|_| ApiError::MalformedResponse(format!("invalid base '{}'", response.base)))?;

    let date = NaiveDate::parse_from_str(&response.date, "%Y-%m-%d")
        .map_err(|_| ApiError::MalformedResponse(format!("invalid date '{}'", response.date)))?;

    Ok(RatesSnapshot {
        base,
        date,
        rates: to_rate_entries(&response.rates, true),
    })
}

/// Fetch one URL and produce a snapshot
pub async fn fetch_snapshot(client: &RatesClient, url: &str) -> Result<RatesSnapshot, ApiError> {
    let response = client.fetch_rates(url).await?;
    let snapshot = snapshot_from_response(response)?;
    info!(
        "Loaded {} rates for base {} on {}",
        snapshot.rates.len(),
        snapshot.base,
        snapshot.date
    );
    Ok(snapshot)
}
