use thiserror::Error;

use crate::api::ratesapi::ApiError;

/// Errors raised while handling a chart selection or drawing the chart
#[derive(Debug, Error)]
pub enum ChartError {
    #[error("Invalid date '{0}', expected YYYY-MM-DD")]
    InvalidDate(String),
    #[error("Date {date} is outside the available range {min} to {max}")]
    DateOutOfRange {
        date: String,
        min: String,
        max: String,
    },
    #[error("Invalid currency code '{0}'")]
    InvalidCurrencyCode(String),
    #[error("Unknown currency '{0}'")]
    UnknownCurrency(String),
    #[error("'{0}' is not one of the available base currencies")]
    BaseNotOffered(String),
    #[error("'{0}' is not one of the displayed currencies")]
    NotInToggleSet(String),
    #[error("No rates loaded yet, run `$rates` first")]
    NoSnapshot,
    #[error("There are no rates to chart")]
    EmptySnapshot,
    #[error("Failed to render chart: {0}")]
    Render(String),
    #[error(transparent)]
    Api(#[from] ApiError),
}
