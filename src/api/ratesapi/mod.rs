pub mod client;
pub mod models;

pub use client::{parse_rates_body, RatesClient};
pub use models::{ApiError, RatesResponse};
