use serenity::async_trait;

use crate::api::ratesapi::{ApiError, RatesClient};
use crate::models::RatesSnapshot;
use crate::services::rates_service;

/// Anything that can turn a rates URL into a snapshot
#[async_trait]
pub trait RatesSource: Send + Sync {
    /// Fetch and validate the rates behind `url`
    async fn fetch_snapshot(&self, url: &str) -> Result<RatesSnapshot, ApiError>;
}

#[async_trait]
impl RatesSource for RatesClient {
    async fn fetch_snapshot(&self, url: &str) -> Result<RatesSnapshot, ApiError> {
        rates_service::fetch_snapshot(self, url).await
    }
}
