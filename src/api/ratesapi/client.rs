use reqwest::Client as HttpClient;
use tracing::{debug, warn};

use super::models::{ApiError, RatesResponse};

/// Client for a ratesapi.io compatible exchange-rate service
#[derive(Clone)]
pub struct RatesClient {
    http_client: HttpClient,
    base_url: String,
}

impl RatesClient {
    pub const DEFAULT_BASE_URL: &'static str = "https://api.ratesapi.io/api";

    /// Create a client against the public endpoint
    pub fn new() -> Self {
        Self::with_base_url(Self::DEFAULT_BASE_URL.to_string())
    }

    /// Create a client against another deployment of the same API
    pub fn with_base_url(base_url: String) -> Self {
        Self {
            http_client: HttpClient::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    /// Endpoint root that request URLs are built from
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// GET a fully built rates URL and decode the body.
    ///
    /// One attempt only. The body is decoded from text so that a schema
    /// mismatch surfaces as `MalformedResponse` rather than a transport error.
    pub async fn fetch_rates(&self, url: &str) -> Result<RatesResponse, ApiError> {
        debug!("GET {}", url);

        let response = self
            .http_client
            .get(url)
            .send()
            .await
            .map_err(|e| ApiError::Request(format!("Request failed: {}", e)))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| ApiError::Request(format!("Failed to read body: {}", e)))?;

        if !status.is_success() {
            warn!("Rates API returned {} for {}", status, url);
            return Err(ApiError::HttpStatus {
                status: status.as_u16(),
                body,
            });
        }

        parse_rates_body(&body)
    }
}

impl Default for RatesClient {
    fn default() -> Self {
        Self::new()
    }
}

/// Decode a response body against the `{base, date, rates}` schema
pub fn parse_rates_body(body: &str) -> Result<RatesResponse, ApiError> {
    serde_json::from_str::<RatesResponse>(body)
        .map_err(|e| ApiError::MalformedResponse(e.to_string()))
}
