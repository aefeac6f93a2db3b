use std::collections::HashMap;

use serde::Deserialize;
use thiserror::Error;

/// Body of `GET /latest` and `GET /{date}`
#[derive(Debug, Clone, Deserialize)]
pub struct RatesResponse {
    pub base: String,
    pub date: String,
    pub rates: HashMap<String, f64>,
}

/// Errors from talking to the rates API
#[derive(Debug, Clone, Error)]
pub enum ApiError {
    /// Connection refused, DNS failure, timeout and so on
    #[error("Request Error: {0}")]
    Request(String),
    /// Non-2xx status
    #[error("HTTP Error ({status}): {body}")]
    HttpStatus { status: u16, body: String },
    /// Body did not match `{base, date, rates}`
    #[error("Malformed Response: {0}")]
    MalformedResponse(String),
}
