use thiserror::Error;

use crate::api::ratesapi::RatesClient;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{0} not set")]
    Missing(&'static str),
    #[error("{name} must be a positive integer, got '{value}'")]
    InvalidNumber { name: &'static str, value: String },
}

/// Settings read from the environment (and `.env`) at startup
#[derive(Debug, Clone)]
pub struct BotConfig {
    pub discord_token: String,
    pub rates_api_url: String,
    pub chart_width: u32,
    pub chart_height: u32,
}

impl BotConfig {
    pub const DEFAULT_CHART_WIDTH: u32 = 1000;
    pub const DEFAULT_CHART_HEIGHT: u32 = 400;

    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Build from any variable source
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let discord_token = lookup("DISCORD_TOKEN")
            .filter(|token| !token.trim().is_empty())
            .ok_or(ConfigError::Missing("DISCORD_TOKEN"))?;

        let rates_api_url = lookup("RATES_API_URL")
            .filter(|url| !url.trim().is_empty())
            .unwrap_or_else(|| RatesClient::DEFAULT_BASE_URL.to_string());

        Ok(Self {
            discord_token,
            rates_api_url,
            chart_width: parse_dimension(&lookup, "CHART_WIDTH", Self::DEFAULT_CHART_WIDTH)?,
            chart_height: parse_dimension(&lookup, "CHART_HEIGHT", Self::DEFAULT_CHART_HEIGHT)?,
        })
    }
}

fn parse_dimension(
    lookup: &impl Fn(&str) -> Option<String>,
    name: &'static str,
    default: u32,
) -> Result<u32, ConfigError> {
    match lookup(name) {
        None => Ok(default),
        Some(value) => match value.trim().parse::<u32>() {
            Ok(n) if n > 0 => Ok(n),
            _ => Err(ConfigError::InvalidNumber { name, value }),
        },
    }
}
