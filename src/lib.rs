//! ratechart
//!
//! A Discord bot that charts exchange rates. Each channel keeps its own chart
//! session: a date, a base currency and a subset of currencies, all picked with
//! `$rates` commands.

use std::time::Instant;

use serenity::prelude::TypeMapKey;

pub mod api;
pub mod commands;
pub mod config;
pub mod models;
pub mod services;
pub mod traits;
pub mod utils;

pub use api::ratesapi::{ApiError, RatesClient};
pub use config::BotConfig;
pub use models::{CurrencyCode, RateEntry, RatesSnapshot, Selection};
pub use services::session_service::{ChartSession, FetchOutcome, FetchTicket, SessionStore};

/// Bot start time, for uptime
pub struct BotData;

impl TypeMapKey for BotData {
    type Value = Instant;
}

pub struct ChartSessions;

impl TypeMapKey for ChartSessions {
    type Value = SessionStore;
}

pub struct RatesApi;

impl TypeMapKey for RatesApi {
    type Value = RatesClient;
}

pub struct Settings;

impl TypeMapKey for Settings {
    type Value = BotConfig;
}
