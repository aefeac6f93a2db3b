//! Data models for the rates chart
//!
//! Selections, snapshots and currency codes shared by the services and commands.

pub mod currency;
pub mod rates;
pub mod ping;
pub mod selection;

pub use currency::{currency_name, known_codes, CurrencyCode, DEFAULT_BASE};
pub use rates::{RateEntry, RatesSnapshot};
pub use selection::Selection;
