//! Seams between the chart session and the outside world

pub mod rates_source;

pub use rates_source::RatesSource;
