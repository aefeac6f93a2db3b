//! Currency codes and the static display-name table

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use lazy_static::lazy_static;

use crate::utils::errors::ChartError;

/// Base currency the rates API uses when no `base` parameter is sent
pub const DEFAULT_BASE: &str = "EUR";

lazy_static! {
    static ref CURRENCY_NAMES: BTreeMap<&'static str, &'static str> = [
        ("AUD", "Australian Dollar"),
        ("BGN", "Bulgarian Lev"),
        ("BRL", "Brazilian Real"),
        ("CAD", "Canadian Dollar"),
        ("CHF", "Swiss Franc"),
        ("CNY", "Chinese Yuan Renminbi"),
        ("CZK", "Czech Koruna"),
        ("DKK", "Danish Krone"),
        ("EUR", "EU Euro"),
        ("GBP", "Great British Pound Sterling"),
        ("HKD", "Hong Kong Dollar"),
        ("HRK", "Croatian Kuna"),
        ("HUF", "Hungarian Forint"),
        ("IDR", "Indonesian Rupiah"),
        ("ILS", "Israeli Shekel"),
        ("INR", "Indian Rupee"),
        ("ISK", "Icelandic Krona"),
        ("JPY", "Japanese Yen"),
        ("KRW", "South Korean Won"),
        ("MXN", "Mexican Peso"),
        ("MYR", "Malaysian Ringgit"),
        ("NOK", "Norwegian Krone"),
        ("NZD", "New Zealand Dollar"),
        ("PHP", "Philippine Peso"),
        ("PLN", "Polish Zloty"),
        ("RON", "Romanian Leu"),
        ("RUB", "Russian Rouble"),
        ("SEK", "Swedish Krona"),
        ("SGD", "Singapore Dollar"),
        ("THB", "Thai Baht"),
        ("TRY", "Turkish Lira"),
        ("USD", "US Dollar"),
        ("ZAR", "South African Rand"),
    ]
    .into_iter()
    .collect();
}

/// A three-letter ISO 4217 style code, always stored upper case
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct CurrencyCode(String);

impl CurrencyCode {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The code the API falls back to when no base is requested
    pub fn default_base() -> Self {
        CurrencyCode(DEFAULT_BASE.to_string())
    }

    /// Whether the code has an entry in the display-name table
    pub fn is_known(&self) -> bool {
        CURRENCY_NAMES.contains_key(self.0.as_str())
    }

    /// Parse and additionally require the code to be in the name table
    pub fn parse_known(raw: &str) -> Result<Self, ChartError> {
        let code: CurrencyCode = raw.parse()?;
        if !code.is_known() {
            return Err(ChartError::UnknownCurrency(code.0));
        }
        Ok(code)
    }
}

impl FromStr for CurrencyCode {
    type Err = ChartError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        if trimmed.len() != 3 || !trimmed.chars().all(|c| c.is_ascii_alphabetic()) {
            return Err(ChartError::InvalidCurrencyCode(s.to_string()));
        }
        Ok(CurrencyCode(trimmed.to_ascii_uppercase()))
    }
}

impl fmt::Display for CurrencyCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for CurrencyCode {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Display name for a code, if the table has one
pub fn currency_name(code: &str) -> Option<&'static str> {
    CURRENCY_NAMES.get(code).copied()
}

/// Every code in the name table, ascending
pub fn known_codes() -> Vec<CurrencyCode> {
    CURRENCY_NAMES
        .keys()
        .map(|code| CurrencyCode(code.to_string()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_normalises_case() {
        let code: CurrencyCode = " usd ".parse().unwrap();
        assert_eq!(code.as_str(), "USD");
    }

    #[test]
    fn test_parse_rejects_bad_codes() {
        assert!("US".parse::<CurrencyCode>().is_err());
        assert!("USDX".parse::<CurrencyCode>().is_err());
        assert!("U1D".parse::<CurrencyCode>().is_err());
    }

    #[test]
    fn test_parse_known_rejects_unlisted_code() {
        assert!(CurrencyCode::parse_known("JPY").is_ok());
        match CurrencyCode::parse_known("XAU") {
            Err(ChartError::UnknownCurrency(code)) => assert_eq!(code, "XAU"),
            other => panic!("unexpected result: {:?}", other),
        }
    }

    #[test]
    fn test_default_base_is_known() {
        assert!(CurrencyCode::default_base().is_known());
        assert_eq!(currency_name("EUR"), Some("EU Euro"));
    }

    #[test]
    fn test_known_codes_sorted() {
        let codes = known_codes();
        assert_eq!(codes.len(), 33);
        assert!(codes.windows(2).all(|w| w[0] < w[1]));
    }
}
