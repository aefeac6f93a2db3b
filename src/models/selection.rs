//! The user's chart selection

use chrono::NaiveDate;

use super::currency::CurrencyCode;

/// What the user has picked: a date, a base currency and a currency subset.
///
/// A `Selection` is never edited in place. Each user action builds a new value
/// and the session swaps it in, so the URL derived from it always reflects one
/// complete choice.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Selection {
    /// `None` means the latest published rates
    pub chart_date: Option<NaiveDate>,
    /// `None` means the API default base
    pub base: Option<CurrencyCode>,
    /// Empty means every currency
    pub symbols: Vec<CurrencyCode>,
}

impl Selection {
    /// Picking a date starts a fresh selection for that day
    pub fn with_date(&self, date: NaiveDate) -> Self {
        Selection {
            chart_date: Some(date),
            base: None,
            symbols: Vec::new(),
        }
    }

    pub fn with_base(&self, base: CurrencyCode) -> Self {
        Selection {
            base: Some(base),
            ..self.clone()
        }
    }

    pub fn with_symbols(&self, symbols: Vec<CurrencyCode>) -> Self {
        Selection {
            symbols,
            ..self.clone()
        }
    }

    /// The base the chart will be expressed in, resolving the API default
    pub fn effective_base(&self) -> CurrencyCode {
        self.base.clone().unwrap_or_else(CurrencyCode::default_base)
    }

    /// Symbols in the comma-joined form the API expects
    pub fn symbols_param(&self) -> Option<String> {
        if self.symbols.is_empty() {
            return None;
        }
        Some(
            self.symbols
                .iter()
                .map(CurrencyCode::as_str)
                .collect::<Vec<_>>()
                .join(","),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn code(s: &str) -> CurrencyCode {
        s.parse().unwrap()
    }

    #[test]
    fn test_date_change_resets_base_and_symbols() {
        let selection = Selection::default()
            .with_base(code("USD"))
            .with_symbols(vec![code("JPY")]);
        let date = NaiveDate::from_ymd_opt(2020, 1, 1).unwrap();

        let next = selection.with_date(date);
        assert_eq!(next.chart_date, Some(date));
        assert_eq!(next.base, None);
        assert!(next.symbols.is_empty());
        // the previous selection is untouched
        assert_eq!(selection.base, Some(code("USD")));
    }

    #[test]
    fn test_base_change_keeps_date_and_symbols() {
        let date = NaiveDate::from_ymd_opt(2015, 6, 30).unwrap();
        let selection = Selection::default()
            .with_date(date)
            .with_symbols(vec![code("GBP")]);

        let next = selection.with_base(code("CHF"));
        assert_eq!(next.chart_date, Some(date));
        assert_eq!(next.symbols, vec![code("GBP")]);
        assert_eq!(next.effective_base(), code("CHF"));
    }

    #[test]
    fn test_effective_base_defaults_to_eur() {
        assert_eq!(Selection::default().effective_base().as_str(), "EUR");
    }

    #[test]
    fn test_symbols_param() {
        let selection = Selection::default();
        assert_eq!(selection.symbols_param(), None);

        let selection = selection.with_symbols(vec![code("JPY"), code("GBP")]);
        assert_eq!(selection.symbols_param().as_deref(), Some("JPY,GBP"));
    }
}
