use crate::models::Selection;

/// Build the request URL for a selection.
///
/// `{endpoint}/latest` or `{endpoint}/YYYY-MM-DD`, followed by whichever of
/// `base` and `symbols` are set, always in that order.
pub fn build_url(endpoint: &str, selection: &Selection) -> String {
    let endpoint = endpoint.trim_end_matches('/');
    let path = match selection.chart_date {
        Some(date) => date.format("%Y-%m-%d").to_string(),
        None => "latest".to_string(),
    };

    let mut params: Vec<String> = Vec::new();
    if let Some(base) = &selection.base {
        params.push(format!("base={}", base));
    }
    if let Some(symbols) = selection.symbols_param() {
        params.push(format!("symbols={}", symbols));
    }

    if params.is_empty() {
        format!("{}/{}", endpoint, path)
    } else {
        format!("{}/{}?{}", endpoint, path, params.join("&"))
    }
}

/// URL for the untouched default selection
pub fn default_url(endpoint: &str) -> String {
    build_url(endpoint, &Selection::default())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::CurrencyCode;
    use chrono::NaiveDate;

    const ENDPOINT: &str = "https://api.ratesapi.io/api";

    fn code(s: &str) -> CurrencyCode {
        s.parse().unwrap()
    }

    #[test]
    fn test_every_field_combination() {
        let date = NaiveDate::from_ymd_opt(2020, 1, 1).unwrap();
        let cases = [
            (None, None, vec![], "/latest"),
            (None, Some("USD"), vec![], "/latest?base=USD"),
            (None, None, vec!["JPY"], "/latest?symbols=JPY"),
            (None, Some("USD"), vec!["JPY", "GBP"], "/latest?base=USD&symbols=JPY,GBP"),
            (Some(date), None, vec![], "/2020-01-01"),
            (Some(date), Some("CHF"), vec![], "/2020-01-01?base=CHF"),
            (Some(date), None, vec!["GBP"], "/2020-01-01?symbols=GBP"),
            (Some(date), Some("USD"), vec!["JPY", "GBP"], "/2020-01-01?base=USD&symbols=JPY,GBP"),
        ];

        for (chart_date, base, symbols, suffix) in cases {
            let selection = Selection {
                chart_date,
                base: base.map(code),
                symbols: symbols.into_iter().map(code).collect(),
            };
            assert_eq!(build_url(ENDPOINT, &selection), format!("{}{}", ENDPOINT, suffix));
        }
    }

    #[test]
    fn test_trailing_slash_on_endpoint() {
        assert_eq!(
            default_url("http://localhost:8000/api/"),
            "http://localhost:8000/api/latest"
        );
    }

    #[test]
    fn test_same_selection_same_url() {
        let selection = Selection::default()
            .with_base(code("GBP"))
            .with_symbols(vec![code("USD")]);
        assert_eq!(build_url(ENDPOINT, &selection), build_url(ENDPOINT, &selection.clone()));
    }
}
