// Lenient numeric extraction from rendered UI text
//
// Displayed values arrive with currency symbols, thousands separators, and
// unit suffixes. Measurement here is best-effort by design: strip, parse,
// and degrade to zero rather than fail a scenario over noisy text.

/// Extracts a number from rendered text.
///
/// Literal rule: strip every character except digits, `.` and `-`, then
/// parse. `"1,234.56"` becomes `"1234.56"` and parses to `1234.56`;
/// unparseable or empty input yields `0.0`.
pub fn extract_numeric_value(text: &str) -> f64 {
    let cleaned: String = text
        .chars()
        .filter(|c| c.is_ascii_digit() || *c == '.' || *c == '-')
        .collect();
    match cleaned.parse::<f64>() {
        Ok(n) if n.is_finite() => n,
        _ => 0.0,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn identity_on_clean_integers() {
        for n in [0i64, 1, 42, 10_000, -7] {
            assert_eq!(extract_numeric_value(&n.to_string()), n as f64);
        }
    }

    #[test]
    fn strips_thousands_separators() {
        assert_eq!(extract_numeric_value("1,234.56"), 1234.56);
        assert_eq!(extract_numeric_value("10,000"), 10_000.0);
    }

    #[test]
    fn strips_currency_symbols_and_suffixes() {
        assert_eq!(extract_numeric_value("$1,234.56 USD"), 1234.56);
        assert_eq!(extract_numeric_value("≈ 99.5 sdCRV"), 99.5);
    }

    #[test]
    fn keeps_sign() {
        assert_eq!(extract_numeric_value("-12.5%"), -12.5);
    }

    #[test]
    fn degrades_to_zero_on_empty_input() {
        assert_eq!(extract_numeric_value(""), 0.0);
    }

    #[test]
    fn degrades_to_zero_on_non_numeric_input() {
        assert_eq!(extract_numeric_value("abc"), 0.0);
        assert_eq!(extract_numeric_value("—"), 0.0);
        // Stripping can produce garbage like "..." or "-"; still zero.
        assert_eq!(extract_numeric_value("a.b.c"), 0.0);
        assert_eq!(extract_numeric_value("-"), 0.0);
    }
}
