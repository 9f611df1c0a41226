//! Display formatting for prices

/// Two decimals with comma thousands separators, e.g. `1,234,567.89`.
pub fn format_amount(value: f64) -> String {
    let fixed = format!("{:.2}", value.abs());
    let (int_part, frac_part) = fixed.split_once('.').unwrap_or((fixed.as_str(), "00"));

    let mut grouped = String::with_capacity(int_part.len() + int_part.len() / 3);
    for (i, ch) in int_part.chars().enumerate() {
        if i > 0 && (int_part.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }

    let sign = if value < 0.0 && fixed.bytes().any(|b| b != b'0' && b != b'.') {
        "-"
    } else {
        ""
    };
    format!("{}{}.{}", sign, grouped, frac_part)
}

pub fn format_price(value: f64, currency_symbol: &str) -> String {
    if currency_symbol.is_empty() {
        format_amount(value)
    } else {
        format!("{} {}", currency_symbol, format_amount(value))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_grouping() {
        assert_eq!(format_amount(0.0), "0.00");
        assert_eq!(format_amount(999.994), "999.99");
        assert_eq!(format_amount(1000.0), "1,000.00");
        assert_eq!(format_amount(1_234_567.891), "1,234,567.89");
        assert_eq!(format_amount(100_000.0), "100,000.00");
    }

    #[test]
    fn test_rounding_carries_into_grouping() {
        assert_eq!(format_amount(999_999.999), "1,000,000.00");
    }

    #[test]
    fn test_negative() {
        assert_eq!(format_amount(-1_500.5), "-1,500.50");
        // rounds to zero, no sign
        assert_eq!(format_amount(-0.001), "0.00");
    }

    #[test]
    fn test_currency_prefix() {
        assert_eq!(format_price(350_000.0, "Rp"), "Rp 350,000.00");
        assert_eq!(format_price(12.5, ""), "12.50");
    }
}
