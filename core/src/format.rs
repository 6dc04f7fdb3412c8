//! Display helpers for amounts and timestamps, en-US style.

use chrono::{DateTime, NaiveDateTime};

/// `1234.5` → `$1,234.50`; negatives get a leading minus. Non-finite
/// amounts come back unformatted.
pub fn format_currency(amount: f64) -> String {
    if !amount.is_finite() {
        return amount.to_string();
    }
    let fixed = format!("{:.2}", amount.abs());
    let (dollars, cents) = fixed.split_once('.').unwrap_or((fixed.as_str(), "00"));

    let mut grouped = String::with_capacity(dollars.len() + dollars.len() / 3);
    for (i, digit) in dollars.chars().enumerate() {
        if i > 0 && (dollars.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(digit);
    }

    let nonzero = fixed.bytes().any(|b| matches!(b, b'1'..=b'9'));
    let sign = if amount < 0.0 && nonzero { "-" } else { "" };
    format!("{sign}${grouped}.{cents}")
}

/// `2024-01-05T15:07:00` → `Jan 5, 2024, 03:07 PM`. Accepts RFC 3339 and
/// naive ISO timestamps; anything else comes back unchanged.
pub fn format_date(timestamp: &str) -> String {
    const PATTERN: &str = "%b %-d, %Y, %I:%M %p";

    if let Ok(parsed) = DateTime::parse_from_rfc3339(timestamp) {
        return parsed.format(PATTERN).to_string();
    }
    ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"]
        .iter()
        .find_map(|layout| NaiveDateTime::parse_from_str(timestamp, layout).ok())
        .map(|parsed| parsed.format(PATTERN).to_string())
        .unwrap_or_else(|| timestamp.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn currency_groups_thousands() {
        assert_eq!(format_currency(0.0), "$0.00");
        assert_eq!(format_currency(999.999), "$1,000.00");
        assert_eq!(format_currency(1234.5), "$1,234.50");
        assert_eq!(format_currency(1234567.891), "$1,234,567.89");
        assert_eq!(format_currency(-5.0), "-$5.00");
        assert_eq!(format_currency(-0.001), "$0.00");
    }

    #[test]
    fn currency_keeps_huge_and_non_finite_amounts_intact() {
        assert_eq!(format_currency(2e17), "$200,000,000,000,000,000.00");
        assert_eq!(format_currency(-1e20), "-$100,000,000,000,000,000,000.00");
        assert_eq!(format_currency(f64::NAN), "NaN");
        assert_eq!(format_currency(f64::INFINITY), "inf");
        assert_eq!(format_currency(f64::NEG_INFINITY), "-inf");
    }

    #[test]
    fn date_accepts_naive_and_offset_timestamps() {
        assert_eq!(format_date("2024-01-05T15:07:00"), "Jan 5, 2024, 03:07 PM");
        assert_eq!(format_date("2024-01-05T09:30:12.123456"), "Jan 5, 2024, 09:30 AM");
        assert_eq!(format_date("2024-11-20T23:59:59+02:00"), "Nov 20, 2024, 11:59 PM");
        assert_eq!(format_date("2024-11-20 00:05:00"), "Nov 20, 2024, 12:05 AM");
    }

    #[test]
    fn unparsable_date_is_returned_as_is() {
        assert_eq!(format_date("yesterday"), "yesterday");
    }
}
