//! Monetary and date formatting.
//!
//! Amounts render with the fixed thousands-dot / decimal-comma convention
//! plus a currency suffix (`1.234,56 EUR`). The strings must be bit-exact:
//! they appear in the PDF table cells, the totals block and the verification
//! response, and third parties compare them against what the QR embeds.

use chrono::{DateTime, Utc};

/// Format a monetary amount: thousands `.`, decimal `,`, two decimals,
/// currency suffix.
///
/// `None` renders as the zero amount.
///
/// # Example
///
/// ```
/// use factura_kit::format::format_amount;
///
/// assert_eq!(format_amount(Some(1234.5), "EUR"), "1.234,50 EUR");
/// assert_eq!(format_amount(None, "EUR"), "0,00 EUR");
/// ```
pub fn format_amount(value: Option<f64>, currency: &str) -> String {
    let value = value.unwrap_or(0.0);
    let cents = (value.abs() * 100.0).round() as u64;
    let units = cents / 100;
    let fraction = cents % 100;

    let digits = units.to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push('.');
        }
        grouped.push(c);
    }

    let sign = if value < 0.0 && cents > 0 { "-" } else { "" };
    format!("{}{},{:02} {}", sign, grouped, fraction, currency)
}

/// Format a timestamp with the configured strftime-style format.
///
/// `None` renders as the empty string.
pub fn format_date(date: Option<&DateTime<Utc>>, format: &str) -> String {
    match date {
        Some(d) => d.format(format).to_string(),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_amount_thousands() {
        assert_eq!(format_amount(Some(1234.5), "EUR"), "1.234,50 EUR");
        assert_eq!(format_amount(Some(1234567.89), "EUR"), "1.234.567,89 EUR");
    }

    #[test]
    fn test_format_amount_none_and_zero() {
        assert_eq!(format_amount(None, "EUR"), "0,00 EUR");
        assert_eq!(format_amount(Some(0.0), "EUR"), "0,00 EUR");
    }

    #[test]
    fn test_format_amount_small_values() {
        assert_eq!(format_amount(Some(0.5), "EUR"), "0,50 EUR");
        assert_eq!(format_amount(Some(999.99), "EUR"), "999,99 EUR");
    }

    #[test]
    fn test_format_amount_rounds_to_two_decimals() {
        assert_eq!(format_amount(Some(10.006), "EUR"), "10,01 EUR");
        assert_eq!(format_amount(Some(121.00000000000001), "EUR"), "121,00 EUR");
    }

    #[test]
    fn test_format_amount_negative() {
        assert_eq!(format_amount(Some(-1234.5), "EUR"), "-1.234,50 EUR");
    }

    #[test]
    fn test_format_amount_other_currency() {
        assert_eq!(format_amount(Some(100.0), "USD"), "100,00 USD");
    }

    #[test]
    fn test_format_date() {
        let date = "2024-03-01T10:00:00Z"
            .parse::<DateTime<Utc>>()
            .expect("Failed to parse date");
        assert_eq!(format_date(Some(&date), "%Y-%m-%d"), "2024-03-01");
        assert_eq!(format_date(None, "%Y-%m-%d"), "");
    }
}
