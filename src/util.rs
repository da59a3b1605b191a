// Utility helpers for parsing roll fields and formatting report numbers.
//
// The roll export is a text dump, so every numeric column arrives as a
// string. This module turns those strings into typed values and keeps the
// formatting of report figures in one place.
use crate::config::{BLOCK_ID_WIDTH, SQ_MI_PER_SQ_FT};
use num_format::{Locale, ToFormattedString};

/// Parse a string-like value into `f64` while being forgiving about
/// formatting issues that are common in CSV exports (commas, spaces).
///
/// - Trims whitespace.
/// - Rejects values that contain alphabetic characters other than an
///   exponent marker, so `"1e5"` parses but `"n/a"` does not.
/// - Strips thousands separators like `","` before parsing.
/// - Returns `None` for anything that cannot be safely parsed.
pub fn parse_f64_safe(s: &str) -> Option<f64> {
    let s = s.trim();
    if s.is_empty() {
        return None;
    }
    if s
        .chars()
        .any(|c| c.is_ascii_alphabetic() && !matches!(c, 'e' | 'E'))
    {
        return None;
    }
    let s = s.replace(",", "");
    s.parse::<f64>().ok()
}

/// Infer the four-digit year of the most recent sale from `RECURRSALD`.
///
/// The roll stores sale dates as `YYMMDD` with the leading zero of the
/// year dropped, so a date is either six digits (two-digit year) or five
/// digits (one-digit year). Anything else means the parcel has no recorded
/// sale and yields `0`.
///
/// - `20..=99` maps into the 1900s.
/// - `1..=19` maps into the 2000s.
/// - `0` stays `0`.
pub fn infer_sale_year(raw: &str) -> i32 {
    let raw = raw.trim();
    let leading = match raw.len() {
        6 => raw.get(..2),
        5 => raw.get(..1),
        _ => None,
    };
    let year = leading.and_then(|y| y.parse::<i32>().ok()).unwrap_or(0);
    match year {
        20..=99 => 1900 + year,
        1..=19 => 2000 + year,
        _ => 0,
    }
}

/// Split a combined `RP1PRCLID` into `(block_id, lot_id)`.
///
/// The block is the first [`BLOCK_ID_WIDTH`] characters with padding
/// trimmed; the lot is whatever follows, untouched.
pub fn split_block_lot(parcel_id: &str) -> (String, String) {
    let split_at = parcel_id
        .char_indices()
        .nth(BLOCK_ID_WIDTH)
        .map(|(i, _)| i)
        .unwrap_or(parcel_id.len());
    let (block, lot) = parcel_id.split_at(split_at);
    (block.trim().to_string(), lot.to_string())
}

/// Divide, resolving a non-positive denominator to `0.0`.
pub fn ratio_or_zero(numerator: f64, denominator: f64) -> f64 {
    if denominator > 0.0 {
        numerator / denominator
    } else {
        0.0
    }
}

pub fn sqft_to_sqmi(sqft: f64) -> f64 {
    sqft * SQ_MI_PER_SQ_FT
}

pub fn format_number(n: f64, decimals: usize) -> String {
    // Format a floating-point value with:
    // - a fixed number of decimal places, and
    // - locale-aware thousands separators (e.g., `1,234,567.89`).
    let neg = n.is_sign_negative() && n != 0.0;
    let abs_n = n.abs();
    let s = format!("{:.*}", decimals, abs_n);
    let mut parts = s.split('.');
    let int_part = parts.next().unwrap_or("0");
    let frac_part = parts.next();
    let int_val: i64 = int_part.parse().unwrap_or(0);
    let mut res = int_val.to_formatted_string(&Locale::en);
    if let Some(frac) = frac_part {
        if decimals > 0 {
            res.push('.');
            res.push_str(frac);
        }
    }
    if neg {
        format!("-{}", res)
    } else {
        res
    }
}

pub fn format_int<T>(n: T) -> String
where
    T: ToFormattedString,
{
    n.to_formatted_string(&Locale::en)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn six_digit_sale_date_uses_two_digit_year() {
        assert_eq!(infer_sale_year("190101"), 2019);
        assert_eq!(infer_sale_year("980315"), 1998);
        assert_eq!(infer_sale_year("200101"), 1920);
    }

    #[test]
    fn five_digit_sale_date_uses_one_digit_year() {
        assert_eq!(infer_sale_year("10101"), 2001);
        assert_eq!(infer_sale_year("91231"), 2009);
    }

    #[test]
    fn other_lengths_mean_never_sold() {
        assert_eq!(infer_sale_year("1901"), 0);
        assert_eq!(infer_sale_year(""), 0);
        assert_eq!(infer_sale_year("1234567"), 0);
        assert_eq!(infer_sale_year("000101"), 0);
        assert_eq!(infer_sale_year("ab0101"), 0);
    }

    #[test]
    fn splits_block_and_lot() {
        assert_eq!(
            split_block_lot("0001 001"),
            ("0001".to_string(), "001".to_string())
        );
        assert_eq!(
            split_block_lot("3512A019A"),
            ("3512A".to_string(), "019A".to_string())
        );
        assert_eq!(split_block_lot("12"), ("12".to_string(), String::new()));
    }

    #[test]
    fn parses_numbers_with_separators() {
        assert_eq!(parse_f64_safe(" 1,250.5 "), Some(1250.5));
        assert_eq!(parse_f64_safe("n/a"), None);
        assert_eq!(parse_f64_safe("inf"), None);
        assert_eq!(parse_f64_safe("NaN"), None);
        assert_eq!(parse_f64_safe(""), None);
    }

    #[test]
    fn parses_exponent_notation() {
        assert_eq!(parse_f64_safe("1e5"), Some(100_000.0));
        assert_eq!(parse_f64_safe("2.5E3"), Some(2500.0));
        assert_eq!(parse_f64_safe("e"), None);
    }

    #[test]
    fn ratio_guards_zero_denominator() {
        assert_eq!(ratio_or_zero(10.0, 0.0), 0.0);
        assert_eq!(ratio_or_zero(10.0, -1.0), 0.0);
        assert!((ratio_or_zero(10.0, 4.0) - 2.5).abs() < 1e-12);
    }

    #[test]
    fn formats_with_thousands_separators() {
        assert_eq!(format_number(1234567.891, 2), "1,234,567.89");
        assert_eq!(format_number(-42.0, 1), "-42.0");
        assert_eq!(format_number(0.0, 0), "0");
        assert_eq!(format_int(9855), "9,855");
    }
}
