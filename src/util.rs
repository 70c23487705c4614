// Utility helpers for parsing and formatting.
//
// This module centralizes all the "dirty" CSV/number/date/label handling so
// the rest of the code can assume clean, typed values.
use chrono::NaiveDate;
use num_format::{Locale, ToFormattedString};

/// Scale a raw number into a human-readable magnitude string.
///
/// - `>= 1e9` renders with two decimals and a `B` suffix,
/// - `>= 1e6` with one decimal and `M`,
/// - `>= 1e3` with one decimal and `K`,
/// - anything else as a plain integer string.
pub fn format_magnitude(x: f64) -> String {
    if x >= 1_000_000_000.0 {
        format!("{:.2}B", x / 1_000_000_000.0)
    } else if x >= 1_000_000.0 {
        format!("{:.1}M", x / 1_000_000.0)
    } else if x >= 1_000.0 {
        format!("{:.1}K", x / 1_000.0)
    } else {
        format!("{:.0}", x)
    }
}

pub fn format_percent(x: f64, decimals: usize) -> String {
    format!("{:.*}%", decimals, x)
}

/// Extract the trailing integer from a week label like `"W 32"`.
///
/// Every trend function shares this single extractor so malformed labels are
/// handled in exactly one place: they yield `None` and are skipped, never a
/// panic. Tolerates stray whitespace and variant prefixes (`"w32"`).
pub fn parse_week_no(s: &str) -> Option<i32> {
    let bytes = s.as_bytes();
    let mut end = bytes.len();
    while end > 0 && !bytes[end - 1].is_ascii_digit() {
        end -= 1;
    }
    if end == 0 {
        return None;
    }
    let mut start = end;
    while start > 0 && bytes[start - 1].is_ascii_digit() {
        start -= 1;
    }
    s[start..end].parse::<i32>().ok()
}

/// Parse a string-like value into `f64` while being forgiving about
/// formatting issues that are common in CSV exports (commas, spaces, text).
pub fn parse_f64_safe(s: Option<&str>) -> Option<f64> {
    let s = s?.trim();
    if s.is_empty() {
        return None;
    }
    if s.chars().any(|c| c.is_ascii_alphabetic()) {
        return None;
    }
    let s = s.replace(",", "");
    s.parse::<f64>().ok()
}

pub fn parse_i32_safe(s: Option<&str>) -> Option<i32> {
    // `?` propagates `None` early if the option is missing.
    let s = s?.trim();
    if s.is_empty() {
        return None;
    }
    s.parse::<i32>().ok()
}

/// Check-in dates arrive in day-month abbreviation-year form, e.g. `01-May-22`.
pub fn parse_check_in_date(s: &str) -> Option<NaiveDate> {
    let s = s.trim();
    if s.is_empty() {
        return None;
    }
    NaiveDate::parse_from_str(s, "%d-%b-%y").ok()
}

/// The date dimension is exported either in ISO form or in the same
/// `%d-%b-%y` form as the fact tables; accept both.
pub fn parse_dim_date(s: &str) -> Option<NaiveDate> {
    let s = s.trim();
    if s.is_empty() {
        return None;
    }
    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .or_else(|_| NaiveDate::parse_from_str(s, "%d-%b-%y"))
        .ok()
}

/// Inclusive day span `(max - min).days + 1` over the dates present.
/// `None` when no usable date exists.
pub fn inclusive_day_span(dates: impl Iterator<Item = NaiveDate>) -> Option<i64> {
    let mut min: Option<NaiveDate> = None;
    let mut max: Option<NaiveDate> = None;
    for d in dates {
        min = Some(min.map_or(d, |m| m.min(d)));
        max = Some(max.map_or(d, |m| m.max(d)));
    }
    Some((max? - min?).num_days() + 1)
}

pub fn format_int<T>(n: T) -> String
where
    T: ToFormattedString,
{
    // Thin wrapper around `num-format` for integer-like values, used for
    // counts in console messages (e.g., `134,590 rows loaded`).
    n.to_formatted_string(&Locale::en)
}
