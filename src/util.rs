// Utility helpers for numeric coercion, date resolution and formatting.
//
// This module centralizes all the "dirty" CSV/number/date handling so the
// rest of the code can assume clean, typed values.
use chrono::NaiveDate;
use num_format::{Locale, ToFormattedString};

/// Coerce a raw CSV cell into a count while being forgiving about formatting
/// issues that are common in spreadsheet exports.
///
/// - Trims whitespace.
/// - Strips thousands separators like `","` before parsing (`"1,000"`).
/// - Empty cells coerce to 0, matching the upstream sheet's convention.
/// - Anything that does not parse to a finite number coerces to 0 as well;
///   coercion never fails the surrounding row.
pub fn parse_count(s: &str) -> i64 {
    let s = s.trim();
    if s.is_empty() {
        return 0;
    }
    let s = s.replace(',', "");
    match s.parse::<f64>() {
        Ok(n) if n.is_finite() => n as i64,
        _ => 0,
    }
}

/// Resolve a free-text date field to a calendar date for trend bucketing.
///
/// Tries the two formats the sheet normally carries (`YYYY-MM-DD`, then
/// `MM/DD/YYYY`). When neither matches, falls back to splitting on `/` or `-`
/// and reading the three parts as day/month/year, which covers day-first
/// regional exports. Returns `None` when the field cannot be resolved;
/// callers exclude such records from time-bucketed aggregates only.
pub fn resolve_date(s: &str) -> Option<NaiveDate> {
    let s = s.trim();
    if s.is_empty() {
        return None;
    }
    for fmt in ["%Y-%m-%d", "%m/%d/%Y"] {
        if let Ok(d) = NaiveDate::parse_from_str(s, fmt) {
            return Some(d);
        }
    }
    let parts: Vec<&str> = s.split(['/', '-']).collect();
    if parts.len() == 3 {
        let day = parts[0].trim().parse::<u32>().ok()?;
        let month = parts[1].trim().parse::<u32>().ok()?;
        let year = parts[2].trim().parse::<i32>().ok()?;
        return NaiveDate::from_ymd_opt(year, month, day);
    }
    None
}

/// Cheap year extraction used only to populate the year filter.
///
/// Split on `/` or `-`; with exactly three parts, whichever of the last or
/// first part is exactly 4 characters is taken as the year. Intentionally
/// looser than [`resolve_date`] and kept as a separate path: the two can
/// disagree on edge cases such as 2-digit years, and unifying them would
/// change which filter choices are offered.
pub fn year_of(date: &str) -> String {
    if date.is_empty() {
        return "Unknown".to_string();
    }
    let parts: Vec<&str> = date.split(['/', '-']).collect();
    if parts.len() == 3 {
        if parts[2].len() == 4 {
            return parts[2].to_string();
        }
        if parts[0].len() == 4 {
            return parts[0].to_string();
        }
    }
    "Unknown".to_string()
}

pub fn format_number(n: f64, decimals: usize) -> String {
    // Format a floating-point value with:
    // - a fixed number of decimal places, and
    // - locale-aware thousands separators (e.g., `1,234,567.89`).
    let neg = n.is_sign_negative();
    let abs_n = n.abs();
    let s = format!("{:.*}", decimals, abs_n);
    let mut parts = s.split('.');
    let int_part = parts.next().unwrap_or("0");
    let frac_part = parts.next();
    // Use `num-format` to insert commas into the integer portion.
    let int_val: i64 = int_part.parse().unwrap_or(0);
    let mut res = int_val.to_formatted_string(&Locale::en);
    if let Some(frac) = frac_part {
        if decimals > 0 {
            res.push('.');
            res.push_str(frac);
        }
    } else if decimals > 0 {
        res.push('.');
        res.push_str(&"0".repeat(decimals));
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
    // Thin wrapper around `num-format` for integer-like values, used for
    // counts in console messages (e.g., `9,855 rows loaded`).
    n.to_formatted_string(&Locale::en)
}
