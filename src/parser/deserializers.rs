use chrono::{DateTime, NaiveDate, NaiveDateTime};

/// Format of `Order Create Date & Time` in ONDC exports.
const DMY_DT_FMT: &str = "%d-%m-%Y %H:%M";

/// Naive ISO-8601 layouts accepted after zoned parsing fails.
const ISO_NAIVE_FMTS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
];

/// Outcome of a lenient cell parse: the cell was empty, parsed, or unparseable.
/// Unparseable cells become missing values but are reported by the loaders.
#[derive(Debug, Clone, PartialEq)]
pub enum Lenient<T> {
    Empty,
    Parsed(T),
    Invalid(String),
}

impl<T> Lenient<T> {
    /// Collapse into the missing-value representation.
    pub fn value(self) -> Option<T> {
        match self {
            Lenient::Parsed(v) => Some(v),
            Lenient::Empty | Lenient::Invalid(_) => None,
        }
    }
}

/// Parse a day-month-year datetime ("05-01-2026 16:24").
/// Returns None for empty or unparseable strings.
pub fn parse_dmy_datetime(s: &str) -> Option<NaiveDateTime> {
    lenient_dmy_datetime(s).value()
}

pub fn lenient_dmy_datetime(s: &str) -> Lenient<NaiveDateTime> {
    let trimmed = s.trim();
    if trimmed.is_empty() {
        return Lenient::Empty;
    }
    match NaiveDateTime::parse_from_str(trimmed, DMY_DT_FMT) {
        Ok(dt) => Lenient::Parsed(dt),
        Err(_) => Lenient::Invalid(trimmed.to_string()),
    }
}

/// Parse an ISO-8601 timestamp with optional zone.
/// Zoned values ("2026-01-05T10:24:00.000Z", "+05:30") keep their wall-clock
/// time and lose the zone, matching the naive creation stamps; naive values
/// are kept as-is.
pub fn parse_iso_datetime(s: &str) -> Option<NaiveDateTime> {
    lenient_iso_datetime(s).value()
}

pub fn lenient_iso_datetime(s: &str) -> Lenient<NaiveDateTime> {
    let trimmed = s.trim();
    if trimmed.is_empty() {
        return Lenient::Empty;
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(trimmed) {
        return Lenient::Parsed(dt.naive_local());
    }
    // "2026-01-05 10:24:00+05:30" style, space separator with offset
    if let Ok(dt) = DateTime::parse_from_str(trimmed, "%Y-%m-%d %H:%M:%S%.f%:z") {
        return Lenient::Parsed(dt.naive_local());
    }
    for fmt in ISO_NAIVE_FMTS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(trimmed, fmt) {
            return Lenient::Parsed(dt);
        }
    }
    match NaiveDate::parse_from_str(trimmed, "%Y-%m-%d") {
        Ok(d) => Lenient::Parsed(d.and_time(chrono::NaiveTime::MIN)),
        Err(_) => Lenient::Invalid(trimmed.to_string()),
    }
}

/// Parse a monetary amount ("₹1,250.50", "Rs. 99", "42") into f64.
pub fn parse_amount(s: &str) -> Option<f64> {
    lenient_amount(s).value()
}

pub fn lenient_amount(s: &str) -> Lenient<f64> {
    let trimmed = s.trim();
    if trimmed.is_empty() {
        return Lenient::Empty;
    }
    let without_symbol = trimmed
        .strip_prefix('₹')
        .or_else(|| trimmed.strip_prefix("Rs."))
        .or_else(|| trimmed.strip_prefix("INR"))
        .unwrap_or(trimmed);
    let cleaned: String = without_symbol
        .chars()
        .filter(|c| *c != ',' && !c.is_whitespace())
        .collect();
    match cleaned.parse::<f64>() {
        Ok(v) if v.is_finite() => Lenient::Parsed(v),
        _ => Lenient::Invalid(trimmed.to_string()),
    }
}
