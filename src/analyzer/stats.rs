//! Reusable statistical functions for dashboard analytics.
use std::collections::HashMap;

use serde::Serialize;

/// One entry of a categorical distribution.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CountEntry {
    pub label: String,
    pub count: usize,
    pub percentage: f64,
}

/// Arithmetic mean. Returns None if the slice is empty.
pub fn mean(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    Some(values.iter().sum::<f64>() / values.len() as f64)
}

/// Percentile with linear interpolation. `p` is in [0, 100].
/// Returns 0.0 if the slice is empty.
pub fn percentile(values: &[f64], p: f64) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    let mut sorted = values.to_vec();
    sorted.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));
    let n = sorted.len();
    if n == 1 {
        return sorted[0];
    }
    // Rank (0-based fractional index)
    let rank = p / 100.0 * (n - 1) as f64;
    let lower = rank.floor() as usize;
    let upper = rank.ceil() as usize;
    if lower == upper {
        sorted[lower]
    } else {
        let frac = rank - lower as f64;
        sorted[lower] * (1.0 - frac) + sorted[upper] * frac
    }
}

pub fn round2(v: f64) -> f64 {
    (v * 100.0).round() / 100.0
}

/// `count / total` as a percentage rounded to 2 decimals; 0.0 when total is 0.
pub fn pct(count: usize, total: usize) -> f64 {
    if total == 0 {
        0.0
    } else {
        round2(count as f64 / total as f64 * 100.0)
    }
}

/// Count occurrences of each non-missing label.
///
/// Missing and blank values are not counted. Entries are sorted by count
/// descending, then by label; percentages are relative to the counted values.
pub fn value_counts<'a, I>(values: I) -> Vec<CountEntry>
where
    I: IntoIterator<Item = Option<&'a str>>,
{
    let mut counts: HashMap<&'a str, usize> = HashMap::new();
    let mut total = 0usize;
    for v in values.into_iter().flatten() {
        if v.trim().is_empty() {
            continue;
        }
        *counts.entry(v).or_insert(0) += 1;
        total += 1;
    }

    let mut entries: Vec<CountEntry> = counts
        .into_iter()
        .map(|(label, count)| CountEntry {
            label: label.to_string(),
            count,
            percentage: pct(count, total),
        })
        .collect();
    entries.sort_by(|a, b| b.count.cmp(&a.count).then_with(|| a.label.cmp(&b.label)));
    entries
}

#[cfg(test)]
mod tests {
    use super::*;

    // --- mean ---

    #[test]
    fn test_mean_empty() {
        assert_eq!(mean(&[]), None);
    }

    #[test]
    fn test_mean_known() {
        // (2 + 4 + 6) / 3 = 4.0
        assert!((mean(&[2.0, 4.0, 6.0]).unwrap() - 4.0).abs() < 1e-10);
    }

    // --- percentile ---

    #[test]
    fn test_percentile_empty() {
        assert_eq!(percentile(&[], 50.0), 0.0);
    }

    #[test]
    fn test_percentile_single() {
        assert_eq!(percentile(&[42.0], 90.0), 42.0);
    }

    #[test]
    fn test_percentile_median_even() {
        // Sorted: [1, 2, 3, 4]. p50 → rank = 0.5 * 3 = 1.5 → lerp(2, 3, 0.5) = 2.5
        assert!((percentile(&[4.0, 1.0, 3.0, 2.0], 50.0) - 2.5).abs() < 1e-10);
    }

    #[test]
    fn test_percentile_p90() {
        // rank = 0.9 * 9 = 8.1 → lerp(9, 10, 0.1) = 9.1
        let vals: Vec<f64> = (1..=10).map(|x| x as f64).collect();
        assert!((percentile(&vals, 90.0) - 9.1).abs() < 1e-10);
    }

    // --- pct ---

    #[test]
    fn test_pct_rounding() {
        assert_eq!(pct(1, 3), 33.33);
        assert_eq!(pct(2, 3), 66.67);
        assert_eq!(pct(0, 0), 0.0);
    }

    // --- value_counts ---

    #[test]
    fn test_value_counts_sorted_and_skips_missing() {
        let values = vec![
            Some("Delhi"),
            Some("Pune"),
            None,
            Some("Delhi"),
            Some(""),
            Some("Agra"),
        ];
        let counts = value_counts(values);
        let labels: Vec<&str> = counts.iter().map(|c| c.label.as_str()).collect();
        assert_eq!(labels, vec!["Delhi", "Agra", "Pune"]);
        assert_eq!(counts[0].count, 2);
        assert_eq!(counts[0].percentage, 50.0);
        let total: usize = counts.iter().map(|c| c.count).sum();
        assert_eq!(total, 4, "sum of counts equals non-missing rows");
    }

    #[test]
    fn test_value_counts_empty() {
        assert!(value_counts(Vec::<Option<&str>>::new()).is_empty());
    }
}
