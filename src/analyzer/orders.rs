use std::collections::BTreeMap;

use chrono::NaiveDateTime;
use serde::Serialize;

use super::sla::{SlaOutcome, SlaStatus};
use super::stats::{mean, pct, percentile, round2, value_counts, CountEntry};
use crate::config::AppConfig;
use crate::parser::types::OrderRecord;

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderMetrics {
    pub total_orders: usize,
    /// Share of all rows whose status is the completed status, in percent.
    pub completion_rate: f64,
    pub active_orders: usize,
    pub avg_order_value: Option<f64>,
    pub avg_progress: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HourCount {
    pub hour: u32,
    pub count: usize,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SlaSummaryRow {
    pub status: SlaStatus,
    pub count: usize,
    pub percentage: f64,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CategorySlaSummary {
    pub category: String,
    pub valid_orders: usize,
    pub rows: Vec<SlaSummaryRow>,
    pub median_hours: f64,
    pub p90_hours: f64,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SlaCrosstab {
    /// Column order of `rows[i].counts`.
    pub statuses: Vec<SlaStatus>,
    pub rows: Vec<CrosstabRow>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CrosstabRow {
    pub category: String,
    pub counts: Vec<usize>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BreachDetail {
    pub network_order_id: Option<String>,
    pub category: Option<String>,
    pub created_at: Option<NaiveDateTime>,
    pub delivered_at: Option<NaiveDateTime>,
    pub delivery_hours: f64,
    pub delivery_city: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SlaDiagnostic {
    pub line: usize,
    pub network_order_id: Option<String>,
    pub message: String,
}

pub fn order_metrics(orders: &[OrderRecord], config: &AppConfig) -> OrderMetrics {
    let total_orders = orders.len();
    let completed = orders
        .iter()
        .filter(|o| o.status.as_deref() == Some(config.completed_status.as_str()))
        .count();
    let active_orders = orders
        .iter()
        .filter(|o| {
            o.status
                .as_deref()
                .is_some_and(|s| config.active_statuses.iter().any(|a| a == s))
        })
        .count();
    let values: Vec<f64> = orders.iter().filter_map(|o| o.total_order_value).collect();
    let progress: Vec<f64> = orders
        .iter()
        .filter_map(|o| o.progress_status.map(f64::from))
        .collect();

    OrderMetrics {
        total_orders,
        completion_rate: if total_orders == 0 {
            0.0
        } else {
            completed as f64 / total_orders as f64 * 100.0
        },
        active_orders,
        avg_order_value: mean(&values),
        avg_progress: mean(&progress),
    }
}

/// Orders per hour of creation, sorted by hour. Hours without orders are absent.
pub fn hourly_distribution(orders: &[OrderRecord]) -> Vec<HourCount> {
    let mut by_hour: BTreeMap<u32, usize> = BTreeMap::new();
    for hour in orders.iter().filter_map(|o| o.order_hour) {
        *by_hour.entry(hour).or_insert(0) += 1;
    }
    by_hour
        .into_iter()
        .map(|(hour, count)| HourCount { hour, count })
        .collect()
}

pub fn status_distribution(orders: &[OrderRecord]) -> Vec<CountEntry> {
    value_counts(orders.iter().map(|o| o.status.as_deref()))
}

pub fn category_distribution(orders: &[OrderRecord]) -> Vec<CountEntry> {
    value_counts(orders.iter().map(|o| o.category.as_deref()))
}

pub fn city_distribution(orders: &[OrderRecord]) -> Vec<CountEntry> {
    value_counts(orders.iter().map(|o| o.delivery_city.as_deref()))
}

/// Distinct non-missing categories in order of first appearance.
fn categories_in_order(orders: &[OrderRecord]) -> Vec<&str> {
    let mut seen: Vec<&str> = Vec::new();
    for c in orders.iter().filter_map(|o| o.category.as_deref()) {
        if !seen.contains(&c) {
            seen.push(c);
        }
    }
    seen
}

/// Per-category Within/Breached split over orders with a defined SLA status.
///
/// `outcomes[i]` must be the classification of `orders[i]`. Categories with no
/// defined outcome are omitted.
pub fn sla_summaries(orders: &[OrderRecord], outcomes: &[SlaOutcome]) -> Vec<CategorySlaSummary> {
    categories_in_order(orders)
        .into_iter()
        .filter_map(|category| {
            let defined: Vec<&SlaOutcome> = orders
                .iter()
                .zip(outcomes)
                .filter(|(o, s)| o.category.as_deref() == Some(category) && s.status.is_defined())
                .map(|(_, s)| s)
                .collect();
            if defined.is_empty() {
                return None;
            }

            let valid = defined.len();
            let rows = [SlaStatus::Within, SlaStatus::Breached]
                .into_iter()
                .map(|status| {
                    let count = defined.iter().filter(|s| s.status == status).count();
                    SlaSummaryRow {
                        status,
                        count,
                        percentage: pct(count, valid),
                    }
                })
                .collect();
            let hours: Vec<f64> = defined.iter().filter_map(|s| s.elapsed_hours).collect();

            Some(CategorySlaSummary {
                category: category.to_string(),
                valid_orders: valid,
                rows,
                median_hours: round2(percentile(&hours, 50.0)),
                p90_hours: round2(percentile(&hours, 90.0)),
            })
        })
        .collect()
}

/// Within/Breached split across all orders with a defined SLA status.
pub fn overall_sla(outcomes: &[SlaOutcome]) -> Vec<CountEntry> {
    value_counts(
        outcomes
            .iter()
            .filter(|s| s.status.is_defined())
            .map(|s| Some(s.status.label())),
    )
}

/// Category × SLA status counts. Categories sorted by name; only statuses
/// that occur become columns. Orders without a category are left out.
pub fn sla_crosstab(orders: &[OrderRecord], outcomes: &[SlaOutcome]) -> SlaCrosstab {
    let mut table: BTreeMap<&str, BTreeMap<SlaStatus, usize>> = BTreeMap::new();
    for (order, outcome) in orders.iter().zip(outcomes) {
        if let Some(category) = order.category.as_deref() {
            *table
                .entry(category)
                .or_default()
                .entry(outcome.status)
                .or_insert(0) += 1;
        }
    }

    let statuses: Vec<SlaStatus> = SlaStatus::ALL
        .into_iter()
        .filter(|st| table.values().any(|row| row.contains_key(st)))
        .collect();

    let rows = table
        .into_iter()
        .map(|(category, counts)| CrosstabRow {
            category: category.to_string(),
            counts: statuses
                .iter()
                .map(|st| counts.get(st).copied().unwrap_or(0))
                .collect(),
        })
        .collect();

    SlaCrosstab { statuses, rows }
}

/// Breached orders with their delivery time, in input order.
pub fn breach_details(orders: &[OrderRecord], outcomes: &[SlaOutcome]) -> Vec<BreachDetail> {
    orders
        .iter()
        .zip(outcomes)
        .filter(|(_, s)| s.status == SlaStatus::Breached)
        .map(|(o, s)| BreachDetail {
            network_order_id: o.network_order_id.clone(),
            category: o.category.clone(),
            created_at: o.created_at,
            delivered_at: o.delivered_at,
            delivery_hours: round2(s.elapsed_hours.unwrap_or_default()),
            delivery_city: o.delivery_city.clone(),
        })
        .collect()
}

/// Orders whose timestamps could not be classified consistently.
pub fn sla_diagnostics(orders: &[OrderRecord], outcomes: &[SlaOutcome]) -> Vec<SlaDiagnostic> {
    orders
        .iter()
        .zip(outcomes)
        .filter_map(|(o, s)| {
            s.reason.as_ref().map(|reason| SlaDiagnostic {
                line: o.line,
                network_order_id: o.network_order_id.clone(),
                message: reason.clone(),
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analyzer::sla::classify_all;
    use crate::analyzer::sla::tests::order;

    fn sample() -> Vec<OrderRecord> {
        let mut orders = vec![
            order(Some("F&B"), Some(30)),       // within
            order(Some("F&B"), Some(90)),       // breached
            order(Some("Grocery"), Some(180)),  // within (boundary)
            order(Some("F&B"), Some(45)),       // within
            order(Some("Electronics"), None),   // NA
            order(None, Some(10)),              // within, no category
            order(Some("Grocery"), Some(-5)),   // invalid
        ];
        orders[1].network_order_id = Some("O-LATE".into());
        orders[1].status = Some("In-progress".into());
        orders[1].progress_status = Some(75);
        orders[4].status = Some("Accepted".into());
        orders[4].progress_status = Some(25);
        orders[4].total_order_value = None;
        orders[5].status = None;
        orders[5].progress_status = None;
        orders[5].order_hour = Some(14);
        orders
    }

    #[test]
    fn test_order_metrics() {
        let orders = sample();
        let m = order_metrics(&orders, &AppConfig::default());
        assert_eq!(m.total_orders, 7);
        // 4 Completed out of 7 rows, missing status included in the denominator
        assert!((m.completion_rate - 4.0 / 7.0 * 100.0).abs() < 1e-9);
        assert_eq!(m.active_orders, 2);
        assert_eq!(m.avg_order_value, Some(100.0));
        let expected_progress = (100.0 * 4.0 + 75.0 + 25.0) / 6.0;
        assert!((m.avg_progress.unwrap() - expected_progress).abs() < 1e-9);
    }

    #[test]
    fn test_order_metrics_empty() {
        let m = order_metrics(&[], &AppConfig::default());
        assert_eq!(m.total_orders, 0);
        assert_eq!(m.completion_rate, 0.0);
        assert!(m.avg_order_value.is_none());
    }

    #[test]
    fn test_hourly_distribution_sorted_by_hour() {
        let hours = hourly_distribution(&sample());
        assert_eq!(
            hours,
            vec![HourCount { hour: 8, count: 6 }, HourCount { hour: 14, count: 1 }]
        );
    }

    #[test]
    fn test_distributions_sum_to_non_missing_rows() {
        let orders = sample();
        let status_total: usize = status_distribution(&orders).iter().map(|c| c.count).sum();
        assert_eq!(status_total, 6);
        let categories = category_distribution(&orders);
        assert_eq!(categories[0].label, "F&B");
        assert_eq!(categories[0].count, 3);
        assert_eq!(categories.iter().map(|c| c.count).sum::<usize>(), 6);
        assert_eq!(city_distribution(&orders)[0].count, 7);
    }

    #[test]
    fn test_sla_summaries() {
        let orders = sample();
        let outcomes = classify_all(&orders, &AppConfig::default());
        let summaries = sla_summaries(&orders, &outcomes);

        // Electronics has only an NA row and is omitted; first-appearance order kept
        let names: Vec<&str> = summaries.iter().map(|s| s.category.as_str()).collect();
        assert_eq!(names, vec!["F&B", "Grocery"]);

        let fnb = &summaries[0];
        assert_eq!(fnb.valid_orders, 3);
        assert_eq!(fnb.rows[0].status, SlaStatus::Within);
        assert_eq!(fnb.rows[0].count, 2);
        assert_eq!(fnb.rows[0].percentage, 66.67);
        assert_eq!(fnb.rows[1].count, 1);
        assert_eq!(fnb.rows[1].percentage, 33.33);
        assert_eq!(fnb.median_hours, 0.75);

        // the invalid Grocery row does not count
        let grocery = &summaries[1];
        assert_eq!(grocery.valid_orders, 1);
        assert_eq!(grocery.rows[0].percentage, 100.0);
        assert_eq!(grocery.rows[1].percentage, 0.0);

        for s in &summaries {
            let total: f64 = s.rows.iter().map(|r| r.percentage).sum();
            assert!((total - 100.0).abs() <= 0.02, "{} sums to {}", s.category, total);
        }
    }

    #[test]
    fn test_overall_sla() {
        let orders = sample();
        let outcomes = classify_all(&orders, &AppConfig::default());
        let overall = overall_sla(&outcomes);
        assert_eq!(overall[0].label, "Within SLA");
        assert_eq!(overall[0].count, 4);
        assert_eq!(overall[1].label, "SLA Breached");
        assert_eq!(overall[1].count, 1);
    }

    #[test]
    fn test_sla_crosstab() {
        let orders = sample();
        let outcomes = classify_all(&orders, &AppConfig::default());
        let tab = sla_crosstab(&orders, &outcomes);
        assert_eq!(tab.statuses, SlaStatus::ALL.to_vec());
        let cats: Vec<&str> = tab.rows.iter().map(|r| r.category.as_str()).collect();
        assert_eq!(cats, vec!["Electronics", "F&B", "Grocery"]);
        assert_eq!(tab.rows[0].counts, vec![0, 0, 1, 0]);
        assert_eq!(tab.rows[1].counts, vec![2, 1, 0, 0]);
        assert_eq!(tab.rows[2].counts, vec![1, 0, 0, 1]);
    }

    #[test]
    fn test_breach_details_and_diagnostics() {
        let orders = sample();
        let outcomes = classify_all(&orders, &AppConfig::default());
        let breaches = breach_details(&orders, &outcomes);
        assert_eq!(breaches.len(), 1);
        assert_eq!(breaches[0].network_order_id.as_deref(), Some("O-LATE"));
        assert_eq!(breaches[0].delivery_hours, 1.5);

        let diags = sla_diagnostics(&orders, &outcomes);
        assert_eq!(diags.len(), 1);
        assert!(diags[0].message.contains("before creation"));
    }
}
