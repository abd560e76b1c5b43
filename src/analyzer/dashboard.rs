//! Dashboard view models: every section of both dashboards, computed in one pass
//! from the loaded records.
use std::time::Instant;

use serde::Serialize;

use super::orders::{
    breach_details, category_distribution, city_distribution, hourly_distribution,
    order_metrics, overall_sla, sla_crosstab, sla_diagnostics, sla_summaries, status_distribution,
    BreachDetail, CategorySlaSummary, HourCount, OrderMetrics, SlaCrosstab, SlaDiagnostic,
};
use super::sla::{classify_all, SlaStatus};
use super::stats::CountEntry;
use super::tickets::{self, PatternCount, TicketMetrics};
use crate::config::AppConfig;
use crate::parser::pipeline::ParseOutput;
use crate::parser::types::{OrderRecord, ParseWarning, TicketRecord};

// ─── Data Structures ─────────────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardMeta {
    pub source: String,
    pub total_rows: usize,
    pub skipped_rows: usize,
    pub warnings: Vec<ParseWarning>,
    pub missing_optional_columns: Vec<String>,
    pub parse_duration_ms: u64,
    pub calcul_duration_ms: u64,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderDashboard {
    pub meta: DashboardMeta,
    pub metrics: OrderMetrics,
    pub hourly: Vec<HourCount>,
    pub status: Vec<CountEntry>,
    pub category: Vec<CountEntry>,
    pub city: Vec<CountEntry>,
    pub sla: SlaAnalysis,
    pub breaches: Vec<BreachDetail>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SlaAnalysis {
    pub summaries: Vec<CategorySlaSummary>,
    pub overall: Vec<CountEntry>,
    pub crosstab: SlaCrosstab,
    pub not_applicable: usize,
    pub invalid: Vec<SlaDiagnostic>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TicketDashboard {
    pub meta: DashboardMeta,
    pub metrics: TicketMetrics,
    pub status: Vec<CountEntry>,
    pub top_domains: Vec<CountEntry>,
    pub patterns: Vec<PatternCount>,
    pub details: TicketDetails,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TicketDetails {
    pub columns: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

// ─── Builders ────────────────────────────────────────────────────────────────

fn meta<T>(source: &str, output: &ParseOutput<T>, start: Instant) -> DashboardMeta {
    DashboardMeta {
        source: source.to_string(),
        total_rows: output.total_rows_processed,
        skipped_rows: output.skipped_rows,
        warnings: output.warnings.clone(),
        missing_optional_columns: output.missing_optional_columns.clone(),
        parse_duration_ms: output.parse_duration_ms,
        calcul_duration_ms: start.elapsed().as_millis() as u64,
    }
}

/// Build the order dashboard. `source` names the input in the page header.
pub fn build_order_dashboard(
    source: &str,
    output: &ParseOutput<OrderRecord>,
    config: &AppConfig,
) -> OrderDashboard {
    let start = Instant::now();
    let orders = &output.records;
    let outcomes = classify_all(orders, config);

    let sla = SlaAnalysis {
        summaries: sla_summaries(orders, &outcomes),
        overall: overall_sla(&outcomes),
        crosstab: sla_crosstab(orders, &outcomes),
        not_applicable: outcomes
            .iter()
            .filter(|s| s.status == SlaStatus::NotApplicable)
            .count(),
        invalid: sla_diagnostics(orders, &outcomes),
    };
    log::debug!(
        "SLA: {} categories summarised, {} NA, {} invalid",
        sla.summaries.len(),
        sla.not_applicable,
        sla.invalid.len()
    );

    let mut dashboard = OrderDashboard {
        meta: meta(source, output, start),
        metrics: order_metrics(orders, config),
        hourly: hourly_distribution(orders),
        status: status_distribution(orders),
        category: category_distribution(orders),
        city: city_distribution(orders),
        breaches: breach_details(orders, &outcomes),
        sla,
    };
    dashboard.meta.calcul_duration_ms = start.elapsed().as_millis() as u64;
    dashboard
}

pub fn build_ticket_dashboard(
    source: &str,
    output: &ParseOutput<TicketRecord>,
    config: &AppConfig,
) -> TicketDashboard {
    let start = Instant::now();
    let records = &output.records;

    let mut dashboard = TicketDashboard {
        meta: meta(source, output, start),
        metrics: tickets::ticket_metrics(records, config),
        status: tickets::status_distribution(records),
        top_domains: tickets::top_domains(records, config.top_domains),
        patterns: tickets::pattern_counts(records),
        details: TicketDetails {
            columns: output.detected_columns.clone(),
            rows: records.iter().map(|t| t.fields.clone()).collect(),
        },
    };
    dashboard.meta.calcul_duration_ms = start.elapsed().as_millis() as u64;
    dashboard
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::{parse_orders_reader, parse_tickets_reader};

    const ORDERS: &str = "\
Network Order Id,Order Category,Order Status,Order Create Date & Time,Delivered At Date & Time,Delivery City,Total Order Value
A1,F&B,Completed,05-01-2026 08:00,2026-01-05T08:40:00.000Z,Pune,200
A2,F&B,Completed,05-01-2026 09:00,2026-01-05T10:30:00.000Z,Pune,300
A3,Grocery,In-progress,05-01-2026 10:00,,Delhi,
A4,Electronics,Completed,05-01-2026 10:15,2026-01-04T10:00:00Z,Delhi,1000
";

    const TICKETS: &str = "\
Ticket ID,Contact ID,Subject,Status
1,ravi@store.in,Order delayed,Open
2,meena@store.in,Fwd: invoice,Waiting on Third Party
3,,Login,Closed
";

    #[test]
    fn test_build_order_dashboard() {
        let config = AppConfig::default();
        let out = parse_orders_reader(ORDERS.as_bytes(), &config).unwrap();
        let d = build_order_dashboard("orders.csv", &out, &config);

        assert_eq!(d.meta.source, "orders.csv");
        assert_eq!(d.meta.total_rows, 4);
        assert_eq!(
            d.meta.missing_optional_columns,
            vec![
                "Ready to Ship At Date & Time",
                "Shipped At Date & Time",
                "Cancelled At Date & Time"
            ]
        );
        assert_eq!(d.metrics.total_orders, 4);
        assert_eq!(d.metrics.completion_rate, 75.0);
        assert_eq!(d.metrics.active_orders, 1);
        assert_eq!(d.metrics.avg_order_value, Some(500.0));
        assert_eq!(d.hourly.len(), 3);

        assert_eq!(d.sla.summaries.len(), 1, "only F&B has defined SLA rows");
        assert_eq!(d.sla.summaries[0].rows[0].count, 1);
        assert_eq!(d.sla.summaries[0].rows[1].count, 1);
        assert_eq!(d.sla.not_applicable, 1);
        assert_eq!(d.sla.invalid.len(), 1);
        assert_eq!(d.sla.invalid[0].network_order_id.as_deref(), Some("A4"));

        assert_eq!(d.breaches.len(), 1);
        assert_eq!(d.breaches[0].network_order_id.as_deref(), Some("A2"));
        assert_eq!(d.breaches[0].delivery_hours, 1.5);
    }

    #[test]
    fn test_build_ticket_dashboard() {
        let config = AppConfig::default();
        let out = parse_tickets_reader(TICKETS.as_bytes(), &config).unwrap();
        let d = build_ticket_dashboard("tickets.csv", &out, &config);

        assert_eq!(d.metrics.total_tickets, 3);
        assert_eq!(d.metrics.open_tickets, 1);
        assert_eq!(d.metrics.waiting_tickets, 1);
        assert_eq!(d.top_domains[0].label, "store.in");
        assert_eq!(d.top_domains[0].count, 2);
        assert_eq!(d.patterns[0].count, 1);
        assert_eq!(d.patterns[1].count, 1);
        assert_eq!(d.details.columns.len(), 4);
        assert_eq!(d.details.rows.len(), 3);
    }

    #[test]
    fn test_dashboard_serializes_camel_case() {
        let config = AppConfig::default();
        let out = parse_orders_reader(ORDERS.as_bytes(), &config).unwrap();
        let d = build_order_dashboard("orders.csv", &out, &config);
        let json = serde_json::to_value(&d).unwrap();
        assert_eq!(json["metrics"]["totalOrders"], 4);
        assert_eq!(json["sla"]["summaries"][0]["rows"][0]["status"], "Within SLA");
        assert_eq!(json["sla"]["crosstab"]["statuses"][0], "Within SLA");
    }
}
