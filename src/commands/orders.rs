use std::time::Instant;

use crate::analyzer::dashboard::{build_order_dashboard, OrderDashboard};
use crate::config::AppConfig;
use crate::error::AppError;
use crate::export::generate_order_report;
use crate::parser::{parse_orders_csv, OrderRecord, ParseOutput};
use crate::render::{order_summary, render_order_dashboard};

use super::{stdout_text, write_export, ReportOutcome, ReportRequest};

/// Separate from the report step so read failures can be told apart.
pub fn load_orders(
    request: &ReportRequest,
    config: &AppConfig,
) -> Result<ParseOutput<OrderRecord>, AppError> {
    parse_orders_csv(&request.csv, config)
}

pub fn run_orders_report(
    request: &ReportRequest,
    output: &ParseOutput<OrderRecord>,
    config: &AppConfig,
) -> Result<ReportOutcome, AppError> {
    let dashboard = build_order_dashboard(&request.source_name(), output, config);
    log::info!(
        "Order dashboard built: {} orders, {} breaches ({}ms)",
        dashboard.metrics.total_orders,
        dashboard.breaches.len(),
        dashboard.meta.calcul_duration_ms
    );
    write_outputs(request, &dashboard, config)
}

fn write_outputs(
    request: &ReportRequest,
    dashboard: &OrderDashboard,
    config: &AppConfig,
) -> Result<ReportOutcome, AppError> {
    let mut outcome = ReportOutcome::default();

    if let Some(path) = &request.html {
        let start = Instant::now();
        let page = render_order_dashboard(dashboard, &config.currency_symbol);
        outcome.exports.push(write_export(path, page.as_bytes(), start)?);
    }
    if let Some(path) = &request.xlsx {
        let start = Instant::now();
        let bytes = generate_order_report(dashboard, &config.currency_symbol)?;
        outcome.exports.push(write_export(path, &bytes, start)?);
    }
    outcome.stdout = stdout_text(request, dashboard, || {
        order_summary(dashboard, &config.currency_symbol)
    })?;
    Ok(outcome)
}
