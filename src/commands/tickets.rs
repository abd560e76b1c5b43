use std::time::Instant;

use crate::analyzer::dashboard::{build_ticket_dashboard, TicketDashboard};
use crate::config::AppConfig;
use crate::error::AppError;
use crate::export::generate_ticket_report;
use crate::parser::{parse_tickets_csv, ParseOutput, TicketRecord};
use crate::render::{render_ticket_dashboard, ticket_summary};

use super::{stdout_text, write_export, ReportOutcome, ReportRequest};

pub fn load_tickets(
    request: &ReportRequest,
    config: &AppConfig,
) -> Result<ParseOutput<TicketRecord>, AppError> {
    parse_tickets_csv(&request.csv, config)
}

pub fn run_tickets_report(
    request: &ReportRequest,
    output: &ParseOutput<TicketRecord>,
    config: &AppConfig,
) -> Result<ReportOutcome, AppError> {
    let dashboard = build_ticket_dashboard(&request.source_name(), output, config);
    log::info!(
        "Ticket dashboard built: {} tickets, {} domains ({}ms)",
        dashboard.metrics.total_tickets,
        dashboard.top_domains.len(),
        dashboard.meta.calcul_duration_ms
    );
    write_outputs(request, &dashboard)
}

fn write_outputs(request: &ReportRequest, dashboard: &TicketDashboard) -> Result<ReportOutcome, AppError> {
    let mut outcome = ReportOutcome::default();

    if let Some(path) = &request.html {
        let start = Instant::now();
        let page = render_ticket_dashboard(dashboard);
        outcome.exports.push(write_export(path, page.as_bytes(), start)?);
    }
    if let Some(path) = &request.xlsx {
        let start = Instant::now();
        let bytes = generate_ticket_report(dashboard)?;
        outcome.exports.push(write_export(path, &bytes, start)?);
    }
    outcome.stdout = stdout_text(request, dashboard, || ticket_summary(dashboard))?;
    Ok(outcome)
}
