use rust_xlsxwriter::{Workbook, XlsxError};

use crate::analyzer::dashboard::{TicketDashboard, TicketDetails};
use crate::analyzer::tickets::{PatternCount, TicketMetrics};
use crate::error::AppError;
use crate::export::{create_integer_format, write_count_sheet, write_headers};

/// Ticket dashboard as XLSX bytes: metrics, status, domains, patterns, raw rows.
pub fn generate_ticket_report(d: &TicketDashboard) -> Result<Vec<u8>, AppError> {
    let mut wb = Workbook::new();
    write_metrics(&mut wb, &d.metrics)?;
    write_count_sheet(wb.add_worksheet(), "Status", "Status", &d.status)?;
    write_count_sheet(wb.add_worksheet(), "Email Domains", "Email Domain", &d.top_domains)?;
    write_patterns(&mut wb, &d.patterns)?;
    write_details(&mut wb, &d.details)?;
    Ok(wb.save_to_buffer()?)
}

fn write_metrics(wb: &mut Workbook, m: &TicketMetrics) -> Result<(), XlsxError> {
    let ws = wb.add_worksheet();
    ws.set_name("Key Metrics")?;
    let int = create_integer_format();

    write_headers(ws, 0, &["Metric", "Value"])?;
    let rows = [
        ("Total Tickets", m.total_tickets),
        ("Open Tickets", m.open_tickets),
        ("Waiting on Third Party", m.waiting_tickets),
    ];
    for (i, (label, value)) in rows.iter().enumerate() {
        let row = (i + 1) as u32;
        ws.write(row, 0, *label)?;
        ws.write_with_format(row, 1, *value as f64, &int)?;
    }
    ws.set_column_width(0, 26)?;
    ws.set_column_width(1, 12)?;
    Ok(())
}

fn write_patterns(wb: &mut Workbook, patterns: &[PatternCount]) -> Result<(), XlsxError> {
    let ws = wb.add_worksheet();
    ws.set_name("Patterns")?;
    let int = create_integer_format();

    write_headers(ws, 0, &["Pattern", "Count"])?;
    for (i, p) in patterns.iter().enumerate() {
        let row = (i + 1) as u32;
        ws.write(row, 0, p.pattern.as_str())?;
        ws.write_with_format(row, 1, p.count as f64, &int)?;
    }
    ws.set_column_width(0, 24)?;
    ws.set_column_width(1, 12)?;
    Ok(())
}

/// Raw ticket rows with the file's own header line.
fn write_details(wb: &mut Workbook, details: &TicketDetails) -> Result<(), XlsxError> {
    let ws = wb.add_worksheet();
    ws.set_name("Ticket Details")?;

    let headers: Vec<&str> = details.columns.iter().map(String::as_str).collect();
    write_headers(ws, 0, &headers)?;
    for (i, fields) in details.rows.iter().enumerate() {
        let row = (i + 1) as u32;
        for (col, value) in fields.iter().enumerate().take(headers.len()) {
            ws.write(row, col as u16, value.as_str())?;
        }
    }

    if !details.rows.is_empty() && !headers.is_empty() {
        ws.set_freeze_panes(1, 0)?;
        ws.autofilter(0, 0, details.rows.len() as u32, (headers.len() - 1) as u16)?;
    }
    for col in 0..headers.len() {
        ws.set_column_width(col as u16, 20)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analyzer::dashboard::build_ticket_dashboard;
    use crate::config::AppConfig;
    use crate::parser::parse_tickets_reader;

    #[test]
    fn test_generate_ticket_report_xlsx_signature() {
        let config = AppConfig::default();
        let out = parse_tickets_reader(
            "Ticket ID,Contact ID,Subject,Status\n\
             1,ravi@store.in,Order delayed,Open\n\
             2,,Fwd: invoice,Waiting on Third Party"
                .as_bytes(),
            &config,
        )
        .unwrap();
        let d = build_ticket_dashboard("tickets.csv", &out, &config);
        let bytes = generate_ticket_report(&d).unwrap();
        assert!(bytes.len() > 4, "XLSX too small");
        assert_eq!(bytes[0], 0x50);
        assert_eq!(bytes[1], 0x4B);
    }
}
