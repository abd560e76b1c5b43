use rust_xlsxwriter::{Workbook, XlsxError};

use crate::analyzer::dashboard::{OrderDashboard, SlaAnalysis};
use crate::analyzer::orders::{BreachDetail, HourCount, OrderMetrics};
use crate::error::AppError;
use crate::export::{
    create_integer_format, create_number_format, create_percent_format, write_count_sheet,
    write_headers,
};

/// Order dashboard as a 7-sheet workbook, returned as XLSX bytes.
pub fn generate_order_report(d: &OrderDashboard, currency_symbol: &str) -> Result<Vec<u8>, AppError> {
    let mut wb = Workbook::new();
    write_metrics(&mut wb, &d.metrics, currency_symbol)?;
    write_hourly(&mut wb, &d.hourly)?;
    write_count_sheet(wb.add_worksheet(), "Status", "Order Status", &d.status)?;
    write_count_sheet(wb.add_worksheet(), "Categories", "Order Category", &d.category)?;
    write_count_sheet(wb.add_worksheet(), "Cities", "Delivery City", &d.city)?;
    write_sla(&mut wb, &d.sla)?;
    write_breaches(&mut wb, &d.breaches)?;
    Ok(wb.save_to_buffer()?)
}

// ── Sheet 1: Key metrics ──────────────────────────────────────────────────────

fn write_metrics(wb: &mut Workbook, m: &OrderMetrics, currency_symbol: &str) -> Result<(), XlsxError> {
    let ws = wb.add_worksheet();
    ws.set_name("Key Metrics")?;

    let int = create_integer_format();
    let num = create_number_format();
    let pct = create_percent_format();

    write_headers(ws, 0, &["Metric", "Value"])?;
    ws.write(1, 0, "Total Orders")?;
    ws.write_with_format(1, 1, m.total_orders as f64, &int)?;
    ws.write(2, 0, "Completion Rate")?;
    ws.write_with_format(2, 1, m.completion_rate / 100.0, &pct)?;
    ws.write(3, 0, "Active Orders")?;
    ws.write_with_format(3, 1, m.active_orders as f64, &int)?;
    ws.write(4, 0, format!("Avg Order Value ({currency_symbol})"))?;
    match m.avg_order_value {
        Some(v) => ws.write_with_format(4, 1, v, &num)?,
        None => ws.write(4, 1, "n/a")?,
    };
    ws.write(5, 0, "Avg Progress (%)")?;
    match m.avg_progress {
        Some(v) => ws.write_with_format(5, 1, v, &num)?,
        None => ws.write(5, 1, "n/a")?,
    };

    ws.set_column_width(0, 26)?;
    ws.set_column_width(1, 14)?;
    Ok(())
}

// ── Sheet 2: Hourly distribution ──────────────────────────────────────────────

fn write_hourly(wb: &mut Workbook, hours: &[HourCount]) -> Result<(), XlsxError> {
    let ws = wb.add_worksheet();
    ws.set_name("Hourly")?;

    let int = create_integer_format();
    write_headers(ws, 0, &["Hour of Day", "Number of Orders"])?;
    for (i, h) in hours.iter().enumerate() {
        let row = (i + 1) as u32;
        ws.write_with_format(row, 0, h.hour as f64, &int)?;
        ws.write_with_format(row, 1, h.count as f64, &int)?;
    }
    ws.set_column_width(0, 14)?;
    ws.set_column_width(1, 18)?;
    Ok(())
}

// ── Sheet 6: SLA ──────────────────────────────────────────────────────────────

fn write_sla(wb: &mut Workbook, sla: &SlaAnalysis) -> Result<(), XlsxError> {
    let ws = wb.add_worksheet();
    ws.set_name("SLA")?;

    let int = create_integer_format();
    let num = create_number_format();
    let pct = create_percent_format();

    // Per-category summaries
    write_headers(
        ws,
        0,
        &["Order Category", "Status", "Count", "Percentage", "Median (h)", "P90 (h)"],
    )?;
    let mut row = 1u32;
    for s in &sla.summaries {
        for r in &s.rows {
            ws.write(row, 0, s.category.as_str())?;
            ws.write(row, 1, r.status.label())?;
            ws.write_with_format(row, 2, r.count as f64, &int)?;
            ws.write_with_format(row, 3, r.percentage / 100.0, &pct)?;
            ws.write_with_format(row, 4, s.median_hours, &num)?;
            ws.write_with_format(row, 5, s.p90_hours, &num)?;
            row += 1;
        }
    }

    // Crosstab
    row += 1;
    let tab = &sla.crosstab;
    let mut headers = vec!["Order Category"];
    headers.extend(tab.statuses.iter().map(|st| st.label()));
    write_headers(ws, row, &headers)?;
    for r in &tab.rows {
        row += 1;
        ws.write(row, 0, r.category.as_str())?;
        for (col, count) in r.counts.iter().enumerate() {
            ws.write_with_format(row, (col + 1) as u16, *count as f64, &int)?;
        }
    }

    // Inconsistent timestamps
    if !sla.invalid.is_empty() {
        row += 2;
        write_headers(ws, row, &["Line", "Network Order Id", "Problem"])?;
        for diag in &sla.invalid {
            row += 1;
            ws.write_with_format(row, 0, diag.line as f64, &int)?;
            ws.write(row, 1, diag.network_order_id.as_deref().unwrap_or(""))?;
            ws.write(row, 2, diag.message.as_str())?;
        }
    }

    ws.set_column_width(0, 22)?;
    ws.set_column_width(1, 20)?;
    for col in 2u16..=5 {
        ws.set_column_width(col, 14)?;
    }
    Ok(())
}

// ── Sheet 7: Breaches ─────────────────────────────────────────────────────────

fn write_breaches(wb: &mut Workbook, breaches: &[BreachDetail]) -> Result<(), XlsxError> {
    let ws = wb.add_worksheet();
    ws.set_name("SLA Breaches")?;

    let num = create_number_format();
    let headers = [
        "Network Order Id",
        "Order Category",
        "Order Create Date & Time",
        "Delivered At Date & Time",
        "Delivery Time (Hours)",
        "Delivery City",
    ];
    write_headers(ws, 0, &headers)?;

    let fmt_ts = |ts: Option<chrono::NaiveDateTime>| {
        ts.map(|dt| dt.format("%Y-%m-%d %H:%M").to_string())
            .unwrap_or_default()
    };
    for (i, b) in breaches.iter().enumerate() {
        let row = (i + 1) as u32;
        ws.write(row, 0, b.network_order_id.as_deref().unwrap_or(""))?;
        ws.write(row, 1, b.category.as_deref().unwrap_or(""))?;
        ws.write(row, 2, fmt_ts(b.created_at))?;
        ws.write(row, 3, fmt_ts(b.delivered_at))?;
        ws.write_with_format(row, 4, b.delivery_hours, &num)?;
        ws.write(row, 5, b.delivery_city.as_deref().unwrap_or(""))?;
    }

    if !breaches.is_empty() {
        ws.set_freeze_panes(1, 0)?;
        ws.autofilter(0, 0, breaches.len() as u32, (headers.len() - 1) as u16)?;
    }
    for col in 0u16..headers.len() as u16 {
        ws.set_column_width(col, 22)?;
    }
    Ok(())
}

// ── Tests ─────────────────────────────────────────────────────────────────────
