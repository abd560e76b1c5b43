pub mod order_report;
pub mod ticket_report;

use rust_xlsxwriter::{Format, FormatBorder, Worksheet, XlsxError};

use crate::analyzer::stats::CountEntry;

pub use order_report::generate_order_report;
pub use ticket_report::generate_ticket_report;

/// Blue #2C5F8A header, white bold text, thin border.
pub fn create_header_format() -> Format {
    Format::new()
        .set_bold()
        .set_background_color("2C5F8A")
        .set_font_color("FFFFFF")
        .set_font_size(11)
        .set_border(FormatBorder::Thin)
        .set_text_wrap()
}

/// Decimal #,##0.00
pub fn create_number_format() -> Format {
    Format::new().set_num_format("#,##0.00")
}

/// Integer #,##0
pub fn create_integer_format() -> Format {
    Format::new().set_num_format("#,##0")
}

/// Percentage 0.00%. Cells hold ratios, not percents.
pub fn create_percent_format() -> Format {
    Format::new().set_num_format("0.00%")
}

/// Write a header row at `row`.
pub fn write_headers(ws: &mut Worksheet, row: u32, headers: &[&str]) -> Result<(), XlsxError> {
    let hdr = create_header_format();
    for (col, h) in headers.iter().enumerate() {
        ws.write_with_format(row, col as u16, *h, &hdr)?;
    }
    Ok(())
}

/// Write a label / count / percentage table with its header at `start_row`.
/// Returns the first free row after the table.
pub fn write_count_table(
    ws: &mut Worksheet,
    start_row: u32,
    label_header: &str,
    entries: &[CountEntry],
) -> Result<u32, XlsxError> {
    let int = create_integer_format();
    let pct = create_percent_format();

    write_headers(ws, start_row, &[label_header, "Count", "%"])?;
    for (i, e) in entries.iter().enumerate() {
        let row = start_row + 1 + i as u32;
        ws.write(row, 0, e.label.as_str())?;
        ws.write_with_format(row, 1, e.count as f64, &int)?;
        ws.write_with_format(row, 2, e.percentage / 100.0, &pct)?;
    }
    Ok(start_row + 1 + entries.len() as u32)
}

/// Single-table sheet with frozen header and autofilter.
pub fn write_count_sheet(
    ws: &mut Worksheet,
    name: &str,
    label_header: &str,
    entries: &[CountEntry],
) -> Result<(), XlsxError> {
    ws.set_name(name)?;
    write_count_table(ws, 0, label_header, entries)?;
    if !entries.is_empty() {
        ws.set_freeze_panes(1, 0)?;
        ws.autofilter(0, 0, entries.len() as u32, 2)?;
    }
    ws.set_column_width(0, 30)?;
    ws.set_column_width(1, 12)?;
    ws.set_column_width(2, 10)?;
    Ok(())
}
