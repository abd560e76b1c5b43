//! Plain-text summaries printed when no output file is requested.
use std::fmt::Write as _;

use crate::analyzer::dashboard::{OrderDashboard, TicketDashboard};
use crate::analyzer::stats::CountEntry;

fn write_counts(out: &mut String, title: &str, entries: &[CountEntry]) {
    let _ = writeln!(out, "\n{title}");
    if entries.is_empty() {
        let _ = writeln!(out, "  (no data)");
    }
    for e in entries {
        let _ = writeln!(out, "  {:<28} {:>6}  {:>6.1}%", e.label, e.count, e.percentage);
    }
}

pub fn order_summary(d: &OrderDashboard, currency_symbol: &str) -> String {
    let m = &d.metrics;
    let mut out = String::new();
    let _ = writeln!(out, "ONDC Order Dashboard: {}", d.meta.source);
    let _ = writeln!(out, "  Total Orders      {}", m.total_orders);
    let _ = writeln!(out, "  Completion Rate   {:.1}%", m.completion_rate);
    let _ = writeln!(out, "  Active Orders     {}", m.active_orders);
    match m.avg_order_value {
        Some(v) => {
            let _ = writeln!(out, "  Avg Order Value   {currency_symbol}{v:.2}");
        }
        None => {
            let _ = writeln!(out, "  Avg Order Value   n/a");
        }
    }

    write_counts(&mut out, "Status Distribution", &d.status);
    write_counts(&mut out, "Category Distribution", &d.category);
    write_counts(&mut out, "City Distribution", &d.city);

    let _ = writeln!(out, "\nSLA Analysis");
    for s in &d.sla.summaries {
        let _ = write!(out, "  {:<16}", s.category);
        for r in &s.rows {
            let _ = write!(out, "  {} {} ({:.2}%)", r.status.label(), r.count, r.percentage);
        }
        let _ = writeln!(out);
    }
    let _ = writeln!(
        out,
        "  NA: {}  Invalid: {}  Breaches: {}",
        d.sla.not_applicable,
        d.sla.invalid.len(),
        d.breaches.len()
    );
    if !d.meta.warnings.is_empty() {
        let _ = writeln!(out, "\n{} parse warnings (run with -v for details)", d.meta.warnings.len());
    }
    out
}

pub fn ticket_summary(d: &TicketDashboard) -> String {
    let m = &d.metrics;
    let mut out = String::new();
    let _ = writeln!(out, "Support Ticket Analysis: {}", d.meta.source);
    let _ = writeln!(out, "  Total Tickets     {}", m.total_tickets);
    let _ = writeln!(out, "  Open Tickets      {}", m.open_tickets);
    let _ = writeln!(out, "  Waiting Tickets   {}", m.waiting_tickets);

    write_counts(&mut out, "Ticket Status Distribution", &d.status);
    write_counts(&mut out, "Top Email Domains", &d.top_domains);

    let _ = writeln!(out, "\nCommon Patterns");
    for p in &d.patterns {
        let _ = writeln!(out, "  {:<28} {:>6}", p.pattern, p.count);
    }
    out
}
