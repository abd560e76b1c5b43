//! HTML dashboard rendering
//!
//! Renders each dashboard as one self-contained page with inline CSS. Charts are
//! plain CSS bars so the page works offline and prints cleanly on A4.

use chrono::NaiveDateTime;

use crate::analyzer::dashboard::{DashboardMeta, OrderDashboard, SlaAnalysis, TicketDashboard};
use crate::analyzer::orders::{BreachDetail, HourCount};
use crate::analyzer::stats::CountEntry;
use crate::analyzer::tickets::PatternCount;

/// Render the order dashboard as a full HTML page.
pub fn render_order_dashboard(d: &OrderDashboard, currency_symbol: &str) -> String {
    let m = &d.metrics;
    let avg_value = m
        .avg_order_value
        .map(|v| format!("{}{:.2}", currency_symbol, v))
        .unwrap_or_else(|| "n/a".to_string());

    let metrics = render_metrics(&[
        ("Total Orders", m.total_orders.to_string()),
        ("Completion Rate", format!("{:.1}%", m.completion_rate)),
        ("Active Orders", m.active_orders.to_string()),
        ("Avg Order Value", html_escape(&avg_value)),
    ]);

    let body = [
        section("Key Metrics", &metrics),
        section("Order Distribution", &render_hourly_chart(&d.hourly)),
        section(
            "Status Distribution",
            &render_bar_chart("Order Status Distribution", &d.status),
        ),
        section(
            "Category Distribution",
            &render_bar_chart("Orders by Category", &d.category),
        ),
        section(
            "City Distribution",
            &render_bar_chart("Orders by City", &d.city),
        ),
        section("SLA Analysis", &render_sla_analysis(&d.sla)),
        section("SLA Breach Details", &render_breaches(&d.breaches)),
    ]
    .concat();

    page("ONDC Order Dashboard", &d.meta, &body)
}

/// Render the support-ticket dashboard as a full HTML page.
pub fn render_ticket_dashboard(d: &TicketDashboard) -> String {
    let m = &d.metrics;
    let metrics = render_metrics(&[
        ("Total Tickets", m.total_tickets.to_string()),
        ("Open Tickets", m.open_tickets.to_string()),
        ("Waiting Tickets", m.waiting_tickets.to_string()),
    ]);

    let details = render_table(
        &d.details.columns.iter().map(String::as_str).collect::<Vec<_>>(),
        d.details.rows.iter().map(|row| {
            (0..d.details.columns.len())
                .map(|i| html_escape(row.get(i).map(String::as_str).unwrap_or("")))
                .collect()
        }),
    );

    let body = [
        section("Key Metrics", &metrics),
        section(
            "Ticket Status Distribution",
            &render_bar_chart("Ticket Status Distribution", &d.status),
        ),
        section(
            "Top Email Domains",
            &render_bar_chart(
                &format!("Top {} Email Domains", d.top_domains.len()),
                &d.top_domains,
            ),
        ),
        section("Common Patterns in Tickets", &render_patterns(&d.patterns)),
        section("Ticket Details", &details),
    ]
    .concat();

    page("Support Ticket Analysis Dashboard", &d.meta, &body)
}

fn page(title: &str, meta: &DashboardMeta, body: &str) -> String {
    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <title>{title}</title>
    <style>{css}</style>
</head>
<body>
    <main class="main">
        <h1>{title}</h1>
        {header}
        {body}
    </main>
</body>
</html>"#,
        title = html_escape(title),
        css = inline_css(),
        header = render_meta(meta),
        body = body,
    )
}

fn inline_css() -> &'static str {
    r#"
.main { max-width: 21cm; margin: auto; padding: 1cm; font-family: -apple-system, "Segoe UI", Roboto, sans-serif; color: #2c3e50; }
h1, h2, h3 { color: #2c3e50; margin-bottom: 0.5cm; }
.container { background: #fff; padding: 0.5cm; margin-bottom: 1cm; border: 1px solid #ddd; border-radius: 5px; break-inside: avoid; }
.source { font-size: 12px; color: #6c757d; margin-bottom: 0.5cm; }
.warnings { font-size: 12px; color: #9c6500; background: #fff8e1; padding: 0.3cm; border-radius: 5px; }
.metrics { display: flex; flex-wrap: wrap; gap: 0.5cm; }
.metric-container { padding: 0.5cm; background: #f8f9fa; border-radius: 5px; min-width: 3.5cm; }
.metric-label { font-size: 12px; color: #6c757d; }
.metric-value { font-size: 24px; font-weight: 600; }
.chart h3 { font-size: 14px; }
.bar-row { display: flex; align-items: center; gap: 8px; margin: 4px 0; font-size: 12px; }
.bar-label { width: 30%; overflow: hidden; text-overflow: ellipsis; white-space: nowrap; }
.bar-track { flex: 1; background: #eef2f5; border-radius: 3px; }
.bar { height: 14px; background: #2c5f8a; border-radius: 3px; }
.bar-value { width: 20%; text-align: right; }
.dataframe { font-size: 12px; width: 100%; border-collapse: collapse; margin-bottom: 0.5cm; }
.dataframe th { background: #2c5f8a; color: #fff; text-align: left; padding: 4px 6px; }
.dataframe td { border-bottom: 1px solid #eee; padding: 4px 6px; }
.empty { font-style: italic; color: #6c757d; }
@media print {
    @page { size: A4; margin: 1cm; }
    body { width: 21cm; }
    .container { break-inside: avoid; }
}
"#
}

fn render_meta(meta: &DashboardMeta) -> String {
    let mut s = format!(
        r#"<div class="source">Source: {source} · {rows} rows · {skipped} skipped</div>"#,
        source = html_escape(&meta.source),
        rows = meta.total_rows,
        skipped = meta.skipped_rows,
    );
    if !meta.warnings.is_empty() {
        s.push_str(&format!(
            r#"<details class="warnings"><summary>{} parse warnings</summary><ul>"#,
            meta.warnings.len()
        ));
        for w in &meta.warnings {
            s.push_str(&format!(
                "<li>line {}: {}</li>",
                w.line,
                html_escape(&w.message)
            ));
        }
        s.push_str("</ul></details>");
    }
    s
}

fn section(title: &str, content: &str) -> String {
    format!(
        r#"<div class="container"><h2>{}</h2>{}</div>"#,
        html_escape(title),
        content
    )
}

/// `value` is inserted as-is; callers escape user data.
fn render_metrics(metrics: &[(&str, String)]) -> String {
    let cards: String = metrics
        .iter()
        .map(|(label, value)| {
            format!(
                r#"<div class="metric-container"><div class="metric-label">{}</div><div class="metric-value">{}</div></div>"#,
                html_escape(label),
                value
            )
        })
        .collect();
    format!(r#"<div class="metrics">{}</div>"#, cards)
}

fn render_bars(title: &str, bars: impl Iterator<Item = (String, usize, String)>) -> String {
    let bars: Vec<(String, usize, String)> = bars.collect();
    if bars.is_empty() {
        return format!(
            r#"<div class="chart"><h3>{}</h3><p class="empty">No data</p></div>"#,
            html_escape(title)
        );
    }
    let max = bars.iter().map(|(_, c, _)| *c).max().unwrap_or(1).max(1);
    let rows: String = bars
        .iter()
        .map(|(label, count, value)| {
            format!(
                r#"<div class="bar-row"><div class="bar-label" title="{label}">{label}</div><div class="bar-track"><div class="bar" style="width:{width:.1}%"></div></div><div class="bar-value">{value}</div></div>"#,
                label = html_escape(label),
                width = *count as f64 / max as f64 * 100.0,
                value = html_escape(value),
            )
        })
        .collect();
    format!(
        r#"<div class="chart"><h3>{}</h3>{}</div>"#,
        html_escape(title),
        rows
    )
}

fn render_bar_chart(title: &str, entries: &[CountEntry]) -> String {
    render_bars(
        title,
        entries
            .iter()
            .map(|e| (e.label.clone(), e.count, format!("{} ({:.1}%)", e.count, e.percentage))),
    )
}

fn render_hourly_chart(hours: &[HourCount]) -> String {
    render_bars(
        "Hourly Order Distribution",
        hours
            .iter()
            .map(|h| (format!("{:02}:00", h.hour), h.count, h.count.to_string())),
    )
}

fn render_patterns(patterns: &[PatternCount]) -> String {
    render_bars(
        "Common Ticket Patterns",
        patterns
            .iter()
            .map(|p| (p.pattern.clone(), p.count, p.count.to_string())),
    )
}

/// `rows` cells are inserted as-is; callers escape user data.
fn render_table(headers: &[&str], rows: impl Iterator<Item = Vec<String>>) -> String {
    let head: String = headers
        .iter()
        .map(|h| format!("<th>{}</th>", html_escape(h)))
        .collect();
    let body: String = rows
        .map(|cells| {
            let tds: String = cells.iter().map(|c| format!("<td>{}</td>", c)).collect();
            format!("<tr>{}</tr>", tds)
        })
        .collect();
    format!(
        r#"<table class="dataframe"><thead><tr>{}</tr></thead><tbody>{}</tbody></table>"#,
        head, body
    )
}

fn render_sla_analysis(sla: &SlaAnalysis) -> String {
    let mut s = String::new();

    for summary in &sla.summaries {
        s.push_str(&format!(
            "<h3>{} SLA Performance</h3>",
            html_escape(&summary.category)
        ));
        s.push_str(&render_table(
            &["Status", "Count", "Percentage"],
            summary.rows.iter().map(|r| {
                vec![
                    r.status.label().to_string(),
                    r.count.to_string(),
                    format!("{:.2}", r.percentage),
                ]
            }),
        ));
        s.push_str(&format!(
            r#"<p class="source">Median delivery {:.2}h · p90 {:.2}h</p>"#,
            summary.median_hours, summary.p90_hours
        ));
    }

    s.push_str(&render_bar_chart("Overall SLA Performance", &sla.overall));

    let tab = &sla.crosstab;
    let mut headers = vec!["Order Category"];
    headers.extend(tab.statuses.iter().map(|st| st.label()));
    s.push_str("<h3>Category-wise SLA Performance</h3>");
    s.push_str(&render_table(
        &headers,
        tab.rows.iter().map(|row| {
            std::iter::once(html_escape(&row.category))
                .chain(row.counts.iter().map(|c| c.to_string()))
                .collect()
        }),
    ));

    if !sla.invalid.is_empty() {
        s.push_str(&format!(
            "<h3>Inconsistent Timestamps ({})</h3>",
            sla.invalid.len()
        ));
        s.push_str(&render_table(
            &["Line", "Network Order Id", "Problem"],
            sla.invalid.iter().map(|diag| {
                vec![
                    diag.line.to_string(),
                    html_escape(diag.network_order_id.as_deref().unwrap_or("")),
                    html_escape(&diag.message),
                ]
            }),
        ));
    }
    s
}

fn format_ts(ts: Option<NaiveDateTime>) -> String {
    ts.map(|dt| dt.format("%Y-%m-%d %H:%M").to_string())
        .unwrap_or_default()
}

fn render_breaches(breaches: &[BreachDetail]) -> String {
    if breaches.is_empty() {
        return r#"<p class="empty">No SLA breaches found</p>"#.to_string();
    }
    render_table(
        &[
            "Network Order Id",
            "Order Category",
            "Order Create Date & Time",
            "Delivered At Date & Time",
            "Delivery Time (Hours)",
            "Delivery City",
        ],
        breaches.iter().map(|b| {
            vec![
                html_escape(b.network_order_id.as_deref().unwrap_or("")),
                html_escape(b.category.as_deref().unwrap_or("")),
                format_ts(b.created_at),
                format_ts(b.delivered_at),
                format!("{:.2}", b.delivery_hours),
                html_escape(b.delivery_city.as_deref().unwrap_or("")),
            ]
        }),
    )
}

fn html_escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#39;")
}
