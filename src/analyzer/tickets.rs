use std::sync::LazyLock;

use regex::Regex;
use serde::Serialize;

use super::stats::{value_counts, CountEntry};
use crate::config::AppConfig;
use crate::parser::types::TicketRecord;

// ── Static regex ──────────────────────────────────────────────────────────────

static EMAIL_DOMAIN_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"@([\w.-]+)").expect("EMAIL_DOMAIN_REGEX: invalid pattern"));

static ORDER_SUBJECT_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)order|oid").expect("ORDER_SUBJECT_REGEX: invalid pattern"));

pub const UNKNOWN_DOMAIN: &str = "Unknown";
pub const FORWARD_PREFIX: &str = "Fwd:";

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TicketMetrics {
    pub total_tickets: usize,
    pub open_tickets: usize,
    pub waiting_tickets: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PatternCount {
    pub pattern: String,
    pub count: usize,
}

/// Domain part of the first e-mail address in `contact`, or "Unknown".
pub fn extract_email_domain(contact: Option<&str>) -> String {
    contact
        .and_then(|c| EMAIL_DOMAIN_REGEX.captures(c))
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().to_string())
        .unwrap_or_else(|| UNKNOWN_DOMAIN.to_string())
}

/// Subject mentions an order ("order", "Order", "OID"), case-insensitively.
pub fn is_order_related(subject: &str) -> bool {
    ORDER_SUBJECT_REGEX.is_match(subject)
}

/// Subject starts with "Fwd:" (case-sensitive).
pub fn is_forwarded(subject: &str) -> bool {
    subject.starts_with(FORWARD_PREFIX)
}

pub fn ticket_metrics(tickets: &[TicketRecord], config: &AppConfig) -> TicketMetrics {
    let with_status = |wanted: &str| {
        tickets
            .iter()
            .filter(|t| t.status.as_deref() == Some(wanted))
            .count()
    };
    TicketMetrics {
        total_tickets: tickets.len(),
        open_tickets: with_status(&config.open_ticket_status),
        waiting_tickets: with_status(&config.waiting_ticket_status),
    }
}

pub fn status_distribution(tickets: &[TicketRecord]) -> Vec<CountEntry> {
    value_counts(tickets.iter().map(|t| t.status.as_deref()))
}

/// The `limit` most frequent e-mail domains, "Unknown" included.
pub fn top_domains(tickets: &[TicketRecord], limit: usize) -> Vec<CountEntry> {
    let mut domains = value_counts(tickets.iter().map(|t| Some(t.email_domain.as_str())));
    domains.truncate(limit);
    domains
}

/// Order-related and forwarded subject counts. Missing subjects match neither.
pub fn pattern_counts(tickets: &[TicketRecord]) -> Vec<PatternCount> {
    let subjects: Vec<&str> = tickets.iter().filter_map(|t| t.subject.as_deref()).collect();
    vec![
        PatternCount {
            pattern: "Order Related".to_string(),
            count: subjects.iter().filter(|s| is_order_related(s)).count(),
        },
        PatternCount {
            pattern: "Forwarded Tickets".to_string(),
            count: subjects.iter().filter(|s| is_forwarded(s)).count(),
        },
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ticket(contact: Option<&str>, subject: Option<&str>, status: Option<&str>) -> TicketRecord {
        TicketRecord {
            line: 2,
            contact_id: contact.map(str::to_string),
            subject: subject.map(str::to_string),
            status: status.map(str::to_string),
            email_domain: extract_email_domain(contact),
            fields: vec![],
        }
    }

    #[test]
    fn test_extract_email_domain() {
        assert_eq!(extract_email_domain(Some("user@example.com")), "example.com");
        assert_eq!(
            extract_email_domain(Some("Asha <asha.k@mail.shop-1.co.in>")),
            "mail.shop-1.co.in"
        );
        assert_eq!(extract_email_domain(None), "Unknown");
        assert_eq!(extract_email_domain(Some("")), "Unknown");
        assert_eq!(extract_email_domain(Some("+91 98450 00000")), "Unknown");
    }

    #[test]
    fn test_order_related_matching() {
        assert!(is_order_related("Order not delivered"));
        assert!(is_order_related("where is my ORDER"));
        assert!(is_order_related("Refund for OID 12345"));
        assert!(is_order_related("reorder request"));
        assert!(!is_order_related("Payment failed"));
    }

    #[test]
    fn test_forwarded_is_prefix_and_case_sensitive() {
        assert!(is_forwarded("Fwd: refund"));
        assert!(!is_forwarded("fwd: refund"));
        assert!(!is_forwarded("Re: Fwd: refund"));
    }

    #[test]
    fn test_ticket_metrics() {
        let tickets = vec![
            ticket(None, None, Some("Open")),
            ticket(None, None, Some("Open")),
            ticket(None, None, Some("Waiting on Third Party")),
            ticket(None, None, Some("Closed")),
            ticket(None, None, None),
        ];
        let m = ticket_metrics(&tickets, &AppConfig::default());
        assert_eq!(m.total_tickets, 5);
        assert_eq!(m.open_tickets, 2);
        assert_eq!(m.waiting_tickets, 1);

        let dist = status_distribution(&tickets);
        assert_eq!(dist[0].label, "Open");
        assert_eq!(dist.iter().map(|c| c.count).sum::<usize>(), 4);
    }

    #[test]
    fn test_top_domains_limit() {
        let tickets = vec![
            ticket(Some("a@x.com"), None, None),
            ticket(Some("b@x.com"), None, None),
            ticket(Some("c@y.com"), None, None),
            ticket(None, None, None),
            ticket(Some("d@z.com"), None, None),
        ];
        let top = top_domains(&tickets, 2);
        assert_eq!(top.len(), 2);
        assert_eq!(top[0].label, "x.com");
        assert_eq!(top[0].count, 2);
        // ties broken by label: "Unknown" < "y.com" < "z.com"
        assert_eq!(top[1].label, "Unknown");
    }

    #[test]
    fn test_pattern_counts() {
        let tickets = vec![
            ticket(None, Some("Order 55 late"), None),
            ticket(None, Some("Fwd: OID 99"), None),
            ticket(None, Some("Fwd: hello"), None),
            ticket(None, Some("Login issue"), None),
            ticket(None, None, None),
        ];
        let patterns = pattern_counts(&tickets);
        assert_eq!(
            patterns,
            vec![
                PatternCount { pattern: "Order Related".into(), count: 2 },
                PatternCount { pattern: "Forwarded Tickets".into(), count: 2 },
            ]
        );
    }
}
