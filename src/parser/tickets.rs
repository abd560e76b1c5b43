use std::io::Read;
use std::path::Path;

use crate::analyzer::tickets::extract_email_domain;
use crate::config::AppConfig;
use crate::error::AppError;
use crate::parser::columns::{
    ColumnMap, TICKET_CONTACT_ID, TICKET_REQUIRED, TICKET_STATUS, TICKET_SUBJECT,
};
use crate::parser::pipeline::{parse_file, parse_records, ParseOutput};
use crate::parser::types::{ParseWarning, TicketRecord};

/// Load a support-ticket export from `path`.
pub fn parse_tickets_csv(
    path: &Path,
    config: &AppConfig,
) -> Result<ParseOutput<TicketRecord>, AppError> {
    parse_file(
        path,
        config.delimiter_byte(),
        TICKET_REQUIRED,
        &[],
        &mut normalize_ticket,
    )
}

pub fn parse_tickets_reader<R: Read>(
    reader: R,
    config: &AppConfig,
) -> Result<ParseOutput<TicketRecord>, AppError> {
    parse_records(
        reader,
        config.delimiter_byte(),
        TICKET_REQUIRED,
        &[],
        &mut normalize_ticket,
    )
}

fn normalize_ticket(
    col_map: &ColumnMap,
    record: &csv::StringRecord,
    line: usize,
    _warnings: &mut Vec<ParseWarning>,
) -> TicketRecord {
    let contact_id = col_map.value(record, TICKET_CONTACT_ID);
    let email_domain = extract_email_domain(contact_id.as_deref());

    TicketRecord {
        line,
        contact_id,
        // untrimmed so the "Fwd:" prefix test sees the cell as exported
        subject: col_map
            .get(record, TICKET_SUBJECT)
            .filter(|s| !s.is_empty())
            .map(str::to_string),
        status: col_map.value(record, TICKET_STATUS),
        email_domain,
        fields: record.iter().map(str::to_string).collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(csv: &str) -> ParseOutput<TicketRecord> {
        parse_tickets_reader(csv.as_bytes(), &AppConfig::default()).unwrap()
    }

    #[test]
    fn test_ticket_fields_and_domain() {
        let out = parse(
            "Ticket ID,Contact ID,Subject,Status\n\
             T1,asha@shop.example.in,Order not delivered,Open\n\
             T2,,Fwd: refund,Closed",
        );
        assert_eq!(out.records.len(), 2);
        let t = &out.records[0];
        assert_eq!(t.email_domain, "shop.example.in");
        assert_eq!(t.subject.as_deref(), Some("Order not delivered"));
        assert_eq!(t.status.as_deref(), Some("Open"));
        assert_eq!(t.fields, vec!["T1", "asha@shop.example.in", "Order not delivered", "Open"]);
        assert_eq!(out.records[1].email_domain, "Unknown");
        assert!(out.records[1].contact_id.is_none());
        assert_eq!(out.detected_columns[0], "Ticket ID");
    }

    #[test]
    fn test_indented_fwd_subject_is_not_forwarded() {
        let out = parse(
            "Contact ID,Subject,Status\n\
             a@b.in,\"  Fwd: refund\",Open\n\
             a@b.in,Fwd: refund,Open\n\
             a@b.in,,Open",
        );
        assert_eq!(out.records[0].subject.as_deref(), Some("  Fwd: refund"));
        assert!(out.records[2].subject.is_none());
        let patterns = crate::analyzer::tickets::pattern_counts(&out.records);
        assert_eq!(patterns[1].pattern, "Forwarded Tickets");
        assert_eq!(patterns[1].count, 1);
    }

    #[test]
    fn test_missing_ticket_columns() {
        let err = parse_tickets_reader("Subject\nhello".as_bytes(), &AppConfig::default())
            .unwrap_err();
        assert_eq!(err.to_string(), "Missing required columns: Contact ID, Status");
    }

    #[test]
    fn test_parse_tickets_csv_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let err = parse_tickets_csv(&dir.path().join("absent.csv"), &AppConfig::default())
            .unwrap_err();
        assert!(matches!(err, AppError::Io(_)));
    }
}
