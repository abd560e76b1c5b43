use chrono::NaiveDateTime;
use serde::Serialize;

/// One row of the ONDC order export, with derived columns.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderRecord {
    /// 1-based line number in the source file (header is line 1).
    pub line: usize,
    pub network_order_id: Option<String>,
    pub category: Option<String>,
    pub status: Option<String>,
    pub created_at: Option<NaiveDateTime>,
    pub ready_to_ship_at: Option<NaiveDateTime>,
    pub shipped_at: Option<NaiveDateTime>,
    pub delivered_at: Option<NaiveDateTime>,
    pub cancelled_at: Option<NaiveDateTime>,
    pub delivery_city: Option<String>,
    pub total_order_value: Option<f64>,
    /// Hour of day (0-23) of `created_at`.
    pub order_hour: Option<u32>,
    /// Status mapped to a completion percentage; None for unmapped statuses.
    pub progress_status: Option<u8>,
}

/// One row of the support-ticket export.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TicketRecord {
    pub line: usize,
    pub contact_id: Option<String>,
    pub subject: Option<String>,
    pub status: Option<String>,
    pub email_domain: String,
    /// Every cell of the row, aligned with `ParseOutput::detected_columns`.
    pub fields: Vec<String>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ParseWarning {
    pub line: usize,
    pub message: String,
}
