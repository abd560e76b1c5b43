use std::collections::HashMap;

use crate::error::AppError;

/// Order export. The load fails if one of these is absent.
pub const ORDER_REQUIRED: &[&str] = &[
    ORDER_CREATED_AT,
    ORDER_CATEGORY,
    ORDER_STATUS,
];

/// Order export. Absent columns are treated as all-missing and reported.
pub const ORDER_OPTIONAL: &[&str] = &[
    ORDER_ID,
    ORDER_READY_TO_SHIP_AT,
    ORDER_SHIPPED_AT,
    ORDER_DELIVERED_AT,
    ORDER_CANCELLED_AT,
    ORDER_DELIVERY_CITY,
    ORDER_TOTAL_VALUE,
];

pub const ORDER_ID: &str = "Network Order Id";
pub const ORDER_CATEGORY: &str = "Order Category";
pub const ORDER_STATUS: &str = "Order Status";
pub const ORDER_CREATED_AT: &str = "Order Create Date & Time";
pub const ORDER_READY_TO_SHIP_AT: &str = "Ready to Ship At Date & Time";
pub const ORDER_SHIPPED_AT: &str = "Shipped At Date & Time";
pub const ORDER_DELIVERED_AT: &str = "Delivered At Date & Time";
pub const ORDER_CANCELLED_AT: &str = "Cancelled At Date & Time";
pub const ORDER_DELIVERY_CITY: &str = "Delivery City";
pub const ORDER_TOTAL_VALUE: &str = "Total Order Value";

pub const TICKET_CONTACT_ID: &str = "Contact ID";
pub const TICKET_SUBJECT: &str = "Subject";
pub const TICKET_STATUS: &str = "Status";

/// Ticket export. Every column the analysis reads is required.
pub const TICKET_REQUIRED: &[&str] = &[TICKET_CONTACT_ID, TICKET_SUBJECT, TICKET_STATUS];

/// Maps column names to their index in a CSV record.
pub struct ColumnMap {
    indices: HashMap<String, usize>,
    headers: Vec<String>,
}

impl ColumnMap {
    /// Build a ColumnMap from the CSV header record.
    /// Header fields are trimmed of surrounding whitespace and a leading BOM.
    pub fn from_headers(headers: &csv::StringRecord) -> Self {
        let mut indices = HashMap::new();
        let mut header_list = Vec::new();
        for (i, field) in headers.iter().enumerate() {
            let name = field.trim_start_matches('\u{FEFF}').trim().to_string();
            // first occurrence wins on duplicated headers
            indices.entry(name.clone()).or_insert(i);
            header_list.push(name);
        }
        ColumnMap {
            indices,
            headers: header_list,
        }
    }

    /// Get the value of a named column from a record.
    pub fn get<'a>(&self, record: &'a csv::StringRecord, col: &str) -> Option<&'a str> {
        self.indices.get(col).and_then(|&i| record.get(i))
    }

    /// Trimmed, non-empty value of a named column. Empty cells are missing values.
    pub fn value(&self, record: &csv::StringRecord, col: &str) -> Option<String> {
        self.get(record, col)
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_string)
    }

    /// Returns true if the column is present in the CSV headers.
    pub fn has(&self, col: &str) -> bool {
        self.indices.contains_key(col)
    }

    /// All header names in order.
    pub fn all_headers(&self) -> &[String] {
        &self.headers
    }
}

/// Result of column validation.
#[derive(Debug)]
pub struct ColumnValidation {
    /// All column names present in the CSV.
    pub present: Vec<String>,
    /// Optional columns that are absent from the CSV.
    pub missing_optional: Vec<String>,
}

/// Validate that all `required` columns are present.
/// Returns `AppError::MissingColumns` if any required column is absent.
pub fn validate_columns(
    col_map: &ColumnMap,
    required: &[&str],
    optional: &[&str],
) -> Result<ColumnValidation, AppError> {
    let missing_required: Vec<String> = required
        .iter()
        .filter(|&&c| !col_map.has(c))
        .map(|c| c.to_string())
        .collect();

    if !missing_required.is_empty() {
        return Err(AppError::MissingColumns(missing_required));
    }

    let missing_optional = optional
        .iter()
        .filter(|&&c| !col_map.has(c))
        .map(|c| c.to_string())
        .collect();

    Ok(ColumnValidation {
        present: col_map.all_headers().to_vec(),
        missing_optional,
    })
}
