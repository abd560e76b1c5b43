use std::io::Read;
use std::path::Path;

use chrono::{NaiveDateTime, Timelike};

use crate::config::AppConfig;
use crate::error::AppError;
use crate::parser::columns::*;
use crate::parser::deserializers::{
    lenient_amount, lenient_dmy_datetime, lenient_iso_datetime, Lenient,
};
use crate::parser::pipeline::{parse_file, parse_records, ParseOutput};
use crate::parser::types::{OrderRecord, ParseWarning};

/// Load an ONDC order export from `path`.
pub fn parse_orders_csv(
    path: &Path,
    config: &AppConfig,
) -> Result<ParseOutput<OrderRecord>, AppError> {
    parse_file(
        path,
        config.delimiter_byte(),
        ORDER_REQUIRED,
        ORDER_OPTIONAL,
        &mut |cm, r, line, w| normalize_order(cm, r, line, config, w),
    )
}

/// Same as [`parse_orders_csv`] over any `Read` source, useful for tests.
pub fn parse_orders_reader<R: Read>(
    reader: R,
    config: &AppConfig,
) -> Result<ParseOutput<OrderRecord>, AppError> {
    parse_records(
        reader,
        config.delimiter_byte(),
        ORDER_REQUIRED,
        ORDER_OPTIONAL,
        &mut |cm, r, line, w| normalize_order(cm, r, line, config, w),
    )
}

fn normalize_order(
    col_map: &ColumnMap,
    record: &csv::StringRecord,
    line: usize,
    config: &AppConfig,
    warnings: &mut Vec<ParseWarning>,
) -> OrderRecord {
    let mut lenient_ts = |col: &str, parse: fn(&str) -> Lenient<NaiveDateTime>| {
        let cell = col_map.get(record, col).unwrap_or("");
        match parse(cell) {
            Lenient::Parsed(dt) => Some(dt),
            Lenient::Empty => None,
            Lenient::Invalid(raw) => {
                warnings.push(ParseWarning {
                    line,
                    message: format!("Unparseable {}: {:?}", col, raw),
                });
                None
            }
        }
    };

    let created_at = lenient_ts(ORDER_CREATED_AT, lenient_dmy_datetime);
    let ready_to_ship_at = lenient_ts(ORDER_READY_TO_SHIP_AT, lenient_iso_datetime);
    let shipped_at = lenient_ts(ORDER_SHIPPED_AT, lenient_iso_datetime);
    let delivered_at = lenient_ts(ORDER_DELIVERED_AT, lenient_iso_datetime);
    let cancelled_at = lenient_ts(ORDER_CANCELLED_AT, lenient_iso_datetime);

    let total_order_value = match lenient_amount(col_map.get(record, ORDER_TOTAL_VALUE).unwrap_or(""))
    {
        Lenient::Parsed(v) => Some(v),
        Lenient::Empty => None,
        Lenient::Invalid(raw) => {
            warnings.push(ParseWarning {
                line,
                message: format!("Unparseable {}: {:?}", ORDER_TOTAL_VALUE, raw),
            });
            None
        }
    };

    let status = col_map.value(record, ORDER_STATUS);
    let progress_status = status
        .as_deref()
        .and_then(|s| config.progress_mapping.get(s).copied());

    OrderRecord {
        line,
        network_order_id: col_map.value(record, ORDER_ID),
        category: col_map.value(record, ORDER_CATEGORY),
        status,
        created_at,
        ready_to_ship_at,
        shipped_at,
        delivered_at,
        cancelled_at,
        delivery_city: col_map.value(record, ORDER_DELIVERY_CITY),
        total_order_value,
        order_hour: created_at.map(|dt| dt.hour()),
        progress_status,
    }
}

// ─── Tests ────────────────────────────────────────────────────────────────────
