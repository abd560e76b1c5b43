use std::io::Read;
use std::path::Path;
use std::time::Instant;

use crate::error::AppError;
use crate::parser::columns::{validate_columns, ColumnMap};
use crate::parser::types::ParseWarning;

/// Output of a CSV load: carries normalized records and import metadata.
#[derive(Debug)]
pub struct ParseOutput<T> {
    pub records: Vec<T>,
    pub warnings: Vec<ParseWarning>,
    pub total_rows_processed: usize,
    pub skipped_rows: usize,
    pub detected_columns: Vec<String>,
    pub missing_optional_columns: Vec<String>,
    pub parse_duration_ms: u64,
}

/// Per-row normalisation hook: column map, record, 1-based source line, warning sink.
pub type Normalizer<'a, T> =
    dyn FnMut(&ColumnMap, &csv::StringRecord, usize, &mut Vec<ParseWarning>) -> T + 'a;

/// Open `path` and run [`parse_records`] over a buffered reader.
pub fn parse_file<T>(
    path: &Path,
    delimiter: u8,
    required: &[&str],
    optional: &[&str],
    normalize: &mut Normalizer<'_, T>,
) -> Result<ParseOutput<T>, AppError> {
    let file = std::fs::File::open(path)?;
    log::debug!("Reading {}", path.display());
    parse_records(
        std::io::BufReader::new(file),
        delimiter,
        required,
        optional,
        normalize,
    )
}

/// Core loading loop shared by the order and ticket loaders.
///
/// Column validation happens before any row is read. Rows the CSV reader
/// rejects are skipped with a warning; every other row is normalized and kept,
/// so cell-level problems only ever produce missing values.
pub fn parse_records<R: Read, T>(
    reader: R,
    delimiter: u8,
    required: &[&str],
    optional: &[&str],
    normalize: &mut Normalizer<'_, T>,
) -> Result<ParseOutput<T>, AppError> {
    let start = Instant::now();

    let mut rdr = csv::ReaderBuilder::new()
        .delimiter(delimiter)
        .has_headers(true)
        .flexible(true)
        .trim(csv::Trim::Headers)
        .double_quote(true)
        .quoting(true)
        .from_reader(reader);

    // Phase 1: validate columns
    let headers = rdr.headers()?.clone();
    if headers.is_empty() || headers.iter().all(|h| h.trim().is_empty()) {
        return Err(AppError::EmptyFile);
    }
    let col_map = ColumnMap::from_headers(&headers);
    let col_validation = validate_columns(&col_map, required, optional)?;
    if !col_validation.missing_optional.is_empty() {
        log::info!(
            "Optional columns absent: {}",
            col_validation.missing_optional.join(", ")
        );
    }

    // Phase 2: parse and normalise records
    let mut records: Vec<T> = Vec::new();
    let mut warnings: Vec<ParseWarning> = Vec::new();
    let mut skipped = 0usize;
    let mut row_idx = 0usize;

    for result in rdr.records() {
        row_idx += 1;
        match result {
            Ok(record) => {
                let line = record
                    .position()
                    .map(|p| p.line() as usize)
                    .unwrap_or(row_idx + 1);
                records.push(normalize(&col_map, &record, line, &mut warnings));
            }
            Err(err) => {
                let line = err
                    .position()
                    .map(|p| p.line() as usize)
                    .unwrap_or(row_idx + 1); // +1 for the header row
                warnings.push(ParseWarning {
                    line,
                    message: err.to_string(),
                });
                skipped += 1;
            }
        }
    }

    if row_idx == 0 {
        return Err(AppError::EmptyFile);
    }

    for w in &warnings {
        log::warn!("line {}: {}", w.line, w.message);
    }
    log::info!(
        "Loaded {} rows ({} skipped, {} warnings)",
        records.len(),
        skipped,
        warnings.len()
    );

    Ok(ParseOutput {
        records,
        warnings,
        total_rows_processed: row_idx,
        skipped_rows: skipped,
        detected_columns: col_validation.present,
        missing_optional_columns: col_validation.missing_optional,
        parse_duration_ms: start.elapsed().as_millis() as u64,
    })
}

// ─── Tests ────────────────────────────────────────────────────────────────────
