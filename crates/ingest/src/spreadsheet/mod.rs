//! Spreadsheet → signal ingestion.
//!
//! Only the first sheet is read. Its first row must carry the four
//! labels `Numero`, `Data`, `Horario` and `ID` (any order, any case,
//! accents ignored); every later row becomes a [`Signal`] when all four
//! cells are present. Incomplete rows are skipped, not reported.

mod cells;
mod columns;
mod normalize;


use std::io::Cursor;

use calamine::{open_workbook_auto_from_rs, Reader};
use thiserror::Error;
use tracing::{debug, info};

use alerta_core::Signal;

pub use columns::{fold_label, resolve_columns, ColumnIndex, REQUIRED_LABELS};
pub use normalize::{normalize_row, serial_to_date};

/// The upload cannot be turned into signals.
#[derive(Debug, Error)]
pub enum FormatError {
    #[error("unreadable spreadsheet: {0}")]
    Unreadable(String),

    #[error("no sheets found in spreadsheet")]
    NoSheets,

    #[error("spreadsheet must have headers and at least one data row")]
    NoDataRows,

    #[error(
        "missing required columns: spreadsheet must have Numero, Data, Horario, ID (not found: {})",
        .missing.join(", ")
    )]
    MissingColumns { missing: Vec<&'static str> },

    #[error("no valid signal rows found in spreadsheet")]
    NoValidSignals,
}

/// Parse spreadsheet bytes (xlsx, xls, xlsb or ods, detected by content)
/// into signals, in sheet order.
pub fn ingest(bytes: &[u8]) -> Result<Vec<Signal>, FormatError> {
    let mut workbook = open_workbook_auto_from_rs(Cursor::new(bytes))
        .map_err(|e| FormatError::Unreadable(e.to_string()))?;

    let range = workbook
        .worksheet_range_at(0)
        .ok_or(FormatError::NoSheets)?
        .map_err(|e| FormatError::Unreadable(e.to_string()))?;

    if range.height() < 2 {
        return Err(FormatError::NoDataRows);
    }

    let mut rows = range.rows();
    let header = rows.next().ok_or(FormatError::NoDataRows)?;
    let columns = resolve_columns(header)?;

    let mut signals = Vec::with_capacity(range.height() - 1);
    for (offset, row) in rows.enumerate() {
        match normalize_row(row, &columns) {
            Some(signal) => signals.push(signal),
            None => debug!(row = offset + 2, "skipping incomplete spreadsheet row"),
        }
    }

    if signals.is_empty() {
        return Err(FormatError::NoValidSignals);
    }

    info!(
        rows = range.height() - 1,
        signals = signals.len(),
        "spreadsheet ingested"
    );
    Ok(signals)
}
