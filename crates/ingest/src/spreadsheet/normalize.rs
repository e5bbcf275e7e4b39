use calamine::Data;
use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::{Decimal, RoundingStrategy};

use alerta_core::Signal;

use super::cells::{cell_text, is_blank};
use super::columns::ColumnIndex;

/// Days between the spreadsheet epoch (1899-12-30) and 1970-01-01.
const UNIX_EPOCH_SERIAL: f64 = 25_569.0;
const MS_PER_DAY: f64 = 86_400_000.0;

static EMPTY_CELL: Data = Data::Empty;

/// Turn one data row into a signal. `None` when the row is empty or any
/// of the four cells is blank; missing trailing cells count as blank.
pub fn normalize_row(row: &[Data], columns: &ColumnIndex) -> Option<Signal> {
    if row.iter().all(is_blank) {
        return None;
    }

    let cell = |idx: usize| row.get(idx).unwrap_or(&EMPTY_CELL);
    let (numero, data, horario, id) = (
        cell(columns.numero),
        cell(columns.data),
        cell(columns.horario),
        cell(columns.id),
    );
    if [numero, data, horario, id].into_iter().any(is_blank) {
        return None;
    }

    Some(Signal {
        numero: numero_text(numero),
        date: date_text(data),
        time: cell_text(horario),
        external_id: cell_text(id),
    })
}

/// Numeric cells get two fixed decimals; text is kept as written.
fn numero_text(cell: &Data) -> String {
    match cell {
        Data::Float(f) => two_decimals(*f),
        Data::Int(i) => two_decimals(*i as f64),
        other => cell_text(other),
    }
}

/// Round the exact binary value to cents, ties away from zero: 2.125 is
/// "2.13", while 1.005 (stored just below) stays "1.00".
fn two_decimals(value: f64) -> String {
    match Decimal::from_f64_retain(value) {
        Some(exact) => format!(
            "{:.2}",
            exact.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
        ),
        // Outside Decimal's range; no cents to speak of.
        None => format!("{value:.2}"),
    }
}

fn date_text(cell: &Data) -> String {
    let converted = match cell {
        Data::DateTime(dt) => dt
            .as_datetime()
            .map(|at| at.date().format("%Y-%m-%d").to_string()),
        Data::Float(serial) => serial_to_date(*serial),
        Data::Int(serial) => serial_to_date(*serial as f64),
        Data::DateTimeIso(iso) => iso
            .get(..10)
            .and_then(|prefix| NaiveDate::parse_from_str(prefix, "%Y-%m-%d").ok())
            .map(|date| date.format("%Y-%m-%d").to_string()),
        _ => None,
    };
    converted.unwrap_or_else(|| cell_text(cell))
}

/// Convert a spreadsheet day serial to a UTC `YYYY-MM-DD`.
///
/// ```
/// assert_eq!(alerta_ingest::spreadsheet::serial_to_date(45994.0).as_deref(), Some("2025-12-03"));
/// ```
pub fn serial_to_date(serial: f64) -> Option<String> {
    if !serial.is_finite() {
        return None;
    }
    let millis = ((serial - UNIX_EPOCH_SERIAL) * MS_PER_DAY).round();
    if millis.abs() > i64::MAX as f64 {
        return None;
    }
    DateTime::<Utc>::from_timestamp_millis(millis as i64).map(|at| at.format("%Y-%m-%d").to_string())
}
