use calamine::{Data, ExcelDateTime};

const SECS_PER_DAY: f64 = 86_400.0;

/// Trimmed text of a cell, the way a reader of the sheet would see it.
/// Error cells read as blank.
pub(crate) fn cell_text(cell: &Data) -> String {
    match cell {
        Data::String(s) | Data::DateTimeIso(s) | Data::DurationIso(s) => s.trim().to_string(),
        // f64's Display drops a zero fraction: 1783157.0 -> "1783157".
        Data::Float(f) => f.to_string(),
        Data::Int(i) => i.to_string(),
        Data::Bool(b) => b.to_string(),
        Data::DateTime(dt) => render_datetime(dt),
        Data::Error(_) | Data::Empty => String::new(),
    }
}

pub(crate) fn is_blank(cell: &Data) -> bool {
    cell_text(cell).is_empty()
}

/// Time-of-day cells (serial below one day) and durations render as
/// `HH:MM:SS`, whole days as `YYYY-MM-DD`, anything else as both.
fn render_datetime(dt: &ExcelDateTime) -> String {
    let serial = dt.as_f64();
    if dt.is_duration() {
        return clock(serial, false);
    }
    if (0.0..1.0).contains(&serial) {
        return clock(serial, true);
    }
    match dt.as_datetime() {
        Some(at) if serial.fract() == 0.0 => at.format("%Y-%m-%d").to_string(),
        Some(at) => at.format("%Y-%m-%d %H:%M:%S").to_string(),
        None => serial.to_string(),
    }
}

/// Round to the second ourselves: serials are binary fractions of a day
/// and truncation turns 23:59:49 into 23:59:48. A time of day wraps at
/// midnight; a duration may run past 24 hours.
fn clock(serial: f64, time_of_day: bool) -> String {
    let mut total = (serial.abs() * SECS_PER_DAY).round() as u64;
    if time_of_day {
        total %= 86_400;
    }
    let (hours, minutes, seconds) = (total / 3600, total / 60 % 60, total % 60);
    format!("{hours:02}:{minutes:02}:{seconds:02}")
}
