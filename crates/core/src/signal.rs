use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime, Utc};
use serde::{Deserialize, Serialize};

/// One normalized spreadsheet row: a scheduled event with a multiplier.
///
/// Every field is text. `numero` in particular is never a float so the
/// author's precision survives storage.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Signal {
    pub numero: String,
    /// `YYYY-MM-DD` when the source cell was a date or serial.
    #[serde(rename = "data")]
    pub date: String,
    /// `HH:MM:SS` by convention; not validated at ingestion.
    #[serde(rename = "horario")]
    pub time: String,
    #[serde(rename = "idSignal")]
    pub external_id: String,
}

impl Signal {
    /// Scheduled instant as a naive date-time, when `date` and `time` are
    /// in canonical form.
    pub fn scheduled_at(&self) -> Option<NaiveDateTime> {
        let date = NaiveDate::parse_from_str(&self.date, "%Y-%m-%d").ok()?;
        let time = NaiveTime::parse_from_str(&self.time, "%H:%M:%S").ok()?;
        Some(date.and_time(time))
    }
}

/// Everything a channel needs to announce one alert.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AlertPayload {
    pub signal: Signal,
    pub alert_triggered_at: DateTime<Utc>,
    pub signal_time: DateTime<Utc>,
}

impl AlertPayload {
    pub fn new(signal: Signal, alert_triggered_at: DateTime<Utc>, signal_time: DateTime<Utc>) -> Self {
        Self {
            signal,
            alert_triggered_at,
            signal_time,
        }
    }
}
