//! Blob-store keys for uploaded spreadsheets.

use chrono::{DateTime, Utc};

/// Key under which the caller stores the original upload:
/// `spreadsheets/{user_id}/{unix_millis}-{filename}`.
///
/// Path separators in the client-supplied name are replaced so the key
/// cannot escape the user's prefix.
pub fn upload_key(user_id: i64, filename: &str, now: DateTime<Utc>) -> String {
    let name: String = filename
        .trim()
        .chars()
        .map(|c| if matches!(c, '/' | '\\') { '_' } else { c })
        .collect();
    let name = if name.is_empty() { "upload.xlsx".to_string() } else { name };
    format!("spreadsheets/{user_id}/{}-{name}", now.timestamp_millis())
}
