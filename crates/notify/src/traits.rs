//! Notifier trait definition and shared error types.

use alerta_core::{AlertPayload, ConfigError, Signal};
use chrono::{Duration, Utc};

/// Errors that can occur during notification delivery.
#[derive(Debug, thiserror::Error)]
pub enum NotifyError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("provider returned {status}: {body}")]
    Status {
        status: reqwest::StatusCode,
        body: String,
    },

    #[error("Rate limited: retry after {retry_after_secs}s")]
    RateLimited { retry_after_secs: u64 },

    #[error("Template rendering failed: {0}")]
    Template(String),

    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Serialization failed: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// Trait for notification channel implementations.
#[async_trait::async_trait]
pub trait Notifier: Send + Sync {
    /// Deliver one alert through this channel. Exactly one attempt.
    async fn send(&self, alert: &AlertPayload) -> Result<(), NotifyError>;

    /// Human-readable name for this channel (e.g., "telegram", "email").
    fn channel_name(&self) -> &str;
}

/// A recognisable alert for connectivity tests: scheduled one minute
/// from now, id `TEST`.
pub fn sample_alert() -> AlertPayload {
    let now = Utc::now();
    let at = now + Duration::minutes(1);
    AlertPayload::new(
        Signal {
            numero: "2.00".to_string(),
            date: at.format("%Y-%m-%d").to_string(),
            time: at.format("%H:%M:%S").to_string(),
            external_id: "TEST".to_string(),
        },
        now,
        at,
    )
}

/// Turn a non-2xx response into [`NotifyError::Status`], keeping the
/// provider's body for the log line.
pub(crate) async fn ensure_success(
    response: reqwest::Response,
) -> Result<reqwest::Response, NotifyError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let body = response
        .text()
        .await
        .unwrap_or_else(|_| "<unreadable body>".to_string());
    Err(NotifyError::Status { status, body })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sample_alert_is_one_minute_out() {
        let alert = sample_alert();
        assert_eq!(alert.signal.external_id, "TEST");
        assert_eq!((alert.signal_time - alert.alert_triggered_at).num_seconds(), 60);
        assert!(alert.signal.scheduled_at().is_some());
    }

    #[test]
    fn config_errors_convert() {
        let err: NotifyError = ConfigError::UnknownChannel("sms".into()).into();
        assert_eq!(
            err.to_string(),
            "Configuration error: unsupported channel type: sms"
        );
    }
}
