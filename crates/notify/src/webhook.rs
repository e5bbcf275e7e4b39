//! User-hosted JSON webhooks.
//!
//! Each alert is posted as a `signal_alert` envelope. When the integration
//! carries a `secret`, the exact body bytes are signed with HMAC-SHA256
//! and the lowercase hex digest is sent in [`SIGNATURE_HEADER`], so the
//! receiver can verify by recomputing over the raw body it got.

use alerta_core::{AlertPayload, CustomConfig, Signal};
use chrono::{DateTime, SecondsFormat, Utc};
use hmac::{Hmac, Mac};
use serde::Serialize;
use sha2::Sha256;

use crate::traits::{ensure_success, Notifier, NotifyError};

pub const SIGNATURE_HEADER: &str = "X-Webhook-Signature";

const EVENT_NAME: &str = "signal_alert";

/// Wire shape of a custom webhook body. Field order is stable.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WebhookEnvelope<'a> {
    pub event: &'static str,
    /// When the request was built.
    pub timestamp: String,
    pub signal: &'a Signal,
    pub alert_triggered_at: String,
    pub signal_time: String,
}

impl<'a> WebhookEnvelope<'a> {
    pub fn new(alert: &'a AlertPayload, now: DateTime<Utc>) -> Self {
        Self {
            event: EVENT_NAME,
            timestamp: iso_millis(&now),
            signal: &alert.signal,
            alert_triggered_at: iso_millis(&alert.alert_triggered_at),
            signal_time: iso_millis(&alert.signal_time),
        }
    }
}

/// `2025-12-02T23:58:49.000Z`
fn iso_millis(at: &DateTime<Utc>) -> String {
    at.to_rfc3339_opts(SecondsFormat::Millis, true)
}

/// Lowercase hex HMAC-SHA256 of `body` under `secret`.
pub fn sign(secret: &str, body: &[u8]) -> String {
    // HMAC hashes over-long keys and pads short ones, so any length is valid.
    let mut mac = Hmac::<Sha256>::new_from_slice(secret.as_bytes())
        .expect("HMAC accepts keys of any length");
    mac.update(body);
    hex::encode(mac.finalize().into_bytes())
}

/// Posts signal envelopes to a user-provided URL.
#[derive(Debug)]
pub struct CustomWebhookNotifier {
    url: String,
    secret: Option<String>,
    client: reqwest::Client,
}

impl CustomWebhookNotifier {
    pub fn new(config: CustomConfig, client: reqwest::Client) -> Self {
        Self {
            url: config.url,
            secret: config.secret,
            client,
        }
    }

    /// Serialized body and, when a secret is configured, its signature.
    pub fn prepare(
        &self,
        alert: &AlertPayload,
        now: DateTime<Utc>,
    ) -> Result<(String, Option<String>), NotifyError> {
        let body = serde_json::to_string(&WebhookEnvelope::new(alert, now))?;
        let signature = self.secret.as_deref().map(|secret| sign(secret, body.as_bytes()));
        Ok((body, signature))
    }
}

#[async_trait::async_trait]
impl Notifier for CustomWebhookNotifier {
    async fn send(&self, alert: &AlertPayload) -> Result<(), NotifyError> {
        let (body, signature) = self.prepare(alert, Utc::now())?;

        let mut request = self
            .client
            .post(&self.url)
            .header(reqwest::header::CONTENT_TYPE, "application/json");
        if let Some(signature) = signature {
            request = request.header(SIGNATURE_HEADER, signature);
        }

        let response = ensure_success(request.body(body).send().await?).await?;

        tracing::debug!(
            url = %self.url,
            status = %response.status(),
            signed = self.secret.is_some(),
            "webhook notification delivered"
        );
        Ok(())
    }

    fn channel_name(&self) -> &str {
        "custom"
    }
}
