//! WhatsApp delivery through an HTTP relay.
//!
//! The relay accepts `{"to": <phone>, "message": <text>}`. Each
//! integration may name its own relay via `webhookUrl`; otherwise the
//! configured default endpoint is used.

use std::sync::Arc;

use alerta_core::{AlertPayload, WhatsAppConfig};

use crate::templating::MessageRenderer;
use crate::traits::{ensure_success, Notifier, NotifyError};

#[derive(Debug)]
pub struct WhatsAppNotifier {
    endpoint: String,
    phone_number: String,
    /// Sent as a bearer token when present.
    api_key: Option<String>,
    renderer: Arc<MessageRenderer>,
    client: reqwest::Client,
}

impl WhatsAppNotifier {
    pub fn new(
        config: WhatsAppConfig,
        default_endpoint: &str,
        renderer: Arc<MessageRenderer>,
        client: reqwest::Client,
    ) -> Self {
        Self {
            endpoint: config
                .webhook_url
                .unwrap_or_else(|| default_endpoint.to_string()),
            phone_number: config.phone_number,
            api_key: config.api_key,
            renderer,
            client,
        }
    }
}

#[async_trait::async_trait]
impl Notifier for WhatsAppNotifier {
    async fn send(&self, alert: &AlertPayload) -> Result<(), NotifyError> {
        let body = serde_json::json!({
            "to": self.phone_number,
            "message": self.renderer.render_message(alert)?,
        });

        let mut request = self.client.post(&self.endpoint).json(&body);
        if let Some(key) = &self.api_key {
            request = request.bearer_auth(key);
        }

        tracing::debug!(endpoint = %self.endpoint, to = %self.phone_number, "Sending WhatsApp notification");
        ensure_success(request.send().await?).await?;
        Ok(())
    }

    fn channel_name(&self) -> &str {
        "whatsapp"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(webhook_url: Option<&str>) -> WhatsAppConfig {
        WhatsAppConfig {
            phone_number: "+5511999999999".to_string(),
            webhook_url: webhook_url.map(str::to_string),
            api_key: None,
        }
    }

    fn build(config: WhatsAppConfig) -> WhatsAppNotifier {
        WhatsAppNotifier::new(
            config,
            "https://relay.default/send",
            Arc::new(MessageRenderer::new()),
            reqwest::Client::new(),
        )
    }

    #[test]
    fn falls_back_to_default_endpoint() {
        assert_eq!(build(config(None)).endpoint, "https://relay.default/send");
    }

    #[test]
    fn integration_endpoint_wins() {
        let notifier = build(config(Some("https://relay.mine/hook")));
        assert_eq!(notifier.endpoint, "https://relay.mine/hook");
        assert_eq!(notifier.channel_name(), "whatsapp");
    }
}
