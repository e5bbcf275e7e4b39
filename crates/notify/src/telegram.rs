//! Telegram Bot API notifier.
//!
//! Delivers alerts via the Bot API `sendMessage` endpoint with
//! `parse_mode` set to HTML.

use std::sync::Arc;

use alerta_core::{AlertPayload, TelegramConfig};

use crate::templating::MessageRenderer;
use crate::traits::{ensure_success, Notifier, NotifyError};

/// Sends alerts via the Telegram Bot API.
#[derive(Debug)]
pub struct TelegramNotifier {
    bot_token: String,
    chat_id: String,
    /// Bot API root, `https://api.telegram.org` in production.
    api_base: String,
    renderer: Arc<MessageRenderer>,
    client: reqwest::Client,
}

impl TelegramNotifier {
    pub fn new(
        config: TelegramConfig,
        api_base: &str,
        renderer: Arc<MessageRenderer>,
        client: reqwest::Client,
    ) -> Self {
        Self {
            bot_token: config.bot_token,
            chat_id: config.chat_id,
            api_base: api_base.trim_end_matches('/').to_string(),
            renderer,
            client,
        }
    }

    fn endpoint(&self) -> String {
        format!("{}/bot{}/sendMessage", self.api_base, self.bot_token)
    }
}

#[async_trait::async_trait]
impl Notifier for TelegramNotifier {
    async fn send(&self, alert: &AlertPayload) -> Result<(), NotifyError> {
        let body = serde_json::json!({
            "chat_id": self.chat_id,
            "text": self.renderer.render_message(alert)?,
            "parse_mode": "HTML",
        });

        // The token is part of the URL; never log the URL itself.
        tracing::debug!(chat_id = %self.chat_id, "Sending Telegram notification");

        let response = self.client.post(self.endpoint()).json(&body).send().await?;

        if response.status() == reqwest::StatusCode::TOO_MANY_REQUESTS {
            let resp_body: serde_json::Value = response.json().await.unwrap_or_default();
            let retry_after = resp_body
                .get("parameters")
                .and_then(|p| p.get("retry_after"))
                .and_then(|v| v.as_u64())
                .unwrap_or(30);
            return Err(NotifyError::RateLimited {
                retry_after_secs: retry_after,
            });
        }

        ensure_success(response).await?;
        tracing::debug!(chat_id = %self.chat_id, "Telegram notification sent");
        Ok(())
    }

    fn channel_name(&self) -> &str {
        "telegram"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn notifier(base: &str) -> TelegramNotifier {
        TelegramNotifier::new(
            TelegramConfig {
                chat_id: "-100123".to_string(),
                bot_token: "123456:ABC-DEF".to_string(),
            },
            base,
            Arc::new(MessageRenderer::new()),
            reqwest::Client::new(),
        )
    }

    #[test]
    fn endpoint_embeds_token() {
        assert_eq!(
            notifier("https://api.telegram.org/").endpoint(),
            "https://api.telegram.org/bot123456:ABC-DEF/sendMessage"
        );
    }

    #[test]
    fn test_channel_name() {
        assert_eq!(notifier("http://localhost").channel_name(), "telegram");
    }
}
