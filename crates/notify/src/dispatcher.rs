//! Routes alerts to the provider each integration names.
//!
//! Every entry point reduces its outcome to a `bool`: unknown channel
//! types, bad configuration and failed deliveries are logged and come
//! back as `false`, never as an error. Integrations are processed one at
//! a time and a failure in one never affects the next.

use std::sync::Arc;
use std::time::{Duration, Instant};

use alerta_core::{AlertPayload, ChannelConfig, Config, ProviderConfig, WebhookIntegration};

use crate::email::EmailNotifier;
use crate::telegram::TelegramNotifier;
use crate::templating::MessageRenderer;
use crate::traits::{sample_alert, Notifier, NotifyError};
use crate::webhook::CustomWebhookNotifier;
use crate::whatsapp::WhatsAppNotifier;

/// Shared, immutable delivery context. Cheap to clone; safe to share
/// across tasks.
#[derive(Debug, Clone)]
pub struct Dispatcher {
    client: reqwest::Client,
    providers: ProviderConfig,
    renderer: Arc<MessageRenderer>,
}

impl Dispatcher {
    pub fn new(client: reqwest::Client, providers: ProviderConfig) -> Self {
        Self {
            client,
            providers,
            renderer: Arc::new(MessageRenderer::new()),
        }
    }

    /// Build the HTTP client from config: one pool, per-request timeout.
    pub fn from_config(config: &Config) -> Result<Self, NotifyError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.http.timeout_secs))
            .user_agent(concat!("alerta/", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(Self::new(client, config.providers.clone()))
    }

    /// The adapter for a resolved channel configuration.
    pub fn notifier_for(&self, config: ChannelConfig) -> Box<dyn Notifier> {
        let client = self.client.clone();
        let renderer = Arc::clone(&self.renderer);
        match config {
            ChannelConfig::WhatsApp(c) => Box::new(WhatsAppNotifier::new(
                c,
                &self.providers.whatsapp_default_url,
                renderer,
                client,
            )),
            ChannelConfig::Telegram(c) => Box::new(TelegramNotifier::new(
                c,
                &self.providers.telegram_api_base,
                renderer,
                client,
            )),
            ChannelConfig::Email(c) => {
                Box::new(EmailNotifier::new(c, &self.providers, renderer, client))
            }
            ChannelConfig::Custom(c) => Box::new(CustomWebhookNotifier::new(c, client)),
        }
    }

    /// Deliver one alert through one integration. `true` only on a 2xx
    /// from the provider.
    pub async fn dispatch(&self, integration: &WebhookIntegration, alert: &AlertPayload) -> bool {
        match self.prepare(integration) {
            Some(notifier) => deliver(notifier.as_ref(), integration, alert).await,
            None => false,
        }
    }

    /// Sequential fan-out; one result per integration, in input order.
    pub async fn dispatch_all(
        &self,
        integrations: &[WebhookIntegration],
        alert: &AlertPayload,
    ) -> Vec<bool> {
        let mut results = Vec::with_capacity(integrations.len());
        for integration in integrations {
            results.push(self.dispatch(integration, alert).await);
        }

        let delivered = results.iter().filter(|ok| **ok).count();
        tracing::info!(
            signal = %alert.signal.external_id,
            integrations = integrations.len(),
            delivered,
            "Alert fan-out finished"
        );
        results
    }

    /// Send a recognisable sample alert through one integration.
    pub async fn send_test(&self, integration: &WebhookIntegration) -> bool {
        self.dispatch(integration, &sample_alert()).await
    }

    fn prepare(&self, integration: &WebhookIntegration) -> Option<Box<dyn Notifier>> {
        match integration.resolve() {
            Ok(config) => {
                tracing::debug!(
                    integration = %integration.label(),
                    channel = %config.channel(),
                    target = %config.describe(),
                    "Routing alert"
                );
                Some(self.notifier_for(config))
            }
            Err(e) => {
                tracing::warn!(
                    integration = %integration.label(),
                    error = %e,
                    "Integration not dispatchable"
                );
                None
            }
        }
    }
}

async fn deliver(
    notifier: &dyn Notifier,
    integration: &WebhookIntegration,
    alert: &AlertPayload,
) -> bool {
    let start = Instant::now();
    let result = notifier.send(alert).await;
    let duration_ms = start.elapsed().as_millis() as u64;

    match result {
        Ok(()) => {
            tracing::info!(
                integration = %integration.label(),
                channel = notifier.channel_name(),
                duration_ms,
                "Notification delivered"
            );
            true
        }
        Err(e) => {
            tracing::warn!(
                integration = %integration.label(),
                channel = notifier.channel_name(),
                error = %e,
                duration_ms,
                "Notification delivery failed"
            );
            false
        }
    }
}
