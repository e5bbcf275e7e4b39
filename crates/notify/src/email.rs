//! Email delivery through provider HTTP APIs.
//!
//! SendGrid takes a JSON v3 `mail/send` body with bearer auth; Mailgun
//! takes a form post to `/v3/{domain}/messages` with basic auth
//! (`api:<key>`). Both carry the rendered subject and HTML body.

use std::sync::Arc;

use alerta_core::{AlertPayload, EmailConfig, EmailProvider, ProviderConfig};

use crate::templating::MessageRenderer;
use crate::traits::{ensure_success, Notifier, NotifyError};

/// Sends the HTML alert email through SendGrid or Mailgun.
#[derive(Debug)]
pub struct EmailNotifier {
    to: String,
    api_key: String,
    provider: EmailProvider,
    from: String,
    sendgrid_url: String,
    mailgun_api_base: String,
    renderer: Arc<MessageRenderer>,
    client: reqwest::Client,
}

impl EmailNotifier {
    pub fn new(
        config: EmailConfig,
        providers: &ProviderConfig,
        renderer: Arc<MessageRenderer>,
        client: reqwest::Client,
    ) -> Self {
        Self {
            to: config.email,
            api_key: config.api_key,
            provider: config.provider,
            from: providers.mail_from.clone(),
            sendgrid_url: providers.sendgrid_url.clone(),
            mailgun_api_base: providers.mailgun_api_base.trim_end_matches('/').to_string(),
            renderer,
            client,
        }
    }

    /// SendGrid v3 request body.
    fn sendgrid_body(&self, subject: &str, html: &str) -> serde_json::Value {
        serde_json::json!({
            "personalizations": [{ "to": [{ "email": self.to }] }],
            "from": { "email": self.from },
            "subject": subject,
            "content": [{ "type": "text/html", "value": html }],
        })
    }

    fn mailgun_url(&self, domain: &str) -> String {
        format!("{}/v3/{domain}/messages", self.mailgun_api_base)
    }
}

#[async_trait::async_trait]
impl Notifier for EmailNotifier {
    async fn send(&self, alert: &AlertPayload) -> Result<(), NotifyError> {
        let subject = self.renderer.render_subject(alert)?;
        let html = self.renderer.render_email_html(alert)?;

        let request = match &self.provider {
            EmailProvider::SendGrid => self
                .client
                .post(&self.sendgrid_url)
                .bearer_auth(&self.api_key)
                .json(&self.sendgrid_body(&subject, &html)),
            EmailProvider::Mailgun { domain } => self
                .client
                .post(self.mailgun_url(domain))
                .basic_auth("api", Some(&self.api_key))
                .form(&[
                    ("from", self.from.as_str()),
                    ("to", self.to.as_str()),
                    ("subject", subject.as_str()),
                    ("html", html.as_str()),
                ]),
        };

        tracing::debug!(
            to = %self.to,
            provider = match self.provider {
                EmailProvider::SendGrid => "sendgrid",
                EmailProvider::Mailgun { .. } => "mailgun",
            },
            "Sending email notification"
        );

        ensure_success(request.send().await?).await?;
        Ok(())
    }

    fn channel_name(&self) -> &str {
        "email"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn notifier(provider: EmailProvider) -> EmailNotifier {
        EmailNotifier::new(
            EmailConfig {
                email: "ana@example.com".to_string(),
                api_key: "SG.key".to_string(),
                provider,
            },
            &ProviderConfig::all_at("http://mock.local/"),
            Arc::new(MessageRenderer::new()),
            reqwest::Client::new(),
        )
    }

    #[test]
    fn sendgrid_body_shape() {
        let body = notifier(EmailProvider::SendGrid).sendgrid_body("Sinal", "<p>x</p>");
        assert_eq!(body["personalizations"][0]["to"][0]["email"], "ana@example.com");
        assert_eq!(body["from"]["email"], "noreply@2xwin.app");
        assert_eq!(body["subject"], "Sinal");
        assert_eq!(body["content"][0]["type"], "text/html");
        assert_eq!(body["content"][0]["value"], "<p>x</p>");
    }

    #[test]
    fn mailgun_url_uses_domain() {
        let n = notifier(EmailProvider::Mailgun {
            domain: "mg.example.com".to_string(),
        });
        assert_eq!(
            n.mailgun_url("mg.example.com"),
            "http://mock.local/v3/mg.example.com/messages"
        );
        assert_eq!(n.channel_name(), "email");
    }
}
