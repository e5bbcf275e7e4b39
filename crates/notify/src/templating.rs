//! Minijinja rendering of alert messages.
//!
//! Every channel shows the same four facts (multiplier, time, date, id).
//! Chat channels get [`MessageRenderer::render_message`]; email gets
//! [`MessageRenderer::render_subject`] plus
//! [`MessageRenderer::render_email_html`]. Output depends only on the
//! payload, so identical alerts render byte-for-byte identically.
//!
//! Templates are built-in strings loaded into a fresh
//! [`minijinja::Environment`] per call. The email body is registered
//! under a `.html` name so minijinja autoescapes every value in it.

use alerta_core::AlertPayload;

use crate::traits::NotifyError;

const MESSAGE_TEMPLATE: &str = "🔔 *Sinal Chegando em 1 Minuto!*

📊 Multiplicador: *{{ signal.numero }}x*
⏰ Horário: *{{ signal.horario }}*
📅 Data: *{{ signal.data }}*
🆔 ID: {{ signal.idSignal }}";

const SUBJECT_TEMPLATE: &str = "🔔 Sinal Chegando: {{ signal.horario }}";

const EMAIL_TEMPLATE: &str = r#"<!DOCTYPE html>
<html lang="pt-BR">
<body style="margin: 0; padding: 20px; font-family: Arial, sans-serif;">
  <div style="max-width: 600px; margin: 0 auto;">
    <div style="background: linear-gradient(135deg, #10b981 0%, #0da271 100%); padding: 20px; border-radius: 8px; color: white; text-align: center;">
      <h1 style="margin: 0; font-size: 24px;">🔔 Sinal Chegando!</h1>
      <p style="margin: 10px 0 0 0; font-size: 16px;">Em 1 minuto você receberá um sinal</p>
    </div>
    <div style="background: #f9fafb; padding: 20px; border-radius: 8px; margin-top: 20px;">
{%- for label, value, style in [
      ("Multiplicador", signal.numero ~ "x", "font-size: 28px; font-weight: bold; color: #10b981;"),
      ("Horário", signal.horario, "font-size: 18px; font-weight: bold; color: #1f2937;"),
      ("Data", signal.data, "font-size: 16px; color: #1f2937;"),
      ("ID", signal.idSignal, "font-size: 16px; color: #1f2937;"),
    ] %}
      <div style="margin-bottom: 15px;">
        <p style="margin: 0 0 5px 0; color: #6b7280; font-size: 12px; text-transform: uppercase;">{{ label }}</p>
        <p style="margin: 0; {{ style }}">{{ value }}</p>
      </div>
{%- endfor %}
    </div>
    <div style="text-align: center; margin-top: 20px; color: #9ca3af; font-size: 12px;">
      <p>Enviado por 2x WIN - Gerador de Sinais</p>
    </div>
  </div>
</body>
</html>"#;

/// Renders alert messages using minijinja.
#[derive(Debug)]
pub struct MessageRenderer {
    _private: (),
}

impl MessageRenderer {
    /// Create a new renderer.
    pub fn new() -> Self {
        Self { _private: () }
    }

    /// Build a configured minijinja environment. Undefined variables are
    /// errors so a renamed payload field cannot silently render blank.
    fn build_env() -> minijinja::Environment<'static> {
        let mut env = minijinja::Environment::new();
        env.set_undefined_behavior(minijinja::UndefinedBehavior::Strict);
        env
    }

    fn render(
        &self,
        name: &'static str,
        source: &'static str,
        alert: &AlertPayload,
    ) -> Result<String, NotifyError> {
        let template_err = |e: minijinja::Error| NotifyError::Template(e.to_string());
        let mut env = Self::build_env();
        env.add_template(name, source).map_err(template_err)?;
        env.get_template(name)
            .and_then(|template| template.render(alert))
            .map_err(template_err)
    }

    /// Plain-text message for chat channels.
    pub fn render_message(&self, alert: &AlertPayload) -> Result<String, NotifyError> {
        self.render("message.txt", MESSAGE_TEMPLATE, alert)
    }

    /// Email subject line.
    pub fn render_subject(&self, alert: &AlertPayload) -> Result<String, NotifyError> {
        self.render("subject.txt", SUBJECT_TEMPLATE, alert)
    }

    /// HTML email body. Signal values are HTML-escaped.
    pub fn render_email_html(&self, alert: &AlertPayload) -> Result<String, NotifyError> {
        self.render("email.html", EMAIL_TEMPLATE, alert)
    }
}

impl Default for MessageRenderer {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alerta_core::Signal;
    use chrono::{TimeZone, Utc};

    fn sample_alert() -> AlertPayload {
        AlertPayload::new(
            Signal {
                numero: "4.07".to_string(),
                date: "2025-12-02".to_string(),
                time: "23:59:49".to_string(),
                external_id: "1783157".to_string(),
            },
            Utc.with_ymd_and_hms(2025, 12, 2, 23, 58, 49).unwrap(),
            Utc.with_ymd_and_hms(2025, 12, 2, 23, 59, 49).unwrap(),
        )
    }

    #[test]
    fn message_golden() {
        let text = MessageRenderer::new().render_message(&sample_alert()).unwrap();
        assert_eq!(
            text,
            "🔔 *Sinal Chegando em 1 Minuto!*\n\n\
             📊 Multiplicador: *4.07x*\n\
             ⏰ Horário: *23:59:49*\n\
             📅 Data: *2025-12-02*\n\
             🆔 ID: 1783157"
        );
    }

    #[test]
    fn subject_golden() {
        let subject = MessageRenderer::new().render_subject(&sample_alert()).unwrap();
        assert_eq!(subject, "🔔 Sinal Chegando: 23:59:49");
    }

    #[test]
    fn rendering_is_deterministic() {
        let renderer = MessageRenderer::new();
        let alert = sample_alert();
        assert_eq!(
            renderer.render_email_html(&alert).unwrap(),
            renderer.render_email_html(&alert).unwrap()
        );
    }

    #[test]
    fn email_html_carries_every_fact() {
        let html = MessageRenderer::new().render_email_html(&sample_alert()).unwrap();
        assert!(html.starts_with("<!DOCTYPE html>"));
        assert!(html.ends_with("</html>"));
        assert!(html.contains(">4.07x</p>"));
        assert!(html.contains(">23:59:49</p>"));
        assert!(html.contains(">2025-12-02</p>"));
        assert!(html.contains(">1783157</p>"));
        assert!(html.contains(">Horário</p>"));
    }

    #[test]
    fn email_html_escapes_values() {
        let mut alert = sample_alert();
        alert.signal.external_id = "<b>7</b> & co".to_string();
        let html = MessageRenderer::new().render_email_html(&alert).unwrap();
        assert!(html.contains("&lt;b&gt;7&lt;"), "got: {html}");
        assert!(html.contains("&amp; co"));
        assert!(!html.contains("<b>7"));
    }
}
