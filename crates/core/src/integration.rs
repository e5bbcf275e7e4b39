//! Webhook integrations: the raw record a user stores, and the typed
//! per-channel configuration it resolves to.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::ConfigError;

/// Delivery channel types. Closed set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChannelType {
    #[serde(rename = "whatsapp")]
    WhatsApp,
    Telegram,
    Email,
    Custom,
}

impl ChannelType {
    pub const ALL: [ChannelType; 4] = [
        ChannelType::WhatsApp,
        ChannelType::Telegram,
        ChannelType::Email,
        ChannelType::Custom,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ChannelType::WhatsApp => "whatsapp",
            ChannelType::Telegram => "telegram",
            ChannelType::Email => "email",
            ChannelType::Custom => "custom",
        }
    }
}

impl fmt::Display for ChannelType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ChannelType {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|c| c.as_str() == s)
            .ok_or_else(|| ConfigError::UnknownChannel(s.to_string()))
    }
}

/// A user's configured delivery channel, as persisted by the caller.
///
/// `channel_type` stays a plain string so records written before a
/// channel was retired still load; [`WebhookIntegration::resolve`] is
/// where unknown types get rejected.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WebhookIntegration {
    #[serde(default)]
    pub id: Option<i64>,
    #[serde(rename = "type", alias = "channelType")]
    pub channel_type: String,
    #[serde(default = "default_active")]
    pub active: bool,
    #[serde(default)]
    pub config: Value,
}

fn default_active() -> bool {
    true
}

impl WebhookIntegration {
    pub fn new(channel_type: impl Into<String>, config: Value) -> Self {
        Self {
            id: None,
            channel_type: channel_type.into(),
            active: true,
            config,
        }
    }

    pub fn channel(&self) -> Result<ChannelType, ConfigError> {
        self.channel_type.parse()
    }

    /// Validate the record and produce its typed configuration.
    ///
    /// Call this when the user saves an integration, so a bad record is
    /// refused up front; the dispatcher calls it again on every send and
    /// fails closed.
    pub fn resolve(&self) -> Result<ChannelConfig, ConfigError> {
        ChannelConfig::resolve(self.channel()?, &self.config)
    }

    /// Label for logs: `telegram#12` or just `telegram`.
    pub fn label(&self) -> String {
        match self.id {
            Some(id) => format!("{}#{id}", self.channel_type),
            None => self.channel_type.clone(),
        }
    }
}

/// Typed per-channel configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChannelConfig {
    WhatsApp(WhatsAppConfig),
    Telegram(TelegramConfig),
    Email(EmailConfig),
    Custom(CustomConfig),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WhatsAppConfig {
    pub phone_number: String,
    /// Relay endpoint; the configured default is used when absent.
    pub webhook_url: Option<String>,
    pub api_key: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TelegramConfig {
    pub chat_id: String,
    pub bot_token: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmailConfig {
    pub email: String,
    pub api_key: String,
    pub provider: EmailProvider,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EmailProvider {
    SendGrid,
    Mailgun { domain: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CustomConfig {
    pub url: String,
    /// When set, every request body is signed with HMAC-SHA256.
    pub secret: Option<String>,
}

impl ChannelConfig {
    pub fn resolve(channel: ChannelType, raw: &Value) -> Result<Self, ConfigError> {
        let empty = Map::new();
        let map = match raw {
            Value::Object(map) => map,
            Value::Null => &empty,
            _ => return Err(ConfigError::NotAnObject),
        };
        let fields = Fields {
            channel: channel.as_str(),
            map,
        };

        let config = match channel {
            ChannelType::WhatsApp => ChannelConfig::WhatsApp(WhatsAppConfig {
                phone_number: fields.required("phoneNumber")?,
                webhook_url: fields.optional_url("webhookUrl")?,
                api_key: fields.optional("apiKey")?,
            }),
            ChannelType::Telegram => ChannelConfig::Telegram(TelegramConfig {
                chat_id: fields.required("chatId")?,
                bot_token: fields.required("botToken")?,
            }),
            ChannelType::Email => {
                let email = fields.required("email")?;
                if !email.contains('@') {
                    return Err(fields.invalid("email", format!("'{email}' is not an email address")));
                }
                let api_key = fields.required("apiKey")?;
                let provider = match fields.optional("provider")? {
                    None => EmailProvider::SendGrid,
                    Some(name) => match name.to_lowercase().as_str() {
                        "sendgrid" => EmailProvider::SendGrid,
                        "mailgun" => EmailProvider::Mailgun {
                            domain: fields.required("domain")?,
                        },
                        _ => return Err(ConfigError::UnknownEmailProvider(name)),
                    },
                };
                ChannelConfig::Email(EmailConfig {
                    email,
                    api_key,
                    provider,
                })
            }
            ChannelType::Custom => {
                let url = fields.required("url")?;
                fields.check_url("url", &url)?;
                ChannelConfig::Custom(CustomConfig {
                    url,
                    secret: fields.optional("secret")?,
                })
            }
        };
        Ok(config)
    }

    pub fn channel(&self) -> ChannelType {
        match self {
            ChannelConfig::WhatsApp(_) => ChannelType::WhatsApp,
            ChannelConfig::Telegram(_) => ChannelType::Telegram,
            ChannelConfig::Email(_) => ChannelType::Email,
            ChannelConfig::Custom(_) => ChannelType::Custom,
        }
    }

    /// One-line description without credentials.
    pub fn describe(&self) -> String {
        match self {
            ChannelConfig::WhatsApp(c) => format!("whatsapp to {}", c.phone_number),
            ChannelConfig::Telegram(c) => format!("telegram chat {}", c.chat_id),
            ChannelConfig::Email(c) => match &c.provider {
                EmailProvider::SendGrid => format!("email to {} via sendgrid", c.email),
                EmailProvider::Mailgun { domain } => {
                    format!("email to {} via mailgun ({domain})", c.email)
                }
            },
            ChannelConfig::Custom(c) => format!(
                "custom webhook {}{}",
                c.url,
                if c.secret.is_some() { " (signed)" } else { "" }
            ),
        }
    }
}

struct Fields<'a> {
    channel: &'static str,
    map: &'a Map<String, Value>,
}

impl Fields<'_> {
    /// Strings are trimmed and blank counts as absent; numbers are
    /// accepted as their decimal text (Telegram chat ids are often stored
    /// as numbers).
    fn optional(&self, key: &'static str) -> Result<Option<String>, ConfigError> {
        match self.map.get(key) {
            None | Some(Value::Null) => Ok(None),
            Some(Value::String(s)) => {
                let s = s.trim();
                Ok((!s.is_empty()).then(|| s.to_string()))
            }
            Some(Value::Number(n)) => Ok(Some(n.to_string())),
            Some(other) => Err(self.invalid(key, format!("expected text, got {other}"))),
        }
    }

    fn required(&self, key: &'static str) -> Result<String, ConfigError> {
        self.optional(key)?.ok_or(ConfigError::MissingKey {
            channel: self.channel,
            key,
        })
    }

    fn optional_url(&self, key: &'static str) -> Result<Option<String>, ConfigError> {
        let url = self.optional(key)?;
        if let Some(url) = &url {
            self.check_url(key, url)?;
        }
        Ok(url)
    }

    fn check_url(&self, key: &'static str, url: &str) -> Result<(), ConfigError> {
        if url.starts_with("http://") || url.starts_with("https://") {
            Ok(())
        } else {
            Err(self.invalid(key, format!("URL must start with http:// or https://, got '{url}'")))
        }
    }

    fn invalid(&self, key: &'static str, reason: String) -> ConfigError {
        ConfigError::InvalidValue {
            channel: self.channel,
            key,
            reason,
        }
    }
}
