use std::env;

use serde::{Deserialize, Serialize};

/// Load .env file (silently ignores if missing).
pub fn load_dotenv() {
    dotenvy::dotenv().ok();
}

fn env_or(key: &str, default: &str) -> String {
    env::var(key).unwrap_or_else(|_| default.to_string())
}

fn env_opt(key: &str) -> Option<String> {
    env::var(key).ok().filter(|s| !s.is_empty())
}

/// Read a profiled env var: tries {PROFILE}_{KEY} first, falls back to {KEY}.
fn profiled_env_opt(profile: &str, key: &str) -> Option<String> {
    if !profile.is_empty() {
        let prefixed = format!("{}_{}", profile, key);
        if let Some(v) = env_opt(&prefixed) {
            return Some(v);
        }
    }
    env_opt(key)
}

fn profiled_env_or(profile: &str, key: &str, default: &str) -> String {
    profiled_env_opt(profile, key).unwrap_or_else(|| default.to_string())
}

fn profiled_env_u64(profile: &str, key: &str, default: u64) -> u64 {
    profiled_env_opt(profile, key)
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}

// ── Top-level config ──────────────────────────────────────────

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Active profile name (empty = default).
    pub profile: String,
    pub http: HttpConfig,
    pub providers: ProviderConfig,
}

impl Config {
    /// Build config from environment variables (call `load_dotenv()` first).
    /// Profile is read from `ALERTA_PROFILE` env var. When set (e.g. `PROD`),
    /// every key is first looked up as `{PROFILE}_{KEY}`, falling back to `{KEY}`.
    pub fn from_env() -> Self {
        let profile = env_or("ALERTA_PROFILE", "").to_uppercase();
        Self::for_profile(&profile)
    }

    /// Build config for a specific named profile (empty string = default).
    pub fn for_profile(profile: &str) -> Self {
        let p = profile.to_uppercase();
        let p = p.as_str();
        Self {
            profile: p.to_string(),
            http: HttpConfig::from_env_profiled(p),
            providers: ProviderConfig::from_env_profiled(p),
        }
    }

    pub fn profile_label(&self) -> &str {
        if self.profile.is_empty() { "default" } else { &self.profile }
    }

    /// Print a summary for startup logs. Nothing here is secret; per-user
    /// credentials live in the integrations, not in the process config.
    pub fn log_summary(&self) {
        tracing::info!("Config loaded (profile: {}):", self.profile_label());
        tracing::info!("  http:        timeout={}s", self.http.timeout_secs);
        tracing::info!("  telegram:    base={}", self.providers.telegram_api_base);
        tracing::info!("  sendgrid:    url={}", self.providers.sendgrid_url);
        tracing::info!("  mailgun:     base={}", self.providers.mailgun_api_base);
        tracing::info!("  whatsapp:    default_url={}", self.providers.whatsapp_default_url);
        tracing::info!("  mail:        from={}", self.providers.mail_from);
    }
}

// ── HTTP client ───────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HttpConfig {
    /// Per-request timeout applied to every provider call.
    pub timeout_secs: u64,
}

impl HttpConfig {
    fn from_env_profiled(p: &str) -> Self {
        Self {
            timeout_secs: profiled_env_u64(p, "HTTP_TIMEOUT_SECS", DEFAULT_TIMEOUT_SECS),
        }
    }
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }
}

const DEFAULT_TIMEOUT_SECS: u64 = 10;

// ── Notification providers ────────────────────────────────────

const DEFAULT_TELEGRAM_API_BASE: &str = "https://api.telegram.org";
const DEFAULT_SENDGRID_URL: &str = "https://api.sendgrid.com/v3/mail/send";
const DEFAULT_MAILGUN_API_BASE: &str = "https://api.mailgun.net";
const DEFAULT_WHATSAPP_URL: &str = "https://api.example.com/whatsapp/send";
const DEFAULT_MAIL_FROM: &str = "noreply@2xwin.app";

/// Provider endpoints. Base URLs carry no trailing slash.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProviderConfig {
    pub telegram_api_base: String,
    pub sendgrid_url: String,
    pub mailgun_api_base: String,
    /// Used when a WhatsApp integration has no `webhookUrl` of its own.
    pub whatsapp_default_url: String,
    /// Sender address for outbound email.
    pub mail_from: String,
}

impl ProviderConfig {
    fn from_env_profiled(p: &str) -> Self {
        Self {
            telegram_api_base: trim_base(profiled_env_or(p, "TELEGRAM_API_BASE", DEFAULT_TELEGRAM_API_BASE)),
            sendgrid_url: profiled_env_or(p, "SENDGRID_URL", DEFAULT_SENDGRID_URL),
            mailgun_api_base: trim_base(profiled_env_or(p, "MAILGUN_API_BASE", DEFAULT_MAILGUN_API_BASE)),
            whatsapp_default_url: profiled_env_or(p, "WHATSAPP_DEFAULT_URL", DEFAULT_WHATSAPP_URL),
            mail_from: profiled_env_or(p, "MAIL_FROM", DEFAULT_MAIL_FROM),
        }
    }

    /// Point every provider at one base URL (mock servers in tests,
    /// local relays in staging).
    pub fn all_at(base: &str) -> Self {
        let base = trim_base(base.to_string());
        Self {
            telegram_api_base: base.clone(),
            sendgrid_url: format!("{base}/v3/mail/send"),
            mailgun_api_base: base.clone(),
            whatsapp_default_url: format!("{base}/whatsapp/send"),
            mail_from: DEFAULT_MAIL_FROM.to_string(),
        }
    }
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            telegram_api_base: DEFAULT_TELEGRAM_API_BASE.to_string(),
            sendgrid_url: DEFAULT_SENDGRID_URL.to_string(),
            mailgun_api_base: DEFAULT_MAILGUN_API_BASE.to_string(),
            whatsapp_default_url: DEFAULT_WHATSAPP_URL.to_string(),
            mail_from: DEFAULT_MAIL_FROM.to_string(),
        }
    }
}

fn trim_base(url: String) -> String {
    url.trim_end_matches('/').to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn profile_prefixed_key_wins() {
        std::env::set_var("ALERTA_CFG_TEST_HTTP_TIMEOUT_SECS", "42");
        let config = Config::for_profile("alerta_cfg_test");
        assert_eq!(config.profile, "ALERTA_CFG_TEST");
        assert_eq!(config.http.timeout_secs, 42);
        std::env::remove_var("ALERTA_CFG_TEST_HTTP_TIMEOUT_SECS");
    }

    #[test]
    fn unparseable_number_falls_back_to_default() {
        std::env::set_var("ALERTA_BADNUM_HTTP_TIMEOUT_SECS", "soon");
        let config = Config::for_profile("ALERTA_BADNUM");
        assert_eq!(config.http.timeout_secs, DEFAULT_TIMEOUT_SECS);
        std::env::remove_var("ALERTA_BADNUM_HTTP_TIMEOUT_SECS");
    }

    #[test]
    fn base_urls_lose_trailing_slash() {
        std::env::set_var("ALERTA_SLASH_TELEGRAM_API_BASE", "http://localhost:9000/");
        let config = Config::for_profile("ALERTA_SLASH");
        assert_eq!(config.providers.telegram_api_base, "http://localhost:9000");
        std::env::remove_var("ALERTA_SLASH_TELEGRAM_API_BASE");
    }

    #[test]
    fn all_at_derives_every_endpoint() {
        let providers = ProviderConfig::all_at("http://127.0.0.1:4000/");
        assert_eq!(providers.telegram_api_base, "http://127.0.0.1:4000");
        assert_eq!(providers.sendgrid_url, "http://127.0.0.1:4000/v3/mail/send");
        assert_eq!(providers.whatsapp_default_url, "http://127.0.0.1:4000/whatsapp/send");
    }

    #[test]
    fn default_profile_label() {
        assert_eq!(Config::default().profile_label(), "default");
    }
}
