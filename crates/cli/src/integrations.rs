//! Loading integration records from disk.

use std::path::Path;

use alerta_core::WebhookIntegration;
use anyhow::{Context, Result};

/// Read a JSON array of integrations.
pub fn load(path: &Path) -> Result<Vec<WebhookIntegration>> {
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read {}", path.display()))?;
    parse(&raw).with_context(|| format!("invalid integrations file {}", path.display()))
}

pub fn parse(raw: &str) -> Result<Vec<WebhookIntegration>> {
    Ok(serde_json::from_str(raw)?)
}

/// Only active records are ever dispatched to.
pub fn active(all: Vec<WebhookIntegration>) -> Vec<WebhookIntegration> {
    let total = all.len();
    let active: Vec<_> = all.into_iter().filter(|i| i.active).collect();
    if active.len() < total {
        tracing::debug!(skipped = total - active.len(), "Inactive integrations skipped");
    }
    active
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    const SAMPLE: &str = r#"[
        { "id": 1, "type": "telegram", "config": { "chatId": "1", "botToken": "t" } },
        { "id": 2, "channelType": "custom", "active": false, "config": { "url": "https://x.io" } },
        { "type": "sms" }
    ]"#;

    #[test]
    fn parses_records_and_defaults() {
        let all = parse(SAMPLE).unwrap();
        assert_eq!(all.len(), 3);
        assert_eq!(all[1].channel_type, "custom");
        assert!(!all[1].active);
        assert!(all[2].active);
        assert_eq!(all[2].id, None);
    }

    #[test]
    fn active_filter() {
        let ids: Vec<_> = active(parse(SAMPLE).unwrap()).iter().map(|i| i.id).collect();
        assert_eq!(ids, vec![Some(1), None]);
    }

    #[test]
    fn load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(SAMPLE.as_bytes()).unwrap();
        assert_eq!(load(file.path()).unwrap().len(), 3);
    }

    #[test]
    fn missing_file_names_the_path() {
        let err = load(Path::new("/nonexistent/integrations.json")).unwrap_err();
        assert!(format!("{err:#}").contains("/nonexistent/integrations.json"));
    }

    #[test]
    fn object_instead_of_array_fails() {
        assert!(parse(r#"{ "type": "telegram" }"#).is_err());
    }
}
