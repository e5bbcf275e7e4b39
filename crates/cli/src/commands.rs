use std::path::Path;

use alerta_core::{AlertPayload, AlertPreferences, Signal, WebhookIntegration};
use alerta_ingest::upload_key;
use alerta_notify::Dispatcher;
use anyhow::{bail, Context, Result};
use chrono::{DateTime, TimeZone, Utc};
use tracing::info;

use crate::integrations;

pub fn ingest(file: &Path, user_id: Option<i64>, json: bool) -> Result<()> {
    let bytes = std::fs::read(file).with_context(|| format!("failed to read {}", file.display()))?;
    let signals = alerta_ingest::ingest(&bytes)
        .with_context(|| format!("failed to ingest {}", file.display()))?;

    if json {
        println!("{}", serde_json::to_string_pretty(&signals)?);
    } else {
        println!("{:<10} {:<12} {:<10} ID", "NUMERO", "DATA", "HORARIO");
        for s in &signals {
            println!("{:<10} {:<12} {:<10} {}", s.numero, s.date, s.time, s.external_id);
        }
        println!("{} signals", signals.len());
    }

    if let Some(user_id) = user_id {
        let name = file
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        // stderr keeps --json output parseable
        eprintln!("upload key: {}", upload_key(user_id, &name, Utc::now()));
    }
    Ok(())
}

pub fn validate(path: &Path) -> Result<()> {
    let all = integrations::load(path)?;
    let mut failures = 0;
    for integration in &all {
        match integration.resolve() {
            Ok(config) => println!("ok     {:<14} {}", integration.label(), config.describe()),
            Err(e) => {
                failures += 1;
                println!("error  {:<14} {e}", integration.label());
            }
        }
    }
    if failures > 0 {
        bail!("{failures} of {} integrations are invalid", all.len());
    }
    println!("{} integrations valid", all.len());
    Ok(())
}

pub async fn dispatch(
    dispatcher: &Dispatcher,
    path: &Path,
    signal: Signal,
    min_multiplier: Option<String>,
) -> Result<()> {
    let targets = integrations::active(integrations::load(path)?);

    let preferences = AlertPreferences {
        min_multiplier: min_multiplier.unwrap_or_else(|| AlertPreferences::default().min_multiplier),
        ..AlertPreferences::default()
    };
    if !preferences.admits(&signal) {
        info!(
            signal = %signal.external_id,
            numero = %signal.numero,
            min = %preferences.min_multiplier,
            "Signal below minimum multiplier, nothing sent"
        );
        println!("delivered 0/{} (filtered)", targets.len());
        return Ok(());
    }

    let alert = alert_for(signal, Utc::now());
    let results = dispatcher.dispatch_all(&targets, &alert).await;
    report(&targets, &results);
    Ok(())
}

pub async fn test(dispatcher: &Dispatcher, path: &Path) -> Result<()> {
    let targets = integrations::active(integrations::load(path)?);
    let mut results = Vec::with_capacity(targets.len());
    for integration in &targets {
        results.push(dispatcher.send_test(integration).await);
    }
    let delivered = report(&targets, &results);
    if delivered < targets.len() {
        bail!("{} of {} test alerts failed", targets.len() - delivered, targets.len());
    }
    Ok(())
}

/// Triggered now; signal time is the signal's own date and time read as
/// UTC, or now when those don't parse.
pub fn alert_for(signal: Signal, now: DateTime<Utc>) -> AlertPayload {
    let signal_time = signal
        .scheduled_at()
        .map(|at| Utc.from_utc_datetime(&at))
        .unwrap_or(now);
    AlertPayload::new(signal, now, signal_time)
}

fn report(targets: &[WebhookIntegration], results: &[bool]) -> usize {
    for (integration, ok) in targets.iter().zip(results) {
        println!("{:<7}{}", if *ok { "sent" } else { "failed" }, integration.label());
    }
    let delivered = results.iter().filter(|ok| **ok).count();
    println!("delivered {delivered}/{}", targets.len());
    delivered
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    use alerta_core::ProviderConfig;

    fn signal(numero: &str) -> Signal {
        Signal {
            numero: numero.to_string(),
            date: "2025-12-02".to_string(),
            time: "23:59:49".to_string(),
            external_id: "1783157".to_string(),
        }
    }

    fn file(contents: &str) -> tempfile::NamedTempFile {
        let mut f = tempfile::NamedTempFile::new().unwrap();
        f.write_all(contents.as_bytes()).unwrap();
        f
    }

    fn offline_dispatcher() -> Dispatcher {
        Dispatcher::new(reqwest::Client::new(), ProviderConfig::all_at("http://127.0.0.1:9"))
    }

    #[test]
    fn alert_time_comes_from_signal() {
        let now = Utc.with_ymd_and_hms(2025, 12, 2, 23, 58, 49).unwrap();
        let alert = alert_for(signal("4.07"), now);
        assert_eq!(alert.alert_triggered_at, now);
        assert_eq!(
            alert.signal_time,
            Utc.with_ymd_and_hms(2025, 12, 2, 23, 59, 49).unwrap()
        );
    }

    #[test]
    fn unparseable_signal_time_falls_back_to_now() {
        let now = Utc::now();
        let mut s = signal("4.07");
        s.date = "02/12/2025".to_string();
        assert_eq!(alert_for(s, now).signal_time, now);
    }

    #[test]
    fn validate_fails_on_bad_record() {
        let f = file(r#"[
            { "type": "telegram", "config": { "chatId": "1", "botToken": "t" } },
            { "type": "email", "config": { "email": "nope" } }
        ]"#);
        let err = validate(f.path()).unwrap_err();
        assert!(err.to_string().contains("1 of 2"));
    }

    #[test]
    fn validate_passes_good_records() {
        let f = file(r#"[{ "type": "custom", "config": { "url": "https://hooks.example.com" } }]"#);
        validate(f.path()).unwrap();
    }

    #[tokio::test]
    async fn filtered_signal_sends_nothing() {
        let f = file(r#"[{ "type": "custom", "config": { "url": "http://127.0.0.1:9/hook" } }]"#);
        dispatch(&offline_dispatcher(), f.path(), signal("1.50"), Some("2".to_string()))
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn test_command_reports_failures() {
        let f = file(r#"[{ "type": "sms", "config": {} }]"#);
        let err = test(&offline_dispatcher(), f.path()).await.unwrap_err();
        assert!(err.to_string().contains("1 of 1"));
    }

    #[tokio::test]
    async fn inactive_integrations_are_not_tested() {
        let f = file(r#"[{ "type": "sms", "active": false }]"#);
        test(&offline_dispatcher(), f.path()).await.unwrap();
    }
}
