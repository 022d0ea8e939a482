//! Loads session settings from the platform's TOML configuration file.
//!
//! ```toml
//! [sms]
//! outbound-prefix = "+1"
//! outbound-endpoint = "gw.example.com"
//!
//! [sms.transport]
//! host = "10.0.0.5"
//! port = 5060
//! ```

use anyhow::{Context, Result};
use serde::Deserialize;
use sms_core::{SessionConfig, TransportBinding};
use std::path::Path;

/// Everything a session owner needs to spawn sessions.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SmsSettings {
    pub session: SessionConfig,
    pub transport: TransportBinding,
}

#[derive(Deserialize, Default)]
struct ConfigFile {
    #[serde(default)]
    sms: SmsSection,
}

#[derive(Deserialize, Default)]
struct SmsSection {
    #[serde(flatten)]
    session: SessionConfig,
    #[serde(default)]
    transport: Option<TransportBinding>,
}

/// Parses settings from TOML text. Unknown tables are ignored so the file
/// can be shared with other platform components.
pub fn parse_settings(source: &str) -> Result<SmsSettings> {
    let file: ConfigFile = toml::from_str(source).context("Failed to parse SMS settings")?;
    Ok(SmsSettings {
        session: file.sms.session,
        transport: file.sms.transport.unwrap_or_default(),
    })
}

/// Loads settings from `path`.
///
/// A missing file yields the defaults, which leave outbound dispatch
/// disabled.
pub fn load_settings(path: impl AsRef<Path>) -> Result<SmsSettings> {
    let path = path.as_ref();
    if !path.exists() {
        tracing::info!(path = %path.display(), "SMS config file not found, using defaults");
        return Ok(SmsSettings::default());
    }

    let source = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read SMS config: {}", path.display()))?;
    let settings = parse_settings(&source)
        .with_context(|| format!("Invalid SMS config: {}", path.display()))?;

    if !settings.session.dispatches_outbound() {
        tracing::warn!(
            path = %path.display(),
            "No outbound-endpoint configured, outbound SMS disabled"
        );
    }
    Ok(settings)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_parse_full_settings() {
        let settings = parse_settings(
            r#"
            [sms]
            outbound-prefix = "+1"
            outbound-endpoint = "gw.example.com"

            [sms.transport]
            host = "10.0.0.5"
            port = 5080

            [voice]
            codec = "pcmu"
            "#,
        )
        .unwrap();

        assert_eq!(settings.session.outbound_prefix.as_deref(), Some("+1"));
        assert_eq!(
            settings.session.outbound_endpoint.as_deref(),
            Some("gw.example.com")
        );
        assert_eq!(settings.transport, TransportBinding::new("10.0.0.5", 5080));
    }

    #[test]
    fn test_parse_without_sms_table() {
        let settings = parse_settings("[voice]\ncodec = \"pcmu\"\n").unwrap();
        assert_eq!(settings, SmsSettings::default());
        assert!(!settings.session.dispatches_outbound());
    }

    #[test]
    fn test_parse_rejects_malformed_toml() {
        assert!(parse_settings("[sms\noutbound-endpoint = ").is_err());
        assert!(parse_settings("[sms]\noutbound-endpoint = 42\n").is_err());
    }

    #[test]
    fn test_load_missing_file_uses_defaults() {
        let temp_dir = TempDir::new().unwrap();
        let settings = load_settings(temp_dir.path().join("missing.toml")).unwrap();
        assert_eq!(settings, SmsSettings::default());
    }

    #[test]
    fn test_load_from_file() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("platform.toml");
        std::fs::write(&path, "[sms]\noutbound-endpoint = \"gw.example.com:5070\"\n").unwrap();

        let settings = load_settings(&path).unwrap();
        assert_eq!(
            settings.session.outbound_endpoint.as_deref(),
            Some("gw.example.com:5070")
        );
        assert_eq!(settings.session.outbound_prefix, None);
        assert_eq!(settings.transport, TransportBinding::default());
    }
}
