use serde::{Deserialize, Serialize};
use std::fmt;

/// Routing configuration consumed by a session when it dispatches
/// outbound messages.
///
/// A session receives its own copy at construction; nothing reads it
/// from global state afterwards.
#[derive(Deserialize, Serialize, Debug, Clone, Default, PartialEq, Eq)]
#[serde(rename_all = "kebab-case")]
pub struct SessionConfig {
    /// Prepended to the recipient identity when building the recipient URI.
    #[serde(default)]
    pub outbound_prefix: Option<String>,
    /// Host (optionally `host:port`) of the outbound SMS gateway. IPv6 hosts
    /// must be bracketed (`[2001:db8::1]:5070`). When absent, outbound requests are recorded but never dispatched.
    #[serde(default)]
    pub outbound_endpoint: Option<String>,
}

impl SessionConfig {
    pub fn new(outbound_prefix: Option<String>, outbound_endpoint: Option<String>) -> Self {
        Self {
            outbound_prefix,
            outbound_endpoint,
        }
    }

    /// Returns true when outbound dispatch is enabled.
    pub fn dispatches_outbound(&self) -> bool {
        self.outbound_endpoint.is_some()
    }
}

/// The local host/port the signaling stack is bound to. Used as the
/// host part of every sender address.
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq, Eq)]
pub struct TransportBinding {
    pub host: String,
    pub port: u16,
}

impl TransportBinding {
    pub fn new(host: impl Into<String>, port: u16) -> Self {
        Self {
            host: host.into(),
            port,
        }
    }
}

impl Default for TransportBinding {
    fn default() -> Self {
        Self::new("127.0.0.1", 5060)
    }
}

impl fmt::Display for TransportBinding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.host, self.port)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kebab_case_keys() {
        let config: SessionConfig = toml::from_str(
            r#"
            outbound-prefix = "+1"
            outbound-endpoint = "gw.example.com"
            "#,
        )
        .unwrap();

        assert_eq!(config.outbound_prefix.as_deref(), Some("+1"));
        assert_eq!(config.outbound_endpoint.as_deref(), Some("gw.example.com"));
        assert!(config.dispatches_outbound());
    }

    #[test]
    fn test_default_disables_outbound() {
        let config = SessionConfig::default();
        assert!(!config.dispatches_outbound());
        assert!(config.outbound_prefix.is_none());
    }

    #[test]
    fn test_binding_display() {
        assert_eq!(TransportBinding::new("10.0.0.5", 5080).to_string(), "10.0.0.5:5080");
        assert_eq!(TransportBinding::default().to_string(), "127.0.0.1:5060");
    }
}
