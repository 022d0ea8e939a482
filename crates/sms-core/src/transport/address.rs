//! SIP addressing: parsing inbound URIs and composing outbound ones.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::config::TransportBinding;
use crate::error::{Result, SmsError};

/// URI scheme of a [`SipUri`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Scheme {
    #[default]
    Sip,
    Sips,
}

impl Scheme {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Sip => "sip",
            Self::Sips => "sips",
        }
    }
}

/// A `sip:user@host[:port]` (or `sips:`) address.
///
/// URI parameters and headers are accepted on parse and discarded. The user
/// part is kept verbatim, including any user parameters (`2002;npdi`).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SipUri {
    #[serde(default)]
    scheme: Scheme,
    user: String,
    host: String,
    port: Option<u16>,
}

impl SipUri {
    pub fn new(user: impl Into<String>, host: impl Into<String>, port: Option<u16>) -> Self {
        Self {
            scheme: Scheme::Sip,
            user: user.into(),
            host: host.into(),
            port,
        }
    }

    pub fn with_scheme(mut self, scheme: Scheme) -> Self {
        self.scheme = scheme;
        self
    }

    /// Parses an addr-spec (`sip:1001@host:5060;transport=udp`) or a
    /// name-addr (`"Alice" <sips:1001@host>`).
    pub fn parse(text: &str) -> Result<Self> {
        let trimmed = text.trim();
        let uri = match (trimmed.find('<'), trimmed.rfind('>')) {
            (Some(start), Some(end)) if start < end => &trimmed[start + 1..end],
            _ => trimmed,
        };

        let (scheme, rest) = split_scheme(uri)
            .ok_or_else(|| SmsError::invalid_address(text, "expected a sip: or sips: URI"))?;
        let (user, hostpart) = rest
            .split_once('@')
            .ok_or_else(|| SmsError::invalid_address(text, "missing user part"))?;
        if user.is_empty() || user.starts_with(';') {
            return Err(SmsError::invalid_address(text, "missing user part"));
        }

        let hostport = hostpart.split([';', '?']).next().unwrap_or_default();
        let (host, port) =
            split_host_port(hostport).map_err(|reason| SmsError::invalid_address(text, reason))?;

        Ok(Self::new(user, host, port).with_scheme(scheme))
    }

    /// Sender address of an outbound message: the identity at the locally
    /// bound transport.
    pub fn sender(from: &str, binding: &TransportBinding) -> Result<Self> {
        if from.is_empty() {
            return Err(SmsError::invalid_address(from, "missing user part"));
        }
        Ok(Self::new(from, binding.host.clone(), Some(binding.port)))
    }

    /// Recipient address of an outbound message: the optionally prefixed
    /// identity at the configured gateway endpoint.
    pub fn recipient(prefix: Option<&str>, to: &str, endpoint: &str) -> Result<Self> {
        let user = format!("{}{}", prefix.unwrap_or_default(), to);
        if user.is_empty() {
            return Err(SmsError::invalid_address(endpoint, "missing user part"));
        }
        let (host, port) = split_host_port(endpoint)
            .map_err(|reason| SmsError::invalid_address(endpoint, reason))?;
        Ok(Self::new(user, host, port))
    }

    pub fn scheme(&self) -> Scheme {
        self.scheme
    }

    pub fn user(&self) -> &str {
        &self.user
    }

    pub fn host(&self) -> &str {
        &self.host
    }

    pub fn port(&self) -> Option<u16> {
        self.port
    }
}

impl fmt::Display for SipUri {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}@{}", self.scheme.as_str(), self.user, self.host)?;
        if let Some(port) = self.port {
            write!(f, ":{}", port)?;
        }
        Ok(())
    }
}

fn split_scheme(uri: &str) -> Option<(Scheme, &str)> {
    let (scheme, rest) = uri.split_once(':')?;
    if scheme.eq_ignore_ascii_case("sip") {
        Some((Scheme::Sip, rest))
    } else if scheme.eq_ignore_ascii_case("sips") {
        Some((Scheme::Sips, rest))
    } else {
        None
    }
}

/// Splits `host[:port]`. IPv6 hosts must be bracketed (`[2001:db8::1]:5060`).
fn split_host_port(hostport: &str) -> std::result::Result<(String, Option<u16>), &'static str> {
    if hostport.is_empty() {
        return Err("missing host");
    }

    if let Some(stripped) = hostport.strip_prefix('[') {
        let (addr, after) = stripped.split_once(']').ok_or("unterminated IPv6 reference")?;
        let host = format!("[{}]", addr);
        return match after.strip_prefix(':') {
            Some(port) => Ok((host, Some(parse_port(port)?))),
            None if after.is_empty() => Ok((host, None)),
            None => Err("unexpected characters after host"),
        };
    }

    match hostport.split_once(':') {
        Some((_, port)) if port.contains(':') => Err("IPv6 host must be enclosed in brackets"),
        Some((host, _)) if host.is_empty() => Err("missing host"),
        Some((host, port)) => Ok((host.to_string(), Some(parse_port(port)?))),
        None => Ok((hostport.to_string(), None)),
    }
}

fn parse_port(port: &str) -> std::result::Result<u16, &'static str> {
    port.parse::<u16>().map_err(|_| "invalid port")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_addr_spec() {
        let uri = SipUri::parse("sip:1001@pbx.example.com:5080;transport=udp").unwrap();
        assert_eq!(uri.scheme(), Scheme::Sip);
        assert_eq!(uri.user(), "1001");
        assert_eq!(uri.host(), "pbx.example.com");
        assert_eq!(uri.port(), Some(5080));
    }

    #[test]
    fn test_parse_name_addr_keeps_user_params() {
        let uri = SipUri::parse("\"Alice\" <sip:2002;npdi@10.0.0.1>;tag=abc").unwrap();
        assert_eq!(uri.user(), "2002;npdi");
        assert_eq!(uri.host(), "10.0.0.1");
        assert_eq!(uri.port(), None);
    }

    #[test]
    fn test_parse_sips() {
        let uri = SipUri::parse("<SIPS:1001@pbx.example.com:5061>").unwrap();
        assert_eq!(uri.scheme(), Scheme::Sips);
        assert_eq!(uri.user(), "1001");
        assert_eq!(uri.to_string(), "sips:1001@pbx.example.com:5061");
    }

    #[test]
    fn test_parse_ipv6_host() {
        let uri = SipUri::parse("sip:1001@[2001:db8::1]:5060").unwrap();
        assert_eq!(uri.host(), "[2001:db8::1]");
        assert_eq!(uri.port(), Some(5060));
        assert_eq!(uri.to_string(), "sip:1001@[2001:db8::1]:5060");
    }

    #[test]
    fn test_parse_rejects_malformed() {
        assert!(SipUri::parse("tel:+15551234").unwrap_err().is_malformed());
        assert!(SipUri::parse("sip:pbx.example.com").is_err());
        assert!(SipUri::parse("sip:@pbx.example.com").is_err());
        assert!(SipUri::parse("sip:;npdi@pbx.example.com").is_err());
        assert!(SipUri::parse("sip:1001@").is_err());
        assert!(SipUri::parse("sip:1001@host:notaport").is_err());
    }

    #[test]
    fn test_sender_uses_bound_transport() {
        let binding = TransportBinding::new("10.0.0.5", 5080);
        let sender = SipUri::sender("2002", &binding).unwrap();
        assert_eq!(sender.to_string(), "sip:2002@10.0.0.5:5080");
    }

    #[test]
    fn test_recipient_without_prefix() {
        let recipient = SipUri::recipient(None, "1001", "gw.example.com").unwrap();
        assert_eq!(recipient.to_string(), "sip:1001@gw.example.com");
    }

    #[test]
    fn test_recipient_with_prefix_and_port() {
        let recipient = SipUri::recipient(Some("+1"), "5551234", "gw.example.com:5070").unwrap();
        assert_eq!(recipient.user(), "+15551234");
        assert_eq!(recipient.to_string(), "sip:+15551234@gw.example.com:5070");
    }

    #[test]
    fn test_recipient_rejects_bad_endpoint() {
        assert!(SipUri::recipient(None, "1001", "").is_err());
        assert!(SipUri::recipient(None, "1001", "gw:99999").is_err());
    }

    #[test]
    fn test_recipient_requires_bracketed_ipv6() {
        let err = SipUri::recipient(None, "1001", "2001:db8::1").unwrap_err();
        assert!(err.to_string().contains("brackets"));

        let recipient = SipUri::recipient(None, "1001", "[2001:db8::1]:5070").unwrap();
        assert_eq!(recipient.host(), "[2001:db8::1]");
        assert_eq!(recipient.port(), Some(5070));
    }
}
