use serde::{Deserialize, Serialize};

/// One message event of a session, inbound or outbound.
///
/// `from` and `to` are the user parts of the SIP addresses (e.g. `"1001"`),
/// not full URIs. User parameters stay attached (`"2002;npdi"`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionRequest {
    from: String,
    to: String,
    body: Option<String>,
}

impl SessionRequest {
    pub fn new(from: impl Into<String>, to: impl Into<String>, body: Option<String>) -> Self {
        Self {
            from: from.into(),
            to: to.into(),
            body,
        }
    }

    /// Shorthand for a request carrying a text body.
    pub fn text(from: impl Into<String>, to: impl Into<String>, body: impl Into<String>) -> Self {
        Self::new(from, to, Some(body.into()))
    }

    pub fn from(&self) -> &str {
        &self.from
    }

    pub fn to(&self) -> &str {
        &self.to
    }

    pub fn body(&self) -> Option<&str> {
        self.body.as_deref()
    }
}
