use super::address::SipUri;
use crate::error::Result;
use crate::session::{SessionRef, SessionRequest};

/// SIP method used for every outbound text message.
pub const METHOD_MESSAGE: &str = "MESSAGE";

/// Content type of outbound bodies.
pub const CONTENT_TYPE_TEXT: &str = "text/plain";

/// Name of the signaling-side handler that receives responses to outbound
/// messages.
pub const SMS_SERVICE_HANDLER: &str = "SmsService";

/// `200 OK`
pub const SC_OK: u16 = 200;

/// `202 Accepted`
pub const SC_ACCEPTED: u16 = 202;

/// A pre-parsed inbound MESSAGE request.
///
/// `from` and `to` carry the raw header addresses; the session extracts the
/// user parts when it processes the event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InboundMessage {
    from: String,
    to: String,
    content: Vec<u8>,
}

impl InboundMessage {
    pub fn new(
        from: impl Into<String>,
        to: impl Into<String>,
        content: impl Into<Vec<u8>>,
    ) -> Self {
        Self {
            from: from.into(),
            to: to.into(),
            content: content.into(),
        }
    }

    pub fn from(&self) -> &str {
        &self.from
    }

    pub fn to(&self) -> &str {
        &self.to
    }

    pub fn content(&self) -> &[u8] {
        &self.content
    }

    /// Converts the event into a session request.
    ///
    /// A zero-length payload becomes an absent body. Payload bytes that are
    /// not valid UTF-8 are replaced with U+FFFD rather than rejected; only
    /// addresses without a user part make the event malformed.
    pub fn into_request(self) -> Result<SessionRequest> {
        let from = SipUri::parse(&self.from)?;
        let to = SipUri::parse(&self.to)?;
        let body = if self.content.is_empty() {
            None
        } else {
            Some(String::from_utf8_lossy(&self.content).into_owned())
        };
        Ok(SessionRequest::new(from.user(), to.user(), body))
    }
}

/// A final response to an outbound MESSAGE, delivered back into the
/// session that sent it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InboundResponse {
    status: u16,
    reason: Option<String>,
}

impl InboundResponse {
    pub fn new(status: u16) -> Self {
        Self { status, reason: None }
    }

    pub fn with_reason(status: u16, reason: impl Into<String>) -> Self {
        Self {
            status,
            reason: Some(reason.into()),
        }
    }

    pub fn status(&self) -> u16 {
        self.status
    }

    pub fn reason(&self) -> Option<&str> {
        self.reason.as_deref()
    }

    /// Only `200 OK` and `202 Accepted` count as delivered.
    pub fn is_success(&self) -> bool {
        matches!(self.status, SC_OK | SC_ACCEPTED)
    }
}

/// A fully addressed outbound MESSAGE handed to the transport.
///
/// Carries a ref to the originating session so the transport can deliver
/// the eventual response into that session's mailbox.
#[derive(Debug, Clone)]
pub struct OutboundMessage {
    method: &'static str,
    sender: SipUri,
    recipient: SipUri,
    request_uri: SipUri,
    routes: Vec<SipUri>,
    content_type: &'static str,
    body: Option<String>,
    handler: &'static str,
    session: SessionRef,
}

impl OutboundMessage {
    /// Builds a `text/plain` MESSAGE. The recipient doubles as request-URI
    /// and as the single pushed route.
    pub fn text(
        sender: SipUri,
        recipient: SipUri,
        body: Option<String>,
        session: SessionRef,
    ) -> Self {
        Self {
            method: METHOD_MESSAGE,
            sender,
            request_uri: recipient.clone(),
            routes: vec![recipient.clone()],
            recipient,
            content_type: CONTENT_TYPE_TEXT,
            body,
            handler: SMS_SERVICE_HANDLER,
            session,
        }
    }

    pub fn method(&self) -> &str {
        self.method
    }

    pub fn sender(&self) -> &SipUri {
        &self.sender
    }

    pub fn recipient(&self) -> &SipUri {
        &self.recipient
    }

    pub fn request_uri(&self) -> &SipUri {
        &self.request_uri
    }

    pub fn routes(&self) -> &[SipUri] {
        &self.routes
    }

    pub fn content_type(&self) -> &str {
        self.content_type
    }

    pub fn body(&self) -> Option<&str> {
        self.body.as_deref()
    }

    pub fn handler(&self) -> &str {
        self.handler
    }

    pub fn session(&self) -> &SessionRef {
        &self.session
    }

    /// Routes a final response back to the originating session.
    pub fn respond(&self, response: InboundResponse) -> Result<()> {
        self.session.deliver_response(response)
    }
}
