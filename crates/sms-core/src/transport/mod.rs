//! Transport adapter contract.
//!
//! The session core never talks to the network. It builds an
//! [`OutboundMessage`] and hands it to a [`Transport`]; the signaling stack
//! on the other side delivers [`InboundMessage`] and [`InboundResponse`]
//! events back into session mailboxes.

mod address;
mod message;

use async_trait::async_trait;
use thiserror::Error;

pub use address::{Scheme, SipUri};
pub use message::{
    CONTENT_TYPE_TEXT, InboundMessage, InboundResponse, METHOD_MESSAGE, OutboundMessage,
    SC_ACCEPTED, SC_OK, SMS_SERVICE_HANDLER,
};

/// Why a transport could not take an outbound message.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TransportError {
    /// The signaling stack is unreachable or no longer accepting messages.
    #[error("connection error: {0}")]
    Connection(String),

    /// The signaling stack refused the message synchronously.
    #[error("message rejected: {0}")]
    Rejected(String),

    /// The message could not be built (bad addressing, missing session).
    #[error("failed to build message: {0}")]
    Build(String),
}

/// Builds and dispatches outbound protocol messages.
///
/// `send` returns once the message has been handed over. Delivery results
/// arrive later through [`OutboundMessage::respond`], never as the return
/// value of `send`.
#[async_trait]
pub trait Transport: Send + Sync {
    async fn send(&self, message: OutboundMessage) -> Result<(), TransportError>;
}
