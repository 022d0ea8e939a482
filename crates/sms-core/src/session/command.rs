//! The mailbox protocol of a session and the handle used to talk to it.

use serde_json::Value;
use std::fmt;
use tokio::sync::{mpsc, oneshot};
use uuid::Uuid;

use super::attribute::SessionAttribute;
use super::info::SessionInfo;
use super::observer::{Observe, ObserverRef, StopObserving};
use super::request::SessionRequest;
use crate::error::{Result, SmsError};
use crate::transport::{InboundMessage, InboundResponse};

/// Commands accepted by a session, processed one at a time in arrival order.
#[derive(Debug)]
pub enum SessionCommand {
    // Subscription
    Observe(Observe),
    StopObserving(StopObserving),

    // Queries
    GetLastRequest {
        reply: oneshot::Sender<Option<SessionRequest>>,
    },
    GetInfo {
        reply: oneshot::Sender<Option<SessionInfo>>,
    },

    // Application commands
    Attribute(SessionAttribute),
    Outbound(SessionRequest),

    // Events delivered by the signaling stack
    InboundMessage(InboundMessage),
    InboundResponse(InboundResponse),
}

/// Cloneable address of a running session.
///
/// Every method enqueues a command; none of them wait for the command to be
/// processed except the queries, which wait for their reply.
#[derive(Clone)]
pub struct SessionRef {
    id: Uuid,
    tx: mpsc::UnboundedSender<SessionCommand>,
}

impl SessionRef {
    pub fn new(id: Uuid, tx: mpsc::UnboundedSender<SessionCommand>) -> Self {
        Self { id, tx }
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    /// True once the session task has stopped.
    pub fn is_closed(&self) -> bool {
        self.tx.is_closed()
    }

    /// Enqueues a raw command.
    pub fn tell(&self, command: SessionCommand) -> Result<()> {
        self.tx.send(command).map_err(|_| SmsError::ActorShutdown)
    }

    pub fn observe(&self, observer: ObserverRef) -> Result<()> {
        self.tell(SessionCommand::Observe(Observe::new(observer)))
    }

    pub fn stop_observing(&self, observer: &ObserverRef) -> Result<()> {
        self.tell(SessionCommand::StopObserving(StopObserving::new(observer.clone())))
    }

    pub fn set_attribute(&self, name: impl Into<String>, value: impl Into<Value>) -> Result<()> {
        self.tell(SessionCommand::Attribute(SessionAttribute::new(name, value)))
    }

    /// Asks the session to send `request` through its transport. The outcome
    /// only reaches observers.
    pub fn send_request(&self, request: SessionRequest) -> Result<()> {
        self.tell(SessionCommand::Outbound(request))
    }

    pub fn deliver_message(&self, message: InboundMessage) -> Result<()> {
        self.tell(SessionCommand::InboundMessage(message))
    }

    pub fn deliver_response(&self, response: InboundResponse) -> Result<()> {
        self.tell(SessionCommand::InboundResponse(response))
    }

    /// The most recently processed request, if any.
    pub async fn last_request(&self) -> Result<Option<SessionRequest>> {
        let (reply, rx) = oneshot::channel();
        self.tell(SessionCommand::GetLastRequest { reply })?;
        rx.await.map_err(|_| SmsError::ActorShutdown)
    }

    /// A snapshot of the session, absent until the first request.
    pub async fn info(&self) -> Result<Option<SessionInfo>> {
        let (reply, rx) = oneshot::channel();
        self.tell(SessionCommand::GetInfo { reply })?;
        rx.await.map_err(|_| SmsError::ActorShutdown)
    }
}

impl PartialEq for SessionRef {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for SessionRef {}

impl fmt::Debug for SessionRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SessionRef")
            .field("id", &self.id)
            .field("closed", &self.is_closed())
            .finish()
    }
}
