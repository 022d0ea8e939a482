//! Per-session actor for serialized state mutations.
//!
//! Each SMS session gets a dedicated actor task that:
//! - Owns `initial`/`last` requests, attributes and observers
//! - Processes one mailbox command at a time, in arrival order
//! - Dispatches outbound messages through the transport and turns dispatch
//!   failures into failed responses for its observers
//!
//! Delivery responses come back through the same mailbox, so a slow gateway
//! never blocks other queued commands of the session.

use serde_json::Value;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::{mpsc, watch};
use tracing::{Instrument, debug, error, info_span, warn};

use sms_core::session::{
    Observe, ObserverRegistry, Observing, SessionAttribute, SessionCommand, SessionInfo,
    SessionNotification, SessionRef, SessionRequest, SessionResponse, StopObserving,
};
use sms_core::transport::{
    InboundMessage, InboundResponse, OutboundMessage, SipUri, Transport, TransportError,
};
use sms_core::{SessionConfig, TransportBinding};

/// Configuration for spawning a new session actor.
pub struct ActorConfig {
    pub session: SessionConfig,
    pub binding: TransportBinding,
    pub transport: Arc<dyn Transport>,
}

/// Per-session actor that owns state and handles commands.
pub struct SessionActor {
    // Identity
    session_ref: mpsc::WeakUnboundedSender<SessionCommand>,
    id: uuid::Uuid,

    // State
    initial: Option<SessionRequest>,
    last: Option<SessionRequest>,
    attributes: HashMap<String, Value>,
    observers: ObserverRegistry,

    // Configuration
    config: SessionConfig,
    binding: TransportBinding,
    transport: Arc<dyn Transport>,

    // Communication
    command_rx: mpsc::UnboundedReceiver<SessionCommand>,
    shutdown_rx: watch::Receiver<bool>,
    watch_shutdown: bool,
}

impl SessionActor {
    /// Spawn a new session actor.
    ///
    /// Returns the session ref and a JoinHandle for the actor task. The task
    /// stops once every `SessionRef` is dropped or `shutdown_rx` flips to
    /// `true`; commands already queued are processed first.
    pub fn spawn(
        config: ActorConfig,
        shutdown_rx: watch::Receiver<bool>,
    ) -> (SessionRef, tokio::task::JoinHandle<()>) {
        let (tx, rx) = mpsc::unbounded_channel();
        let id = uuid::Uuid::new_v4();
        let session_ref = SessionRef::new(id, tx.clone());

        let actor = Self {
            session_ref: tx.downgrade(),
            id,
            initial: None,
            last: None,
            attributes: HashMap::new(),
            observers: ObserverRegistry::new(),
            config: config.session,
            binding: config.binding,
            transport: config.transport,
            command_rx: rx,
            shutdown_rx,
            watch_shutdown: true,
        };

        let span = info_span!("sms_session", session_id = %id);
        let handle = tokio::spawn(actor.run().instrument(span));
        (session_ref, handle)
    }

    /// Main command loop.
    async fn run(mut self) {
        debug!(session_id = %self.id, "Session actor started");

        loop {
            tokio::select! {
                changed = self.shutdown_rx.changed(), if self.watch_shutdown => {
                    match changed {
                        Ok(()) if *self.shutdown_rx.borrow() => {
                            debug!(session_id = %self.id, "Session actor received shutdown signal");
                            self.drain_commands().await;
                            break;
                        }
                        Ok(()) => {}
                        // Shutdown sender dropped; only handle drops can stop us now
                        Err(_) => self.watch_shutdown = false,
                    }
                }

                cmd = self.command_rx.recv() => {
                    match cmd {
                        Some(command) => self.handle_command(command).await,
                        None => {
                            debug!(
                                session_id = %self.id,
                                "All session refs dropped, shutting down"
                            );
                            break;
                        }
                    }
                }
            }
        }

        debug!(session_id = %self.id, "Session actor stopped");
    }

    /// Drain and process all remaining commands in the queue.
    async fn drain_commands(&mut self) {
        while let Ok(cmd) = self.command_rx.try_recv() {
            self.handle_command(cmd).await;
        }
    }

    /// Handle a single command.
    async fn handle_command(&mut self, cmd: SessionCommand) {
        match cmd {
            SessionCommand::Observe(observe) => self.observe(observe),
            SessionCommand::StopObserving(stop) => self.stop_observing(stop),
            SessionCommand::GetLastRequest { reply } => {
                let _ = reply.send(self.last.clone());
            }
            SessionCommand::GetInfo { reply } => {
                let _ = reply.send(self.info());
            }
            SessionCommand::Attribute(attribute) => self.set_attribute(attribute),
            SessionCommand::Outbound(request) => self.outbound(request).await,
            SessionCommand::InboundMessage(message) => self.inbound(message),
            SessionCommand::InboundResponse(response) => self.response(response),
        }
    }

    // ------------------------------------------------------------------------
    // Subscription
    // ------------------------------------------------------------------------

    fn observe(&mut self, observe: Observe) {
        let observer = observe.into_observer();
        if observer.is_closed() {
            debug!(
                session_id = %self.id,
                observer = %observer.id(),
                "Ignoring observe from closed observer"
            );
            return;
        }

        self.observers.add(observer.clone());
        if let Some(session) = self.self_ref() {
            observer.tell(SessionNotification::Observing(Observing::new(session)));
        }
    }

    fn stop_observing(&mut self, stop: StopObserving) {
        if !self.observers.remove(stop.observer()) {
            debug!(
                session_id = %self.id,
                observer = %stop.observer().id(),
                "Observer was not registered"
            );
        }
    }

    // ------------------------------------------------------------------------
    // State
    // ------------------------------------------------------------------------

    fn set_attribute(&mut self, attribute: SessionAttribute) {
        let (name, value) = attribute.into_parts();
        self.attributes.insert(name, value);
    }

    /// Stores `request` as the latest one, and as the initial one if the
    /// session has not seen a request yet.
    fn record(&mut self, request: SessionRequest) {
        if self.initial.is_none() {
            self.initial = Some(request.clone());
        }
        self.last = Some(request);
    }

    fn info(&self) -> Option<SessionInfo> {
        self.initial
            .as_ref()
            .map(|initial| SessionInfo::snapshot(initial, &self.attributes))
    }

    fn self_ref(&self) -> Option<SessionRef> {
        self.session_ref.upgrade().map(|tx| SessionRef::new(self.id, tx))
    }

    // ------------------------------------------------------------------------
    // Protocol events
    // ------------------------------------------------------------------------

    fn inbound(&mut self, message: InboundMessage) {
        let request = match message.into_request() {
            Ok(request) => request,
            Err(e) => {
                warn!(session_id = %self.id, error = %e, "Skipping malformed inbound message");
                return;
            }
        };

        self.record(request.clone());
        self.observers.notify(&SessionNotification::Request(request));
    }

    fn response(&mut self, response: InboundResponse) {
        debug!(
            session_id = %self.id,
            status = response.status(),
            "Received response to outbound message"
        );
        self.broadcast_outcome(response.is_success());
    }

    async fn outbound(&mut self, request: SessionRequest) {
        self.record(request.clone());

        let Some(endpoint) = self.config.outbound_endpoint.clone() else {
            debug!(session_id = %self.id, "No outbound endpoint configured, not dispatching");
            return;
        };

        let result = match self.build_outbound(&request, &endpoint) {
            Ok(message) => self.transport.send(message).await,
            Err(e) => Err(e),
        };

        if let Err(e) = result {
            error!(session_id = %self.id, error = %e, "Failed to dispatch outbound message");
            self.broadcast_outcome(false);
        }
    }

    fn build_outbound(
        &self,
        request: &SessionRequest,
        endpoint: &str,
    ) -> Result<OutboundMessage, TransportError> {
        let sender = SipUri::sender(request.from(), &self.binding)
            .map_err(|e| TransportError::Build(e.to_string()))?;
        let recipient = SipUri::recipient(
            self.config.outbound_prefix.as_deref(),
            request.to(),
            endpoint,
        )
        .map_err(|e| TransportError::Build(e.to_string()))?;
        let session = self
            .self_ref()
            .ok_or_else(|| TransportError::Build("session mailbox is closed".to_string()))?;

        Ok(OutboundMessage::text(
            sender,
            recipient,
            request.body().map(str::to_owned),
            session,
        ))
    }

    fn broadcast_outcome(&self, succeeded: bool) {
        let Some(info) = self.info() else {
            warn!(session_id = %self.id, "Skipping response for a session without requests");
            return;
        };

        let notification = SessionNotification::Response(SessionResponse::new(info, succeeded));
        let delivered = self.observers.notify(&notification);
        debug!(session_id = %self.id, succeeded, delivered, "Broadcast outbound outcome");
    }
}
