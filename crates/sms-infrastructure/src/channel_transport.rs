//! Transport adapter backed by a bounded queue to the signaling stack.
//!
//! The signaling stack consumes [`OutboundMessage`]s from the receiver,
//! puts them on the wire, and calls [`OutboundMessage::respond`] when the
//! final response arrives.

use async_trait::async_trait;
use sms_core::transport::{OutboundMessage, Transport, TransportError};
use tokio::sync::mpsc;

/// Channel capacity for outbound messages.
const DEFAULT_CAPACITY: usize = 256;

/// Hands outbound messages to the signaling stack without waiting on it.
///
/// `send` never blocks: a full queue is reported as a rejection so the
/// session can tell its observers right away.
#[derive(Debug, Clone)]
pub struct ChannelTransport {
    tx: mpsc::Sender<OutboundMessage>,
}

impl ChannelTransport {
    pub fn new(capacity: usize) -> (Self, mpsc::Receiver<OutboundMessage>) {
        let (tx, rx) = mpsc::channel(capacity);
        (Self { tx }, rx)
    }

    pub fn with_default_capacity() -> (Self, mpsc::Receiver<OutboundMessage>) {
        Self::new(DEFAULT_CAPACITY)
    }
}

#[async_trait]
impl Transport for ChannelTransport {
    async fn send(&self, message: OutboundMessage) -> Result<(), TransportError> {
        let recipient = message.recipient().to_string();
        match self.tx.try_send(message) {
            Ok(()) => {
                tracing::debug!(recipient = %recipient, "Queued outbound MESSAGE");
                Ok(())
            }
            Err(mpsc::error::TrySendError::Full(_)) => Err(TransportError::Rejected(format!(
                "signaling queue is full, dropping message to {}",
                recipient
            ))),
            Err(mpsc::error::TrySendError::Closed(_)) => Err(TransportError::Connection(
                "signaling stack is not accepting messages".to_string(),
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sms_core::session::SessionNotification;
    use sms_core::transport::InboundResponse;
    use sms_core::{ObserverRef, SessionConfig, SessionRequest, TransportBinding};
    use sms_execution::{ActorConfig, SessionActor};
    use std::sync::Arc;
    use tokio::sync::watch;

    fn spawn_with(transport: ChannelTransport) -> (sms_core::SessionRef, watch::Sender<bool>) {
        let (shutdown_tx, shutdown_rx) = watch::channel(false);
        let config = ActorConfig {
            session: SessionConfig::new(None, Some("gw.example.com".to_string())),
            binding: TransportBinding::default(),
            transport: Arc::new(transport),
        };
        let (session, _handle) = SessionActor::spawn(config, shutdown_rx);
        (session, shutdown_tx)
    }

    async fn next_response(rx: &mut mpsc::UnboundedReceiver<SessionNotification>) -> bool {
        loop {
            match rx.recv().await {
                Some(SessionNotification::Response(response)) => return response.succeeded(),
                Some(_) => continue,
                None => panic!("observer channel closed"),
            }
        }
    }

    #[tokio::test]
    async fn test_signaling_stack_response_reaches_observers() {
        let (transport, mut signaling) = ChannelTransport::new(4);
        let (session, shutdown_tx) = spawn_with(transport);
        let (observer, mut rx) = ObserverRef::channel();
        session.observe(observer).unwrap();

        session.send_request(SessionRequest::text("2002", "1001", "yo")).unwrap();

        let message = signaling.recv().await.unwrap();
        assert_eq!(message.method(), "MESSAGE");
        assert_eq!(message.recipient().to_string(), "sip:1001@gw.example.com");
        assert_eq!(message.sender().to_string(), "sip:2002@127.0.0.1:5060");
        message.respond(InboundResponse::new(200)).unwrap();

        assert!(next_response(&mut rx).await);

        shutdown_tx.send(true).unwrap();
    }

    #[tokio::test]
    async fn test_full_queue_is_reported_as_failure() {
        let (transport, _signaling) = ChannelTransport::new(1);
        let (session, shutdown_tx) = spawn_with(transport);
        let (observer, mut rx) = ObserverRef::channel();
        session.observe(observer).unwrap();

        session.send_request(SessionRequest::text("2002", "1001", "first")).unwrap();
        session.send_request(SessionRequest::text("2002", "1001", "second")).unwrap();

        assert!(!next_response(&mut rx).await);

        shutdown_tx.send(true).unwrap();
    }

    #[tokio::test]
    async fn test_closed_stack_is_reported_as_failure() {
        let (transport, signaling) = ChannelTransport::new(1);
        drop(signaling);
        let (session, shutdown_tx) = spawn_with(transport);
        let (observer, mut rx) = ObserverRef::channel();
        session.observe(observer).unwrap();

        session.send_request(SessionRequest::text("2002", "1001", "yo")).unwrap();

        assert!(!next_response(&mut rx).await);
        assert!(!session.is_closed());

        shutdown_tx.send(true).unwrap();
    }
}
