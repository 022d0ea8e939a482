//! Subscription messages and the observer side of a session.

use std::fmt;
use tokio::sync::mpsc;
use uuid::Uuid;

use super::command::SessionRef;
use super::info::SessionResponse;
use super::request::SessionRequest;

/// Everything a session ever tells its observers.
#[derive(Debug, Clone, PartialEq)]
pub enum SessionNotification {
    /// Acknowledges an `Observe` command.
    Observing(Observing),
    /// A new inbound message was processed.
    Request(SessionRequest),
    /// Outcome of an outbound dispatch.
    Response(SessionResponse),
}

/// Addressable mailbox of a subscriber.
///
/// Two refs are equal when they point at the same mailbox, regardless of
/// how many clones exist.
#[derive(Clone)]
pub struct ObserverRef {
    id: Uuid,
    tx: mpsc::UnboundedSender<SessionNotification>,
}

impl ObserverRef {
    /// Creates a new observer mailbox, returning the ref to hand to
    /// sessions and the receiving end.
    pub fn channel() -> (Self, mpsc::UnboundedReceiver<SessionNotification>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self::from_sender(tx), rx)
    }

    pub fn from_sender(tx: mpsc::UnboundedSender<SessionNotification>) -> Self {
        Self {
            id: Uuid::new_v4(),
            tx,
        }
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    /// True once the receiving end has been dropped.
    pub fn is_closed(&self) -> bool {
        self.tx.is_closed()
    }

    /// Delivers a notification. Returns false if the observer is gone.
    pub fn tell(&self, notification: SessionNotification) -> bool {
        self.tx.send(notification).is_ok()
    }
}

impl PartialEq for ObserverRef {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for ObserverRef {}

impl fmt::Debug for ObserverRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ObserverRef")
            .field("id", &self.id)
            .field("closed", &self.is_closed())
            .finish()
    }
}

/// Subscribe `observer` to a session's events.
#[derive(Debug, Clone)]
pub struct Observe {
    observer: ObserverRef,
}

impl Observe {
    pub fn new(observer: ObserverRef) -> Self {
        Self { observer }
    }

    pub fn observer(&self) -> &ObserverRef {
        &self.observer
    }

    pub fn into_observer(self) -> ObserverRef {
        self.observer
    }
}

/// Unsubscribe `observer` from a session's events.
#[derive(Debug, Clone)]
pub struct StopObserving {
    observer: ObserverRef,
}

impl StopObserving {
    pub fn new(observer: ObserverRef) -> Self {
        Self { observer }
    }

    pub fn observer(&self) -> &ObserverRef {
        &self.observer
    }
}

/// Sent to a freshly registered observer so it can address the session.
#[derive(Debug, Clone, PartialEq)]
pub struct Observing {
    session: SessionRef,
}

impl Observing {
    pub fn new(session: SessionRef) -> Self {
        Self { session }
    }

    pub fn session(&self) -> &SessionRef {
        &self.session
    }

    pub fn into_session(self) -> SessionRef {
        self.session
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clones_compare_equal() {
        let (observer, _rx) = ObserverRef::channel();
        let (other, _other_rx) = ObserverRef::channel();
        assert_eq!(observer, observer.clone());
        assert_ne!(observer, other);
    }

    #[test]
    fn test_tell_reports_closed_observer() {
        let (observer, rx) = ObserverRef::channel();
        assert!(observer.tell(SessionNotification::Request(SessionRequest::text("a", "b", "c"))));

        drop(rx);
        assert!(observer.is_closed());
        assert!(!observer.tell(SessionNotification::Request(SessionRequest::text("a", "b", "c"))));
    }
}
