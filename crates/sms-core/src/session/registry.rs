use super::observer::{ObserverRef, SessionNotification};

/// Ordered membership of a session's observers.
///
/// Registering the same observer twice keeps both entries, so it is
/// notified twice. `remove` drops only the first matching entry.
#[derive(Debug, Default)]
pub struct ObserverRegistry {
    observers: Vec<ObserverRef>,
}

impl ObserverRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends an observer at the end of the notification order.
    pub fn add(&mut self, observer: ObserverRef) {
        self.observers.push(observer);
    }

    /// Removes the first entry equal to `observer`.
    ///
    /// Returns true if an entry was removed.
    pub fn remove(&mut self, observer: &ObserverRef) -> bool {
        match self.observers.iter().position(|o| o == observer) {
            Some(index) => {
                self.observers.remove(index);
                true
            }
            None => false,
        }
    }

    /// Delivers `notification` to every observer in registration order.
    ///
    /// Returns the number of successful deliveries. Observers whose mailbox
    /// is closed are skipped but stay registered.
    pub fn notify(&self, notification: &SessionNotification) -> usize {
        self.observers
            .iter()
            .filter(|observer| observer.tell(notification.clone()))
            .count()
    }

    pub fn contains(&self, observer: &ObserverRef) -> bool {
        self.observers.contains(observer)
    }

    pub fn len(&self) -> usize {
        self.observers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.observers.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &ObserverRef> {
        self.observers.iter()
    }
}
