//! Session domain module.
//!
//! Value types exchanged with a session, the observer registry, and the
//! mailbox protocol a session actor consumes.
//!
//! # Module Structure
//!
//! - `request`: One message event (`SessionRequest`)
//! - `info`: Snapshots and outcomes (`SessionInfo`, `SessionResponse`)
//! - `attribute`: Attribute upsert command (`SessionAttribute`)
//! - `observer`: Subscription messages (`Observe`, `StopObserving`, `Observing`)
//! - `registry`: Ordered observer membership and fan-out (`ObserverRegistry`)
//! - `command`: Mailbox commands and the session handle (`SessionCommand`, `SessionRef`)

mod attribute;
mod command;
mod info;
mod observer;
mod registry;
mod request;

// Re-export public API
pub use attribute::SessionAttribute;
pub use command::{SessionCommand, SessionRef};
pub use info::{SessionInfo, SessionResponse};
pub use observer::{Observe, ObserverRef, Observing, SessionNotification, StopObserving};
pub use registry::ObserverRegistry;
pub use request::SessionRequest;
