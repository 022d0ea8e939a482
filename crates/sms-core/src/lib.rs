pub mod config;
pub mod error;
pub mod session;
pub mod transport;

// Re-export common types
pub use config::{SessionConfig, TransportBinding};
pub use error::SmsError;
pub use session::{
    ObserverRef, SessionCommand, SessionInfo, SessionNotification, SessionRef, SessionRequest,
    SessionResponse,
};
pub use transport::{
    InboundMessage, InboundResponse, OutboundMessage, SipUri, Transport, TransportError,
};
