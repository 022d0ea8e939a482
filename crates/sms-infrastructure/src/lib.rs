//! Infrastructure adapters for the SMS session core: settings loading and
//! the transport that feeds the signaling stack.

pub mod channel_transport;
pub mod config_loader;

pub use channel_transport::ChannelTransport;
pub use config_loader::{SmsSettings, load_settings, parse_settings};
