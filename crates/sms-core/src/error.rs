//! Error types for the SMS session core.

use thiserror::Error;

/// A shared error type for the session core.
///
/// Dispatch failures are deliberately absent here: the transport reports
/// them through [`crate::transport::TransportError`] and the session turns
/// them into failed responses for its observers.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SmsError {
    /// A SIP address could not be parsed or carries no user part
    #[error("Invalid address '{address}': {reason}")]
    InvalidAddress { address: String, reason: String },

    /// The session mailbox is closed
    #[error("Session actor has shut down")]
    ActorShutdown,
}

impl SmsError {
    // ============================================================================
    // Constructor helpers
    // ============================================================================

    /// Creates an InvalidAddress error
    pub fn invalid_address(address: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidAddress {
            address: address.into(),
            reason: reason.into(),
        }
    }

    // ============================================================================
    // Type checking methods
    // ============================================================================

    /// Check if this error comes from a malformed inbound event
    pub fn is_malformed(&self) -> bool {
        matches!(self, Self::InvalidAddress { .. })
    }

    /// Check if the session is gone
    pub fn is_shutdown(&self) -> bool {
        matches!(self, Self::ActorShutdown)
    }
}

/// A type alias for `Result<T, SmsError>`.
pub type Result<T> = std::result::Result<T, SmsError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classification() {
        assert!(SmsError::invalid_address("sip:@host", "missing user").is_malformed());
        assert!(!SmsError::ActorShutdown.is_malformed());
        assert!(SmsError::ActorShutdown.is_shutdown());
    }

    #[test]
    fn test_display_includes_address() {
        let err = SmsError::invalid_address("tel:1001", "unsupported scheme");
        assert_eq!(
            err.to_string(),
            "Invalid address 'tel:1001': unsupported scheme"
        );
    }
}
