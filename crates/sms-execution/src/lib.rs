//! Runtime for SMS sessions.
//!
//! One [`SessionActor`] task per session; callers hold
//! [`sms_core::SessionRef`]s returned by [`SessionActor::spawn`].

pub mod actor;
pub mod diagnostics;

pub use actor::{ActorConfig, SessionActor};
pub use diagnostics::{DiagnosticEvent, DiagnosticsLayer, init_tracing};
