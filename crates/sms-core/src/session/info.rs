use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;

use super::request::SessionRequest;

/// Point-in-time view of a session handed to observers and callers.
///
/// The attribute map is an owned copy; later `SessionAttribute` commands
/// never show up in an already taken snapshot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionInfo {
    from: String,
    to: String,
    attributes: HashMap<String, Value>,
}

impl SessionInfo {
    pub fn new(
        from: impl Into<String>,
        to: impl Into<String>,
        attributes: HashMap<String, Value>,
    ) -> Self {
        Self {
            from: from.into(),
            to: to.into(),
            attributes,
        }
    }

    /// Builds a snapshot addressed like the session's initial request.
    pub fn snapshot(initial: &SessionRequest, attributes: &HashMap<String, Value>) -> Self {
        Self::new(initial.from(), initial.to(), attributes.clone())
    }

    pub fn from(&self) -> &str {
        &self.from
    }

    pub fn to(&self) -> &str {
        &self.to
    }

    pub fn attributes(&self) -> &HashMap<String, Value> {
        &self.attributes
    }

    pub fn attribute(&self, name: &str) -> Option<&Value> {
        self.attributes.get(name)
    }
}

/// Outcome of the most recent outbound attempt, broadcast to observers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionResponse {
    info: SessionInfo,
    succeeded: bool,
}

impl SessionResponse {
    pub fn new(info: SessionInfo, succeeded: bool) -> Self {
        Self { info, succeeded }
    }

    pub fn info(&self) -> &SessionInfo {
        &self.info
    }

    pub fn succeeded(&self) -> bool {
        self.succeeded
    }
}
