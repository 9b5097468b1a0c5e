//! Server-assigned identity for persisted records
//!
//! A node that has been saved at least once carries a `PersistedId`; a node
//! created locally and never submitted has none. The distinction drives the
//! soft- vs hard-delete semantics of the form core: only persisted nodes are
//! ever marked for destruction on the wire.

use serde::{Deserialize, Serialize};

/// Server-assigned numeric id of a persisted record
///
/// Ids are opaque to the client; they are echoed back verbatim in update
/// payloads and destroy markers, never generated locally.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PersistedId(u64);

impl PersistedId {
    /// Wrap a raw server id
    pub fn new(raw: u64) -> Self {
        Self(raw)
    }

    /// Get the raw numeric value
    pub fn raw(&self) -> u64 {
        self.0
    }
}

impl std::fmt::Display for PersistedId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u64> for PersistedId {
    fn from(raw: u64) -> Self {
        Self(raw)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_is_raw_number() {
        assert_eq!(PersistedId::new(42).to_string(), "42");
    }

    #[test]
    fn test_serde_transparent() {
        let id: PersistedId = serde_json::from_str("7").unwrap();
        assert_eq!(id, PersistedId::new(7));
        assert_eq!(serde_json::to_string(&id).unwrap(), "7");
    }
}
