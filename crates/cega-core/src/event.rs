//! Body schema of the file-ingestion broker events.
//!
//! The correlation id is never part of the body; it travels in the
//! message properties.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Integrity descriptor attached to ingestion events.
///
/// Producers historically spelled the value field both `checksum` and
/// `hash`; both are accepted on input, `checksum` is emitted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Checksum {
    #[serde(alias = "hash")]
    pub checksum: String,
    pub algorithm: String,
}

/// JSON body of a file-ingestion event.
///
/// Consumers must tolerate fields they do not know about, so anything
/// beyond the named fields is kept in `extra` and round-trips.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EventPayload {
    #[serde(alias = "elixir_id")]
    pub user: String,
    #[serde(alias = "filename")]
    pub filepath: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stable_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub encrypted_integrity: Option<Checksum>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub unencrypted_integrity: Option<Checksum>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl EventPayload {
    /// Minimal payload for an ingestion trigger.
    #[must_use]
    pub fn new(user: impl Into<String>, filepath: impl Into<String>) -> Self {
        Self {
            user: user.into(),
            filepath: filepath.into(),
            stable_id: None,
            encrypted_integrity: None,
            unencrypted_integrity: None,
            extra: Map::new(),
        }
    }
}
