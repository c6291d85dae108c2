//! CentralEGA user records.

use serde::{Deserialize, Serialize};

/// One entry in the CentralEGA user directory.
///
/// Field names follow the legacy camelCase wire format, so a record
/// read from a directory source round-trips unchanged into the response
/// envelope consumed by the inbox authentication component.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserRecord {
    /// Unique login name.
    pub username: String,
    /// Unique numeric identifier.
    pub uid: u64,
    /// Opaque password hash; the hashing algorithm is external.
    pub password_hash: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gecos: Option<String>,
    /// Opaque public-key material, verbatim.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ssh_public_key: Option<String>,
    /// Account flag carried through verbatim; `null` in most sources.
    #[serde(default)]
    pub enabled: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expiration: Option<String>,
}
