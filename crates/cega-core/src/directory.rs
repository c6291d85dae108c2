//! Immutable user-directory indices and instance credentials.

use std::collections::HashMap;
use std::path::Path;
use std::str::FromStr;

use subtle::ConstantTimeEq;
use tracing::debug;

use crate::error::{CoreError, CoreResult};
use crate::user::UserRecord;

/// Identifier types accepted by [`DirectoryIndex::lookup`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IdType {
    Username,
    Uid,
}

impl FromStr for IdType {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "username" => Ok(Self::Username),
            "uid" => Ok(Self::Uid),
            _ => Err(CoreError::InvalidQuery),
        }
    }
}

/// Read-only dual index over the loaded user records.
///
/// Built once at startup and never mutated afterwards, so it can be
/// shared across request tasks without locking. If hot reload is ever
/// added, the whole index must be swapped atomically, never patched in
/// place.
#[derive(Debug)]
pub struct DirectoryIndex {
    store: Vec<UserRecord>,
    usernames: HashMap<String, usize>,
    uids: HashMap<u64, usize>,
}

impl DirectoryIndex {
    /// Builds the username and uid indices from an ordered record set.
    ///
    /// A duplicate username or uid is a configuration fault: the
    /// directory would answer differently depending on which key the
    /// caller used.
    pub fn load(records: Vec<UserRecord>) -> CoreResult<Self> {
        let mut usernames = HashMap::with_capacity(records.len());
        let mut uids = HashMap::with_capacity(records.len());
        for (pos, record) in records.iter().enumerate() {
            if usernames.insert(record.username.clone(), pos).is_some() {
                return Err(CoreError::configuration(format!(
                    "duplicate username `{}` in directory source",
                    record.username
                )));
            }
            if uids.insert(record.uid, pos).is_some() {
                return Err(CoreError::configuration(format!(
                    "duplicate uid `{}` in directory source",
                    record.uid
                )));
            }
        }
        Ok(Self {
            store: records,
            usernames,
            uids,
        })
    }

    /// Loads every `*.json` record under `dir`, in path order.
    ///
    /// A record that does not parse (missing `username` or `uid`
    /// included) fails the whole load.
    pub fn from_dir(dir: &Path) -> CoreResult<Self> {
        let mut paths = Vec::new();
        for entry in std::fs::read_dir(dir)? {
            let path = entry?.path();
            if path.is_file() && path.extension().is_some_and(|ext| ext == "json") {
                paths.push(path);
            }
        }
        paths.sort();

        let mut records = Vec::with_capacity(paths.len());
        for path in paths {
            let raw = std::fs::read_to_string(&path)?;
            let record: UserRecord = serde_json::from_str(&raw).map_err(|err| {
                CoreError::configuration(format!("bad user record {}: {err}", path.display()))
            })?;
            debug!(username = %record.username, uid = record.uid, "loaded user record");
            records.push(record);
        }
        Self::load(records)
    }

    /// Resolves `identifier` under the given id type.
    ///
    /// A uid that does not parse as an integer is simply not a known
    /// uid: the result is `None`, not an error.
    pub fn lookup(&self, identifier: &str, id_type: IdType) -> Option<&UserRecord> {
        let pos = match id_type {
            IdType::Username => self.usernames.get(identifier).copied(),
            IdType::Uid => identifier
                .parse::<u64>()
                .ok()
                .and_then(|uid| self.uids.get(&uid).copied()),
        };
        pos.map(|pos| &self.store[pos])
    }

    /// Number of loaded records.
    #[must_use]
    pub fn len(&self) -> usize {
        self.store.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.store.is_empty()
    }
}

/// Shared secrets of the LocalEGA instances allowed to query the
/// directory.
///
/// Basic-Auth credentials identify a calling instance (an institution),
/// not an end user.
#[derive(Debug, Clone, Default)]
pub struct InstanceRegistry {
    secrets: HashMap<String, String>,
}

impl InstanceRegistry {
    #[must_use]
    pub fn new(secrets: HashMap<String, String>) -> Self {
        Self { secrets }
    }

    /// Exact secret match; an unknown instance and a wrong secret are
    /// the same rejection.
    #[must_use]
    pub fn authenticate(&self, instance: &str, secret: &str) -> bool {
        match self.secrets.get(instance) {
            Some(expected) => {
                expected.len() == secret.len()
                    && expected.as_bytes().ct_eq(secret.as_bytes()).into()
            }
            None => false,
        }
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.secrets.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn record(username: &str, uid: u64) -> UserRecord {
        UserRecord {
            username: username.into(),
            uid,
            password_hash: format!("hash-{username}"),
            gecos: None,
            ssh_public_key: None,
            enabled: None,
            expiration: None,
        }
    }

    #[test]
    fn both_indices_resolve_to_the_same_record() {
        let index =
            DirectoryIndex::load(vec![record("alice", 7), record("bob", 8)]).unwrap();
        let by_name = index.lookup("alice", IdType::Username).unwrap();
        let by_uid = index.lookup("7", IdType::Uid).unwrap();
        assert_eq!(by_name, by_uid);
        assert_eq!(by_uid.password_hash, "hash-alice");
    }

    #[test]
    fn non_numeric_uid_is_not_found() {
        let index = DirectoryIndex::load(vec![record("alice", 7)]).unwrap();
        assert!(index.lookup("alice", IdType::Uid).is_none());
        assert!(index.lookup("-1", IdType::Uid).is_none());
        assert!(index.lookup("", IdType::Uid).is_none());
    }

    #[test]
    fn unknown_identifier_is_not_found() {
        let index = DirectoryIndex::load(vec![record("alice", 7)]).unwrap();
        assert!(index.lookup("mallory", IdType::Username).is_none());
        assert!(index.lookup("42", IdType::Uid).is_none());
    }

    #[test]
    fn duplicate_username_fails_the_load() {
        let err = DirectoryIndex::load(vec![record("alice", 1), record("alice", 2)])
            .unwrap_err();
        assert!(matches!(err, CoreError::Configuration { .. }));
    }

    #[test]
    fn duplicate_uid_fails_the_load() {
        let err =
            DirectoryIndex::load(vec![record("alice", 1), record("bob", 1)]).unwrap_err();
        assert!(matches!(err, CoreError::Configuration { .. }));
    }

    #[test]
    fn id_type_parsing() {
        assert_eq!("username".parse::<IdType>().unwrap(), IdType::Username);
        assert_eq!("uid".parse::<IdType>().unwrap(), IdType::Uid);
        assert!("Username".parse::<IdType>().is_err());
        assert!("bogus-type".parse::<IdType>().is_err());
        assert!("".parse::<IdType>().is_err());
    }

    #[test]
    fn loads_records_from_a_directory() {
        let dir = tempfile::tempdir().unwrap();
        for (name, uid) in [("alice", 7), ("bob", 8)] {
            let mut f = std::fs::File::create(dir.path().join(format!("{name}.json"))).unwrap();
            write!(
                f,
                r#"{{"username": "{name}", "uid": {uid}, "passwordHash": "h"}}"#
            )
            .unwrap();
        }
        // Non-json files are ignored.
        std::fs::write(dir.path().join("alice.pub"), "ssh-ed25519 AAAA").unwrap();

        let index = DirectoryIndex::from_dir(dir.path()).unwrap();
        assert_eq!(index.len(), 2);
        assert!(index.lookup("8", IdType::Uid).is_some());
    }

    #[test]
    fn malformed_record_fails_the_directory_load() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("broken.json"), r#"{"username": "x"}"#).unwrap();
        let err = DirectoryIndex::from_dir(dir.path()).unwrap_err();
        assert!(matches!(err, CoreError::Configuration { .. }));
    }

    #[test]
    fn authenticate_is_exact() {
        let registry = InstanceRegistry::new(
            [("legatest".to_string(), "legatest".to_string())].into(),
        );
        assert!(registry.authenticate("legatest", "legatest"));
        assert!(!registry.authenticate("legatest", "LegaTest"));
        assert!(!registry.authenticate("legatest", "legatest "));
        assert!(!registry.authenticate("legatest", " legatest"));
        assert!(!registry.authenticate("legatest", ""));
        assert!(!registry.authenticate("unknown", "legatest"));
    }
}
