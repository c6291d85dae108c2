//! Service key material.
//!
//! Key generation and validation (PGP, Crypt4GH) belong to external
//! tooling; here the material is loaded from disk and exposed as opaque
//! bytes to whichever component needs to hand it out.

use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::error::{CoreError, CoreResult};

/// Which provider to construct, decided by configuration.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "lowercase", tag = "kind")]
pub enum KeyConfig {
    /// Public and private halves on disk.
    Pair { public: PathBuf, private: PathBuf },
    /// Public half only (e.g. the CentralEGA signing key).
    Public { public: PathBuf },
}

/// Access to loaded key material.
pub trait KeyProvider: Send + Sync {
    /// Public half, verbatim file contents.
    fn public_key(&self) -> &[u8];

    /// Private half, when this provider carries one.
    fn private_key(&self) -> Option<&[u8]>;
}

/// Key pair loaded from two files.
pub struct FileKeyPair {
    public: Vec<u8>,
    private: Vec<u8>,
}

impl FileKeyPair {
    pub fn load(public: &Path, private: &Path) -> CoreResult<Self> {
        Ok(Self {
            public: read_key(public)?,
            private: read_key(private)?,
        })
    }
}

impl KeyProvider for FileKeyPair {
    fn public_key(&self) -> &[u8] {
        &self.public
    }

    fn private_key(&self) -> Option<&[u8]> {
        Some(&self.private)
    }
}

/// Public key material without a private half.
#[derive(Debug)]
pub struct PublicKeyOnly {
    public: Vec<u8>,
}

impl PublicKeyOnly {
    pub fn load(public: &Path) -> CoreResult<Self> {
        Ok(Self {
            public: read_key(public)?,
        })
    }
}

impl KeyProvider for PublicKeyOnly {
    fn public_key(&self) -> &[u8] {
        &self.public
    }

    fn private_key(&self) -> Option<&[u8]> {
        None
    }
}

/// Builds the provider selected by `config`.
pub fn from_config(config: &KeyConfig) -> CoreResult<Box<dyn KeyProvider>> {
    match config {
        KeyConfig::Pair { public, private } => {
            Ok(Box::new(FileKeyPair::load(public, private)?))
        }
        KeyConfig::Public { public } => Ok(Box::new(PublicKeyOnly::load(public)?)),
    }
}

fn read_key(path: &Path) -> CoreResult<Vec<u8>> {
    let material = fs::read(path).map_err(|err| {
        CoreError::configuration(format!("unreadable key file {}: {err}", path.display()))
    })?;
    if material.is_empty() {
        return Err(CoreError::configuration(format!(
            "empty key file {}",
            path.display()
        )));
    }
    Ok(material)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn selects_provider_by_config() {
        let dir = tempfile::tempdir().unwrap();
        let public = dir.path().join("key.pub");
        let private = dir.path().join("key.sec");
        fs::write(&public, "-----BEGIN PUBLIC-----").unwrap();
        fs::write(&private, "-----BEGIN PRIVATE-----").unwrap();

        let pair = from_config(&KeyConfig::Pair {
            public: public.clone(),
            private,
        })
        .unwrap();
        assert!(pair.private_key().is_some());

        let public_only = from_config(&KeyConfig::Public { public }).unwrap();
        assert!(public_only.private_key().is_none());
        assert_eq!(public_only.public_key(), b"-----BEGIN PUBLIC-----");
    }

    #[test]
    fn missing_key_file_is_a_configuration_error() {
        let err = PublicKeyOnly::load(Path::new("/nonexistent/key.pub")).unwrap_err();
        assert!(matches!(err, CoreError::Configuration { .. }));
    }

    #[test]
    fn empty_key_file_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let public = dir.path().join("empty.pub");
        fs::write(&public, "").unwrap();
        assert!(PublicKeyOnly::load(&public).is_err());
    }
}
