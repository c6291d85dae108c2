//! Core domain types and configuration for the CentralEGA bridge.

pub mod config;
pub mod directory;
pub mod error;
pub mod event;
pub mod keys;
pub mod user;

pub use config::{BrokerConfig, CegaConfig, DirectoryConfig, ServerConfig};
pub use directory::{DirectoryIndex, IdType, InstanceRegistry};
pub use error::{CoreError, CoreResult};
pub use event::{Checksum, EventPayload};
pub use keys::{FileKeyPair, KeyConfig, KeyProvider, PublicKeyOnly};
pub use user::UserRecord;
