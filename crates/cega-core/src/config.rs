//! Configuration for the bridge components.
//!
//! Sources, in order of precedence:
//! - `CEGA_*` environment variables (highest)
//! - the file named by `CEGA_CONFIG`
//! - `./config/cega.*`
//! - `/etc/cega/cega.*`
//! - hardcoded defaults (lowest)

use std::collections::HashMap;
use std::path::PathBuf;

use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;

use crate::keys::KeyConfig;

/// Root configuration shared by the directory service and the broker
/// tooling.
#[derive(Debug, Clone, Deserialize, Default)]
pub struct CegaConfig {
    #[serde(default)]
    pub server: ServerConfig,

    #[serde(default)]
    pub directory: DirectoryConfig,

    #[serde(default)]
    pub broker: BrokerConfig,

    /// Instance id to shared secret, one entry per calling institution.
    #[serde(default)]
    pub instances: HashMap<String, String>,

    /// Optional service key material.
    #[serde(default)]
    pub key: Option<KeyConfig>,
}

/// HTTP listener settings for the user-directory service.
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8080,
        }
    }
}

/// Where the user records live.
#[derive(Debug, Clone, Deserialize)]
pub struct DirectoryConfig {
    /// Directory holding one `<user>.json` record per user.
    pub source: PathBuf,
}

impl Default for DirectoryConfig {
    fn default() -> Self {
        Self {
            source: PathBuf::from("./users"),
        }
    }
}

/// Message-broker connection settings.
#[derive(Debug, Clone, Deserialize)]
pub struct BrokerConfig {
    /// `amqp(s)://<user>:<password>@<host>:<port>/<vhost>`
    pub connection: String,
    /// Topic exchange every event goes through.
    pub exchange: String,
    /// Initial-connection retry budget.
    pub connection_attempts: u32,
    /// Delay between connection attempts, in seconds.
    pub retry_delay_secs: u64,
    /// CA certificate chain (PEM) for server verification.
    #[serde(default)]
    pub cacertfile: Option<PathBuf>,
    /// PKCS#12 bundle for client verification.
    #[serde(default)]
    pub identityfile: Option<PathBuf>,
    #[serde(default)]
    pub identity_password: Option<String>,
}

impl Default for BrokerConfig {
    fn default() -> Self {
        Self {
            connection: "amqp://localhost:5672/%2F".to_string(),
            exchange: "localega.v1".to_string(),
            connection_attempts: 30,
            retry_delay_secs: 10,
            cacertfile: None,
            identityfile: None,
            identity_password: None,
        }
    }
}

impl CegaConfig {
    /// Loads and validates the configuration from all sources.
    pub fn load() -> Result<Self, ConfigError> {
        let mut builder = Self::set_defaults(Config::builder())?;

        if let Ok(config_path) = std::env::var("CEGA_CONFIG") {
            builder = builder.add_source(File::with_name(&config_path).required(false));
        }

        builder = builder
            .add_source(File::with_name("./config/cega").required(false))
            .add_source(File::with_name("/etc/cega/cega").required(false));

        // Example: CEGA_BROKER__CONNECTION_ATTEMPTS=5
        builder = builder.add_source(
            Environment::with_prefix("CEGA")
                .separator("__")
                .try_parsing(true),
        );

        let config: CegaConfig = builder.build()?.try_deserialize()?;
        config.validate()?;
        Ok(config)
    }

    fn set_defaults(
        builder: config::ConfigBuilder<config::builder::DefaultState>,
    ) -> Result<config::ConfigBuilder<config::builder::DefaultState>, ConfigError> {
        builder
            .set_default("server.host", "0.0.0.0")?
            .set_default("server.port", 8080)?
            .set_default("directory.source", "./users")?
            .set_default("broker.connection", "amqp://localhost:5672/%2F")?
            .set_default("broker.exchange", "localega.v1")?
            .set_default("broker.connection_attempts", 30)?
            .set_default("broker.retry_delay_secs", 10)
    }

    /// Validates cross-field constraints the type system cannot.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.broker.connection.is_empty() {
            return Err(ConfigError::Message(
                "broker.connection must not be empty".to_string(),
            ));
        }
        if self.broker.exchange.is_empty() {
            return Err(ConfigError::Message(
                "broker.exchange must not be empty".to_string(),
            ));
        }
        if self.broker.connection_attempts == 0 {
            return Err(ConfigError::Message(
                "broker.connection_attempts must be > 0".to_string(),
            ));
        }
        if self.broker.identity_password.is_some() && self.broker.identityfile.is_none() {
            return Err(ConfigError::Message(
                "broker.identity_password given without broker.identityfile".to_string(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        let config = CegaConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.broker.exchange, "localega.v1");
        assert_eq!(config.broker.connection_attempts, 30);
        assert_eq!(config.broker.retry_delay_secs, 10);
        assert_eq!(config.server.port, 8080);
    }

    #[test]
    fn zero_connection_attempts_is_rejected() {
        let mut config = CegaConfig::default();
        config.broker.connection_attempts = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn empty_connection_url_is_rejected() {
        let mut config = CegaConfig::default();
        config.broker.connection = String::new();
        assert!(config.validate().is_err());
    }

    #[test]
    fn identity_password_requires_identityfile() {
        let mut config = CegaConfig::default();
        config.broker.identity_password = Some("hello".into());
        assert!(config.validate().is_err());
    }
}
